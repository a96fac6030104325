//! Extraction-service access and resilient response parsing for inkform
//!
//! The generative text-extraction service receives the reconstructed layout
//! grid as context and returns free text. That text is subject to formatting
//! drift: markdown fences around the JSON, trailing commas, missing section
//! markers. This crate owns both sides of that exchange:
//!
//! - [`client`] - async HTTP client for an OpenAI-compatible chat-completions
//!   endpoint, with a bounded timeout and opaque telemetry passthrough
//! - [`parser`] - splits the response into a layout-table section and a JSON
//!   section, repairs and parses the JSON, and never fails on malformed input
//! - [`telemetry`] - the opaque span sink the client reports through
//!
//! # Parsing guarantee
//!
//! [`parser::parse_response`] always returns a well-formed [`ParsedResult`];
//! when no repair stage yields valid JSON, the raw text is wrapped under a
//! `RECOVERED` status instead of surfacing an error.

pub mod client;
pub mod parser;
pub mod telemetry;

pub use client::{ExtractError, ExtractionClient, ExtractionConfig};
pub use parser::{parse_response, ParseStatus, ParsedResult};
pub use telemetry::{ExtractionSpan, TelemetrySink};
