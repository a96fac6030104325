//! Document processing pipeline orchestration for inkform
//!
//! Ties the layout reconstruction and structured extraction stages together
//! into one per-document pipeline:
//!
//! ```text
//! image bytes
//!     │  RecognitionEngine::detect          (external capability)
//!     ▼
//! detections ──► dedupe ──► cluster ──► grid (inkform-layout)
//!     │
//!     ▼  ExtractionService::extract         (external capability, async)
//! free text ──► resilient parse (inkform-extract)
//!     │
//!     ▼
//! DocumentRecord
//! ```
//!
//! Every internal fault is converted into a field of the returned
//! [`DocumentRecord`] at its stage boundary; no error crosses the pipeline
//! boundary. Callers always get a well-formed record, differentiated only by
//! its status and optional error message, with the best available raw text
//! for graceful degradation.
//!
//! One pipeline instance serves one request at a time conceptually, but the
//! instance holds no per-document state: processing many documents
//! concurrently just means calling [`DocumentPipeline::process`] from many
//! tasks. The extraction call is the only await point.

pub mod capability;
pub mod error;
pub mod pipeline;

pub use capability::{ExtractionService, RecognitionEngine, RecognizedPage};
pub use error::EngineError;
pub use pipeline::{DocumentPipeline, DocumentRecord, RecordStatus};
