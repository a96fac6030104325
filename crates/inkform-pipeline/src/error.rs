//! Pipeline error taxonomy.
//!
//! Errors here describe upstream capability faults. They never escape
//! [`crate::DocumentPipeline::process`]; the orchestrator converts each one
//! into the status and error fields of the returned record.

use thiserror::Error;

/// Recognition-engine faults.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine failed to initialize or is offline; fatal for the request,
    /// reported immediately without entering the core pipeline.
    #[error("recognition engine unavailable: {0}")]
    Unavailable(String),

    /// The engine rejected or failed to decode the submitted image.
    #[error("recognition failed: {0}")]
    Recognition(String),
}
