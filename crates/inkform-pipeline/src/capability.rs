//! External capabilities consumed by the pipeline.
//!
//! The recognition engine and the extraction service are opaque external
//! collaborators. They enter the pipeline as explicitly owned,
//! dependency-injected objects rather than process-wide singletons, which
//! keeps construction, teardown, and test substitution in the caller's
//! hands.

use crate::error::EngineError;
use inkform_extract::{ExtractError, ExtractionClient, TelemetrySink};
use inkform_layout::Detection;
use serde::{Deserialize, Serialize};

/// Output of one recognition pass over an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognizedPage {
    /// Raw detections, unordered and possibly ghosted
    pub detections: Vec<Detection>,
    /// Source image width in pixels, needed for grid projection
    pub image_width: f32,
}

/// Optical-recognition capability: image in, detections out.
///
/// Implementations wrap whatever engine is deployed (ONNX runner, remote
/// service, snapshot file in tests). Detection is CPU-bound and synchronous;
/// callers running inside an async context should wrap the call in
/// `spawn_blocking` if their engine is slow.
pub trait RecognitionEngine: Send + Sync {
    /// Detect text regions in the given image.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unavailable`] when the engine is offline and
    /// [`EngineError::Recognition`] when the image cannot be processed.
    fn detect(&self, image: &[u8]) -> Result<RecognizedPage, EngineError>;
}

/// Generative text-extraction capability: context string in, free text out.
///
/// The telemetry sink is passed through opaquely; implementations report one
/// span per call when a sink is present.
pub trait ExtractionService: Send + Sync {
    /// Send the layout context to the service and return its free text.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractError`] on network failure, timeout, or a
    /// malformed reply.
    fn extract(
        &self,
        context: &str,
        telemetry: Option<&dyn TelemetrySink>,
    ) -> impl std::future::Future<Output = Result<String, ExtractError>> + Send;
}

impl ExtractionService for ExtractionClient {
    async fn extract(
        &self,
        context: &str,
        telemetry: Option<&dyn TelemetrySink>,
    ) -> Result<String, ExtractError> {
        Self::extract(self, context, telemetry).await
    }
}
