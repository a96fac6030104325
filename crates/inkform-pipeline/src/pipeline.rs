//! The per-document pipeline orchestrator.

use crate::capability::{ExtractionService, RecognitionEngine};
use inkform_extract::{parse_response, ParseStatus, TelemetrySink};
use inkform_layout::{cluster_lines, dedupe_detections, project_grid};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Terminal status of one document run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    /// Extraction succeeded and the JSON parsed cleanly
    #[default]
    Success,
    /// Extraction succeeded but the payload needed the raw-wrap fallback
    Recovered,
    /// Recognition ran but found no text; extraction was skipped
    Empty,
    /// An upstream capability failed (engine offline, service error)
    Error,
}

/// What the caller receives for every request, success or not.
///
/// Even a total extraction failure carries the best available raw text so a
/// caller can degrade to showing it when the structured data is unusable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Best available raw text: the layout grid, or plain OCR text when
    /// projection failed, or empty when recognition never ran
    pub raw_text: String,
    /// Layout-table section of the service response (or `"NOT_FOUND"`)
    pub table_section: String,
    /// Structured payload, recovery wrapper, or null
    pub structured_data: Value,
    /// Terminal status of this run
    pub status: RecordStatus,
    /// Causing message for `EMPTY` and `ERROR` records
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentRecord {
    fn failure(raw_text: String, message: String) -> Self {
        Self {
            raw_text,
            table_section: String::new(),
            structured_data: Value::Null,
            status: RecordStatus::Error,
            error: Some(message),
        }
    }
}

/// One document's processing pipeline.
///
/// Owns its capabilities; holds no per-document state, so a single instance
/// can serve concurrent documents from multiple tasks.
pub struct DocumentPipeline<E, X> {
    engine: E,
    service: X,
    telemetry: Option<Arc<dyn TelemetrySink>>,
}

impl<E, X> DocumentPipeline<E, X>
where
    E: RecognitionEngine,
    X: ExtractionService,
{
    /// Create a pipeline from its two capabilities.
    #[must_use = "creates the document pipeline"]
    pub fn new(engine: E, service: X) -> Self {
        Self {
            engine,
            service,
            telemetry: None,
        }
    }

    /// Attach an opaque telemetry sink, passed through to the service calls.
    #[must_use = "returns the pipeline with the sink attached"]
    pub fn with_telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    /// Process one document image into a [`DocumentRecord`].
    ///
    /// Never fails: every stage fault is folded into the record's status and
    /// error fields.
    pub async fn process(&self, image: &[u8]) -> DocumentRecord {
        // Stage 1: recognition. An offline engine short-circuits before the
        // core pipeline is entered.
        let page = match self.engine.detect(image) {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "recognition unavailable, aborting request");
                return DocumentRecord::failure(String::new(), e.to_string());
            }
        };

        // Stages 2-3: dedupe and cluster.
        let deduped = dedupe_detections(page.detections);
        if deduped.iter().all(|d| d.text.trim().is_empty()) {
            info!("recognition produced no text");
            return DocumentRecord {
                raw_text: String::new(),
                table_section: String::new(),
                structured_data: Value::Null,
                status: RecordStatus::Empty,
                error: Some("no text detected".to_string()),
            };
        }
        let lines = cluster_lines(deduped);

        // Plain reading-order text, kept as the degraded context when grid
        // projection fails.
        let plain_text = lines
            .iter()
            .map(|line| {
                line.members()
                    .iter()
                    .map(|d| d.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n");

        // Stage 4: grid projection, best-effort.
        let grid = project_grid(&lines, page.image_width);
        let context = if grid.is_empty() {
            warn!("layout grid unavailable, falling back to plain OCR text");
            plain_text
        } else {
            grid
        };

        // Stage 5: extraction. The sole await point; bounded by the service's
        // own timeout.
        let response = match self
            .service
            .extract(&context, self.telemetry.as_deref())
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "extraction service failed");
                return DocumentRecord {
                    structured_data: json!({ "error": e.to_string() }),
                    ..DocumentRecord::failure(context, e.to_string())
                };
            }
        };

        // Stage 6: resilient parse. Never an error.
        let parsed = parse_response(&response);
        let status = match parsed.status {
            ParseStatus::Success => RecordStatus::Success,
            ParseStatus::Recovered => RecordStatus::Recovered,
            // parse_response never reports upstream errors itself.
            ParseStatus::Error => RecordStatus::Error,
        };

        info!(?status, "document processed");

        DocumentRecord {
            raw_text: context,
            table_section: parsed.table_section,
            structured_data: parsed.structured_data,
            status,
            error: None,
        }
    }
}
