//! Opaque telemetry passthrough.
//!
//! The extraction client reports one span per service call to whatever sink
//! the caller supplies. The core never depends on the sink's internals; the
//! collector behind it (if any) is an external collaborator.

use serde::{Deserialize, Serialize};

/// Execution span for a single extraction-service call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSpan {
    /// Model identifier the call was made against
    pub model: String,
    /// Wall-clock latency in milliseconds
    pub latency_ms: u64,
    /// Context length in characters
    pub context_chars: usize,
    /// Input tokens consumed, when the service reports usage
    pub input_tokens: Option<u32>,
    /// Output tokens generated, when the service reports usage
    pub output_tokens: Option<u32>,
}

/// Sink for extraction spans. Implementations are supplied by the caller and
/// treated as opaque; a failing or slow sink must not affect the pipeline.
pub trait TelemetrySink: Send + Sync {
    /// Record one completed extraction call.
    fn record(&self, span: &ExtractionSpan);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct CollectingSink(Mutex<Vec<ExtractionSpan>>);

    impl TelemetrySink for CollectingSink {
        fn record(&self, span: &ExtractionSpan) {
            self.0.lock().expect("test sink lock").push(span.clone());
        }
    }

    #[test]
    fn test_sink_receives_span() {
        let sink = CollectingSink(Mutex::new(Vec::new()));
        let span = ExtractionSpan {
            model: "test-model".to_string(),
            latency_ms: 12,
            context_chars: 340,
            input_tokens: Some(100),
            output_tokens: Some(50),
        };
        sink.record(&span);
        let recorded = sink.0.lock().unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].model, "test-model");
    }
}
