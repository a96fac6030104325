//! Detection deduplication.
//!
//! Multi-pass recognition over the same page produces near-duplicate
//! detections of the same physical text ("ghosting"). This module collapses
//! them with a confidence-priority greedy suppression, then orders the
//! survivors for top-to-bottom, left-to-right reading.

use crate::types::Detection;
use tracing::debug;

/// Per-axis suppression threshold in pixels.
///
/// Two detections are duplicates when BOTH center deltas are strictly below
/// this value: an axis-aligned 24x24 window centered on each accepted
/// detection, not a Euclidean radius. The comparison is strict `<`, so a
/// center exactly 12px away on either axis survives.
const SUPPRESSION_THRESHOLD: f32 = 12.0;

/// Memo of an already-accepted detection, kept for proximity tests.
#[derive(Debug, Clone, Copy)]
struct AcceptedMark {
    cx: f32,
    cy: f32,
    #[allow(dead_code)] // recorded for debugging parity with accepted text
    text_len: usize,
}

/// Collapse duplicate detections and order the survivors for reading.
///
/// Detections are visited in descending confidence order (stable: ties keep
/// input order, which makes acceptance deterministic). A candidate whose
/// center falls inside the suppression window of ANY previously accepted
/// detection is dropped. Survivors are re-sorted ascending by top-left
/// `(y, x)` to establish the final reading order.
///
/// Greedy suppression is O(n^2) in the accepted count. That is fine for the
/// tens to low hundreds of detections a form page yields; a grid-bucketed
/// index would only pay off past ~2,000 detections per page.
#[must_use = "returns the deduplicated, reading-ordered detections"]
pub fn dedupe_detections(detections: Vec<Detection>) -> Vec<Detection> {
    if detections.is_empty() {
        return detections;
    }

    let input_len = detections.len();
    let mut ranked = detections;
    // Vec::sort_by is stable, so equal confidences keep input order.
    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut accepted: Vec<Detection> = Vec::with_capacity(ranked.len());
    let mut marks: Vec<AcceptedMark> = Vec::with_capacity(ranked.len());

    for detection in ranked {
        let (cx, cy) = detection.quad.center();

        let is_duplicate = marks.iter().any(|mark| {
            (cx - mark.cx).abs() < SUPPRESSION_THRESHOLD
                && (cy - mark.cy).abs() < SUPPRESSION_THRESHOLD
        });

        if is_duplicate {
            continue;
        }

        marks.push(AcceptedMark {
            cx,
            cy,
            text_len: detection.text.chars().count(),
        });
        accepted.push(detection);
    }

    // Reading order: top-left corner y first, then x.
    accepted.sort_by(|a, b| {
        let (ta, tb) = (a.quad.top_left(), b.quad.top_left());
        ta.y.total_cmp(&tb.y).then(ta.x.total_cmp(&tb.x))
    });

    debug!(
        input = input_len,
        kept = accepted.len(),
        "deduplicated detections"
    );

    accepted
}
