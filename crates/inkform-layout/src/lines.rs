//! Visual line clustering.
//!
//! Groups the deduplicated, reading-ordered detections into lines of text
//! that share an approximate vertical position.

use crate::types::Detection;
use serde::{Deserialize, Serialize};

/// Maximum top-left y delta, in pixels, for a detection to join the current
/// line. Compared against the LAST detection appended to the line, not the
/// line's first member.
const LINE_TOLERANCE: f32 = 15.0;

/// An ordered run of detections forming one visual text line.
///
/// Members are sorted left-to-right by top-left x when the line is closed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line(pub Vec<Detection>);

impl Line {
    /// Detections in this line, left-to-right
    #[inline]
    #[must_use = "members are returned but not used"]
    pub fn members(&self) -> &[Detection] {
        &self.0
    }

    /// Number of detections in this line
    #[inline]
    #[must_use = "length is returned but not used"]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the line has no members
    #[inline]
    #[must_use = "emptiness check result is returned but not used"]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn close(mut self) -> Self {
        self.0.sort_by(|a, b| {
            a.quad
                .top_left()
                .x
                .total_cmp(&b.quad.top_left().x)
        });
        self
    }
}

/// Group reading-ordered detections into visual lines.
///
/// The y comparison chains through the most recently appended member rather
/// than the line's anchor. A monotonic run of small y increments can
/// therefore carry a line's vertical span past the tolerance in aggregate,
/// which tolerates slight baseline skew on handwritten scans. Keep the
/// running comparator; an anchor-based comparison changes line breaks on
/// skewed input.
///
/// Every input detection lands in exactly one line (the lines partition the
/// input).
#[must_use = "returns the clustered lines"]
pub fn cluster_lines(detections: Vec<Detection>) -> Vec<Line> {
    let mut iter = detections.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut lines: Vec<Line> = Vec::new();
    let mut last_y = first.quad.top_left().y;
    let mut current = Line(vec![first]);

    for detection in iter {
        let y = detection.quad.top_left().y;
        if (y - last_y).abs() < LINE_TOLERANCE {
            current.0.push(detection);
        } else {
            lines.push(current.close());
            current = Line(vec![detection]);
        }
        last_y = y;
    }

    lines.push(current.close());
    lines
}
