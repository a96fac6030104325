//! Spatial deduplication and layout reconstruction for inkform
//!
//! This crate turns raw text detections from a recognition engine into a
//! fixed-width textual grid that preserves the approximate two-dimensional
//! layout of the source document as linear text.
//!
//! # Pipeline
//!
//! The stages run strictly in order, each consuming the previous output:
//!
//! 1. **Deduplication** ([`dedupe_detections`]): multi-pass recognition
//!    produces "ghosted" duplicates of the same physical text. The highest
//!    confidence detection in each neighborhood wins; survivors are sorted
//!    into reading order (top-to-bottom, left-to-right).
//! 2. **Line clustering** ([`cluster_lines`]): detections with approximately
//!    equal vertical position are grouped into visual text lines.
//! 3. **Grid projection** ([`project_grid`]): each line becomes one
//!    fixed-width character row; detections are written at a column
//!    proportional to their horizontal position in the source image.
//!
//! # Example
//!
//! ```
//! use inkform_layout::{Detection, Quad, reconstruct_layout};
//!
//! let detections = vec![
//!     Detection::new(Quad::from_rect(10.0, 10.0, 60.0, 18.0), "Name:", 0.98),
//!     Detection::new(Quad::from_rect(200.0, 12.0, 80.0, 18.0), "Jo", 0.91),
//! ];
//! let grid = reconstruct_layout(detections, 800.0);
//! assert!(grid.contains("Name:"));
//! ```

pub mod dedup;
pub mod grid;
pub mod lines;
pub mod types;

pub use dedup::dedupe_detections;
pub use grid::project_grid;
pub use lines::{cluster_lines, Line};
pub use types::{Detection, Point, Quad};

/// Run the full layout reconstruction: dedupe, cluster, project.
///
/// This is the normalized text handed to the extraction service as context.
/// Projection is best-effort: on any fault (zero image width, malformed
/// geometry) the result is an empty string rather than an error.
#[must_use = "returns the reconstructed layout text"]
pub fn reconstruct_layout(detections: Vec<Detection>, image_width: f32) -> String {
    let deduped = dedupe_detections(detections);
    let lines = cluster_lines(deduped);
    project_grid(&lines, image_width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reconstruct_layout_empty() {
        assert_eq!(reconstruct_layout(vec![], 800.0), "");
    }

    #[test]
    fn test_reconstruct_layout_two_rows() {
        let detections = vec![
            Detection::new(Quad::from_rect(0.0, 40.0, 50.0, 18.0), "below", 0.9),
            Detection::new(Quad::from_rect(0.0, 0.0, 50.0, 18.0), "above", 0.9),
        ];
        let grid = reconstruct_layout(detections, 800.0);
        assert_eq!(grid, "above\nbelow");
    }
}
