//! Core geometry and detection types.
//!
//! A [`Detection`] is one recognized text region as produced by the external
//! recognition engine: a bounding quadrilateral, the recognized text, and a
//! confidence score in `[0, 1]`. Detections are immutable once produced and
//! owned by the pipeline for the duration of one document.

use serde::{Deserialize, Serialize};

/// A 2D point in image pixel coordinates (origin top-left).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point
    #[inline]
    #[must_use = "point is created but not used"]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Bounding quadrilateral of a detected text region.
///
/// Corners are ordered top-left, top-right, bottom-right, bottom-left,
/// matching the recognition engine's output convention.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Quad(pub [Point; 4]);

impl Quad {
    /// Create a quad from four ordered corners
    #[inline]
    #[must_use = "quad is created but not used"]
    pub const fn new(tl: Point, tr: Point, br: Point, bl: Point) -> Self {
        Self([tl, tr, br, bl])
    }

    /// Create an axis-aligned quad from a top-left corner plus width/height.
    #[inline]
    #[must_use = "quad is created but not used"]
    pub const fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self([
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }

    /// Top-left corner
    #[inline]
    #[must_use = "corner is computed but not used"]
    pub const fn top_left(&self) -> Point {
        self.0[0]
    }

    /// Top-right corner
    #[inline]
    #[must_use = "corner is computed but not used"]
    pub const fn top_right(&self) -> Point {
        self.0[1]
    }

    /// Bottom-right corner
    #[inline]
    #[must_use = "corner is computed but not used"]
    pub const fn bottom_right(&self) -> Point {
        self.0[2]
    }

    /// Bottom-left corner
    #[inline]
    #[must_use = "corner is computed but not used"]
    pub const fn bottom_left(&self) -> Point {
        self.0[3]
    }

    /// Center used for duplicate comparison.
    ///
    /// `cx` is the x midpoint of the top edge; `cy` is the y midpoint of the
    /// left edge span top-to-bottom. This matches the suppression geometry
    /// the dedup thresholds were tuned against, so it must not be replaced
    /// with a centroid of all four corners.
    #[inline]
    #[must_use = "center is computed but not used"]
    pub fn center(&self) -> (f32, f32) {
        let cx = (self.0[0].x + self.0[1].x) / 2.0;
        let cy = (self.0[0].y + self.0[2].y) / 2.0;
        (cx, cy)
    }
}

/// One recognized text region with geometry, text, and confidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding quadrilateral in image pixel coordinates
    pub quad: Quad,
    /// Recognized text content (may be empty)
    pub text: String,
    /// Recognition confidence score (0.0 to 1.0)
    pub confidence: f32,
}

impl Detection {
    /// Create a new detection
    #[inline]
    #[must_use = "detection is created but not used"]
    pub fn new(quad: Quad, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            quad,
            text: text.into(),
            confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_quad_corners() {
        let quad = Quad::from_rect(10.0, 20.0, 100.0, 30.0);
        assert_eq!(quad.top_left(), Point::new(10.0, 20.0));
        assert_eq!(quad.top_right(), Point::new(110.0, 20.0));
        assert_eq!(quad.bottom_right(), Point::new(110.0, 50.0));
        assert_eq!(quad.bottom_left(), Point::new(10.0, 50.0));
    }

    #[test]
    #[allow(clippy::float_cmp)]
    fn test_quad_center_uses_top_edge_and_left_span() {
        // Skewed quad: the center formula reads p0.x, p1.x and p0.y, p2.y only.
        let quad = Quad::new(
            Point::new(0.0, 0.0),
            Point::new(10.0, 2.0),
            Point::new(12.0, 20.0),
            Point::new(1.0, 18.0),
        );
        let (cx, cy) = quad.center();
        assert_eq!(cx, 5.0);
        assert_eq!(cy, 10.0);
    }

    #[test]
    fn test_detection_serde_roundtrip() {
        let det = Detection::new(Quad::from_rect(1.0, 2.0, 3.0, 4.0), "hi", 0.5);
        let json = serde_json::to_string(&det).unwrap();
        let back: Detection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, det);
    }
}
