//! Property-Based Tests
//!
//! Invariants of the layout reconstruction stages, explored with proptest:
//! - Deduplication is idempotent and produces reading order
//! - Line clustering partitions its input
//! - Grid rows never exceed the fixed width
//!
//! These complement the unit tests by exploring the input space automatically.

use inkform_layout::{cluster_lines, dedupe_detections, project_grid, Detection, Quad};
use proptest::prelude::*;

fn arb_detection() -> impl Strategy<Value = Detection> {
    (
        0.0f32..2000.0,
        0.0f32..2000.0,
        1.0f32..400.0,
        1.0f32..60.0,
        "[a-zA-Z0-9 ]{0,20}",
        0.0f32..=1.0,
    )
        .prop_map(|(x, y, w, h, text, confidence)| {
            Detection::new(Quad::from_rect(x, y, w, h), text, confidence)
        })
}

/// Property: running the deduplicator on its own output changes nothing.
#[test]
fn proptest_dedup_idempotent() {
    proptest!(|(input in prop::collection::vec(arb_detection(), 0..60))| {
        let once = dedupe_detections(input);
        let twice = dedupe_detections(once.clone());
        prop_assert_eq!(once, twice);
    });
}

/// Property: deduplicated output is sorted ascending by top-left (y, x).
#[test]
fn proptest_dedup_reading_order() {
    proptest!(|(input in prop::collection::vec(arb_detection(), 0..60))| {
        let out = dedupe_detections(input);
        for pair in out.windows(2) {
            let (a, b) = (pair[0].quad.top_left(), pair[1].quad.top_left());
            prop_assert!(a.y < b.y || (a.y == b.y && a.x <= b.x));
        }
    });
}

/// Property: no accepted pair sits inside each other's suppression window.
#[test]
fn proptest_dedup_no_close_pairs() {
    proptest!(|(input in prop::collection::vec(arb_detection(), 0..60))| {
        let out = dedupe_detections(input);
        for (i, a) in out.iter().enumerate() {
            for b in out.iter().skip(i + 1) {
                let (ax, ay) = a.quad.center();
                let (bx, by) = b.quad.center();
                prop_assert!(
                    (ax - bx).abs() >= 12.0 || (ay - by).abs() >= 12.0,
                    "accepted pair within suppression window"
                );
            }
        }
    });
}

/// Property: the lines partition the deduplicated input exactly.
#[test]
fn proptest_lines_partition() {
    proptest!(|(input in prop::collection::vec(arb_detection(), 0..60))| {
        let deduped = dedupe_detections(input);
        let expected = deduped.len();
        let lines = cluster_lines(deduped.clone());

        let total: usize = lines.iter().map(|l| l.len()).sum();
        prop_assert_eq!(total, expected);

        let mut flattened: Vec<&Detection> =
            lines.iter().flat_map(|l| l.members()).collect();
        for d in &deduped {
            let pos = flattened.iter().position(|m| *m == d);
            prop_assert!(pos.is_some(), "detection lost during clustering");
            flattened.remove(pos.unwrap());
        }
        prop_assert!(flattened.is_empty(), "clustering duplicated a detection");
    });
}

/// Property: no grid row exceeds 125 chars, no non-space char at column >= 120.
#[test]
fn proptest_grid_width_bound() {
    proptest!(|(
        input in prop::collection::vec(arb_detection(), 0..60),
        image_width in 1.0f32..4000.0
    )| {
        let lines = cluster_lines(dedupe_detections(input));
        let grid = project_grid(&lines, image_width);
        for row in grid.lines() {
            prop_assert!(row.chars().count() <= 125);
            for (col, ch) in row.chars().enumerate() {
                if col >= 120 {
                    prop_assert_eq!(ch, ' ', "written character past column 120");
                }
            }
        }
    });
}
