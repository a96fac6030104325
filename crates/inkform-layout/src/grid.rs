//! Grid projection.
//!
//! Renders clustered lines onto a fixed-width character grid, producing the
//! normalized layout text handed to the extraction service. One grid row per
//! line; each detection is written at a column proportional to its horizontal
//! position in the source image.

use crate::lines::Line;
use tracing::warn;

/// Logical row width in characters.
const GRID_WIDTH: usize = 125;

/// Effective writable width: characters are never written at or past this
/// column.
const WRITE_WIDTH: usize = 120;

#[derive(Debug)]
enum ProjectionFault {
    /// Image width was zero, negative, or non-finite
    BadImageWidth(f32),
    /// A detection's projected start column was negative or non-finite
    BadColumn(f32),
}

impl std::fmt::Display for ProjectionFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadImageWidth(w) => write!(f, "invalid image width {w}"),
            Self::BadColumn(x) => write!(f, "invalid projected column {x}"),
        }
    }
}

/// Project lines onto the fixed-width character grid.
///
/// Rows are filled in detection order within each line (already sorted
/// left-to-right), so when two projected spans overlap the more rightward
/// detection overwrites the earlier one at the shared columns. Rows are
/// right-trimmed of trailing spaces and joined with newlines.
///
/// Layout reconstruction is best-effort and must never abort the pipeline:
/// any projection fault (zero image width, malformed geometry) yields an
/// empty string instead of an error.
#[must_use = "returns the projected grid text"]
pub fn project_grid(lines: &[Line], image_width: f32) -> String {
    match try_project(lines, image_width) {
        Ok(grid) => grid,
        Err(fault) => {
            warn!(%fault, "grid projection failed, returning empty layout");
            String::new()
        }
    }
}

fn try_project(lines: &[Line], image_width: f32) -> Result<String, ProjectionFault> {
    if !image_width.is_finite() || image_width <= 0.0 {
        return Err(ProjectionFault::BadImageWidth(image_width));
    }

    let mut rows: Vec<String> = Vec::with_capacity(lines.len());

    for line in lines {
        let mut row = vec![' '; GRID_WIDTH];

        for detection in line.members() {
            let x = detection.quad.top_left().x;
            // Truncation is safe: the value is checked non-negative and
            // finite before the cast.
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            let projected = (x / image_width * WRITE_WIDTH as f32).round();
            if !projected.is_finite() || projected < 0.0 {
                return Err(ProjectionFault::BadColumn(projected));
            }
            #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
            let x_start = projected as usize;

            for (offset, ch) in detection.text.chars().enumerate() {
                let col = x_start + offset;
                if col >= WRITE_WIDTH {
                    break;
                }
                row[col] = ch;
            }
        }

        let rendered: String = row.into_iter().collect();
        rows.push(rendered.trim_end_matches(' ').to_string());
    }

    Ok(rows.join("\n"))
}
