//! FILENAME: engine/src/range.rs
//! PURPOSE: Expands range text into coordinate rectangles.
//! CONTEXT: A range is either a single reference ("B3") or two corner
//! references joined by a colon ("A1:B2"). Corners may arrive in any order;
//! the rectangle is normalized per axis. Enumeration is row-major (outer
//! loop row, inner loop column), the one order used engine-wide, matching
//! how selections and exports walk the grid.

use crate::address::{Address, CellCoord};

/// Expands range text into an ordered list of coordinates, clamped to the
/// given grid bounds.
///
/// Malformed text yields an empty Vec rather than an error, so a bad
/// reference inside a formula degrades to an empty operand set instead of
/// aborting evaluation. The clamp keeps a huge textual rectangle from
/// materializing coordinates no grid cell can occupy: the out-of-bounds
/// portion is all implicit empty cells, so dropping it never changes a
/// result.
pub fn expand(range_text: &str, row_count: u32, col_count: u32) -> Vec<CellCoord> {
    let mut parts = range_text.splitn(2, ':');
    let first = parts.next().unwrap_or("");
    let second = parts.next();

    let start = match Address::parse(first) {
        Ok(a) => a.coord(),
        Err(_) => return Vec::new(),
    };

    let end = match second {
        None => start,
        Some(text) => match Address::parse(text) {
            Ok(a) => a.coord(),
            Err(_) => return Vec::new(),
        },
    };

    let top = start.0.min(end.0);
    let left = start.1.min(end.1);
    if top >= row_count || left >= col_count {
        return Vec::new();
    }
    let bottom = start.0.max(end.0).min(row_count - 1);
    let right = start.1.max(end.1).min(col_count - 1);

    rect_coords((top, left), (bottom, right))
}

/// Enumerates the inclusive rectangle spanned by two corners, row-major.
/// The corners may be given in any order.
pub fn rect_coords(a: CellCoord, b: CellCoord) -> Vec<CellCoord> {
    let (top, bottom) = (a.0.min(b.0), a.0.max(b.0));
    let (left, right) = (a.1.min(b.1), a.1.max(b.1));

    let mut coords = Vec::with_capacity(
        ((bottom - top + 1) as usize) * ((right - left + 1) as usize),
    );
    for row in top..=bottom {
        for col in left..=right {
            coords.push((row, col));
        }
    }
    coords
}

/// Computes the bounding rectangle of an arbitrary coordinate set as
/// (top_left, bottom_right). Returns None for an empty input.
pub fn bounding_rect(coords: &[CellCoord]) -> Option<(CellCoord, CellCoord)> {
    let first = *coords.first()?;
    let mut top_left = first;
    let mut bottom_right = first;

    for &(row, col) in &coords[1..] {
        top_left.0 = top_left.0.min(row);
        top_left.1 = top_left.1.min(col);
        bottom_right.0 = bottom_right.0.max(row);
        bottom_right.1 = bottom_right.1.max(col);
    }

    Some((top_left, bottom_right))
}
