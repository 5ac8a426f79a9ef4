//! FILENAME: engine/src/clipboard.rs
//! PURPOSE: Snapshots a selection for copy/cut and plans offset pastes.
//! CONTEXT: A snapshot is taken relative to the selection's bounding
//! rectangle at copy time and stays immutable until the next copy/cut.
//! Paste arithmetic lives here; the actual grid writes (and the dependent
//! recalculation they trigger) go through the sheet's write path.

use crate::address::CellCoord;
use crate::cell::Cell;
use crate::grid::Grid;
use crate::range::bounding_rect;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An immutable copy of a selection's cells, keyed by their source coords.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipboardSnapshot {
    pub top_left: CellCoord,
    pub bottom_right: CellCoord,
    /// Every coord of the captured selection, absent cells as empty-default.
    pub cells: HashMap<CellCoord, Cell>,
}

impl ClipboardSnapshot {
    /// Captures the given coords from the grid. Absent cells snapshot as
    /// empty-default so pasting them clears the destination. Returns None
    /// for an empty coordinate list.
    pub fn capture(grid: &Grid, coords: &[CellCoord]) -> Option<Self> {
        let (top_left, bottom_right) = bounding_rect(coords)?;

        let cells = coords
            .iter()
            .map(|&coord| {
                let cell = grid.get_cell(coord).cloned().unwrap_or_default();
                (coord, cell)
            })
            .collect();

        Some(ClipboardSnapshot {
            top_left,
            bottom_right,
            cells,
        })
    }

    /// The component-wise offset that maps the snapshot's top-left corner
    /// onto the paste target.
    pub fn offset(&self, target: CellCoord) -> (i64, i64) {
        (
            target.0 as i64 - self.top_left.0 as i64,
            target.1 as i64 - self.top_left.1 as i64,
        )
    }

    /// Snapshot cells in row-major source order, paired with their
    /// destination for the given offset. Destinations never underflow:
    /// every source lies at or after the top-left corner.
    pub fn placements(&self, target: CellCoord) -> Vec<(CellCoord, &Cell)> {
        let (d_row, d_col) = self.offset(target);

        let mut sources: Vec<CellCoord> = self.cells.keys().copied().collect();
        sources.sort_unstable();

        sources
            .into_iter()
            .map(|src| {
                let dest = (
                    (src.0 as i64 + d_row) as u32,
                    (src.1 as i64 + d_col) as u32,
                );
                (dest, &self.cells[&src])
            })
            .collect()
    }

    /// Serializes the bounding rectangle for the system clipboard:
    /// delimiter-separated cells, newline-separated rows. Coordinates that
    /// were not part of the captured selection render as empty fields.
    pub fn to_delimited_text(&self, delimiter: char) -> String {
        let mut lines = Vec::new();
        for row in self.top_left.0..=self.bottom_right.0 {
            let mut fields = Vec::new();
            for col in self.top_left.1..=self.bottom_right.1 {
                let value = self
                    .cells
                    .get(&(row, col))
                    .map(|c| c.display.clone())
                    .unwrap_or_default();
                fields.push(value);
            }
            lines.push(fields.join(&delimiter.to_string()));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(values: &[(CellCoord, &str)]) -> Grid {
        let mut grid = Grid::new();
        for &(coord, value) in values {
            grid.set_cell(coord, Cell::from_raw(value));
        }
        grid
    }

    #[test]
    fn test_capture_records_rect_and_cells() {
        let grid = grid_with(&[((0, 0), "a"), ((1, 1), "b")]);
        let coords = vec![(0, 0), (0, 1), (1, 0), (1, 1)];
        let snap = ClipboardSnapshot::capture(&grid, &coords).unwrap();

        assert_eq!(snap.top_left, (0, 0));
        assert_eq!(snap.bottom_right, (1, 1));
        assert_eq!(snap.cells.len(), 4);
        // Absent source cells are captured as empty-default.
        assert_eq!(snap.cells[&(0, 1)], Cell::default());
    }

    #[test]
    fn test_capture_empty_selection() {
        let grid = Grid::new();
        assert!(ClipboardSnapshot::capture(&grid, &[]).is_none());
    }

    #[test]
    fn test_offset_and_placements() {
        let grid = grid_with(&[((0, 0), "a"), ((1, 1), "b")]);
        let snap =
            ClipboardSnapshot::capture(&grid, &[(0, 0), (0, 1), (1, 0), (1, 1)]).unwrap();

        assert_eq!(snap.offset((3, 3)), (3, 3));

        let placements = snap.placements((3, 3));
        let dests: Vec<CellCoord> = placements.iter().map(|&(d, _)| d).collect();
        assert_eq!(dests, vec![(3, 3), (3, 4), (4, 3), (4, 4)]);
        assert_eq!(placements[0].1.display, "a");
    }

    #[test]
    fn test_delimited_text_fills_gaps() {
        let grid = grid_with(&[((0, 0), "a"), ((1, 1), "b")]);
        // Non-rectangular capture: only two corners of a 2x2 rect.
        let snap = ClipboardSnapshot::capture(&grid, &[(0, 0), (1, 1)]).unwrap();

        assert_eq!(snap.to_delimited_text('\t'), "a\t\n\tb");
    }
}
