//! FILENAME: engine/src/grid.rs
//! PURPOSE: Manages the bounded collection of cells (the grid).
//! CONTEXT: This file defines the `Grid` struct which acts as the container
//! for all cell data. It uses a sparse storage strategy (HashMap) so large
//! grids where most cells are empty stay cheap. Unlike an unbounded sheet,
//! the grid carries explicit row/column counts: coordinates outside those
//! bounds are never stored.

use crate::address::CellCoord;
use crate::cell::Cell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default dimensions for a fresh grid.
pub const DEFAULT_ROWS: u32 = 100;
pub const DEFAULT_COLS: u32 = 26;

/// The Grid holds the state of the editor's data.
/// Sparse representation: absent in-bounds entries are implicit empty cells
/// with default style.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    /// Sparse storage: keys are (row, col), 0-based.
    pub cells: HashMap<CellCoord, Cell>,
    pub row_count: u32,
    pub col_count: u32,
}

impl Grid {
    /// Creates an empty grid with the default dimensions.
    pub fn new() -> Self {
        Self::with_size(DEFAULT_ROWS, DEFAULT_COLS)
    }

    /// Creates an empty grid with the given dimensions.
    pub fn with_size(row_count: u32, col_count: u32) -> Self {
        Grid {
            cells: HashMap::new(),
            row_count,
            col_count,
        }
    }

    /// True when the coordinate lies inside the grid bounds.
    pub fn in_bounds(&self, coord: CellCoord) -> bool {
        coord.0 < self.row_count && coord.1 < self.col_count
    }

    /// Sets a cell at the given coordinate. Out-of-bounds coordinates are
    /// ignored; empty-default cells are stored as absence.
    pub fn set_cell(&mut self, coord: CellCoord, cell: Cell) {
        if !self.in_bounds(coord) {
            return;
        }
        if cell.is_empty_default() {
            self.cells.remove(&coord);
        } else {
            self.cells.insert(coord, cell);
        }
    }

    /// Retrieves a cell. Returns None for empty (unstored) cells.
    pub fn get_cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    /// The display string for a coordinate; empty cells display as "".
    pub fn display_value(&self, coord: CellCoord) -> String {
        self.cells
            .get(&coord)
            .map(|c| c.display.clone())
            .unwrap_or_default()
    }

    /// Resets a cell to empty-default (removes it from storage).
    pub fn clear_cell(&mut self, coord: CellCoord) {
        self.cells.remove(&coord);
    }

    /// Removes every cell, keeping the dimensions.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Coordinates of all formula cells, in no particular order.
    pub fn formula_coords(&self) -> Vec<CellCoord> {
        self.cells
            .iter()
            .filter(|(_, cell)| cell.formula.is_some())
            .map(|(&coord, _)| coord)
            .collect()
    }

    /// Appends one row at the bottom edge.
    pub fn add_row(&mut self) {
        self.row_count += 1;
    }

    /// Appends one column at the right edge.
    pub fn add_column(&mut self) {
        self.col_count += 1;
    }

    /// Removes the bottom row, destroying its cells.
    /// Returns the coordinates that were removed. No-op on a 1-row grid.
    pub fn delete_row(&mut self) -> Vec<CellCoord> {
        if self.row_count <= 1 {
            return Vec::new();
        }
        self.row_count -= 1;
        self.drop_out_of_bounds()
    }

    /// Removes the rightmost column, destroying its cells.
    /// Returns the coordinates that were removed. No-op on a 1-column grid.
    pub fn delete_column(&mut self) -> Vec<CellCoord> {
        if self.col_count <= 1 {
            return Vec::new();
        }
        self.col_count -= 1;
        self.drop_out_of_bounds()
    }

    fn drop_out_of_bounds(&mut self) -> Vec<CellCoord> {
        let doomed: Vec<CellCoord> = self
            .cells
            .keys()
            .copied()
            .filter(|&c| !self.in_bounds(c))
            .collect();
        for coord in &doomed {
            self.cells.remove(coord);
        }
        doomed
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
