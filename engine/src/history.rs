//! FILENAME: engine/src/history.rs
//! PURPOSE: Linear undo/redo history of full-grid snapshots.
//! CONTEXT: Before every mutating operation the sheet records the grid as it
//! was. The history is a bounded sequence plus a cursor: entries before the
//! cursor are undoable pre-states, entries at/after it are redoable states
//! left behind by undos. A fresh edit truncates the redo branch; exceeding
//! the bound evicts the oldest entry. Undo and redo exchange the stored
//! snapshot with the live grid so both directions stay symmetric.

use crate::grid::Grid;
use serde::{Deserialize, Serialize};

/// Maximum number of snapshots kept by default.
pub const MAX_HISTORY_SIZE: usize = 100;

/// Bounded snapshot sequence with a cursor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct History {
    entries: Vec<Grid>,
    /// Position of the next record; entries[..index] are undoable.
    index: usize,
    max_size: usize,
}

impl History {
    pub fn new() -> Self {
        Self::with_max_size(MAX_HISTORY_SIZE)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        History {
            entries: Vec::new(),
            index: 0,
            max_size: max_size.max(1),
        }
    }

    /// Records the pre-mutation grid state. Discards any redo branch, then
    /// evicts the oldest entry if the bound is exceeded.
    pub fn record(&mut self, before: Grid) {
        self.entries.truncate(self.index);
        self.entries.push(before);
        if self.entries.len() > self.max_size {
            self.entries.remove(0);
        }
        self.index = self.entries.len();
    }

    /// Steps back one entry, restoring it into `grid`. The displaced live
    /// state is kept in the vacated slot so `redo` can bring it back.
    /// Returns false (leaving the grid untouched) when already at the
    /// earliest state.
    pub fn undo(&mut self, grid: &mut Grid) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        std::mem::swap(&mut self.entries[self.index], grid);
        true
    }

    /// Steps forward one entry. Returns false when already at the latest.
    pub fn redo(&mut self, grid: &mut Grid) -> bool {
        if self.index == self.entries.len() {
            return false;
        }
        std::mem::swap(&mut self.entries[self.index], grid);
        self.index += 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index < self.entries.len()
    }

    /// Drops all history.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = 0;
    }

    /// (undoable, redoable) entry counts, for UI state.
    pub fn depths(&self) -> (usize, usize) {
        (self.index, self.entries.len() - self.index)
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
