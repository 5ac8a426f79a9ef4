//! FILENAME: engine/src/selection.rs
//! PURPOSE: Maintains the rectangular selection and the pointer-drag state.
//! CONTEXT: The UI layer resolves pointer events to cell coordinates before
//! they reach the engine; this controller only runs the state machine
//! Idle -> Anchored (press) -> Dragging (move) -> Idle (release) and keeps
//! the active set equal to the anchor/focus rectangle, row-major.

use crate::address::CellCoord;
use crate::range::rect_coords;
use serde::{Deserialize, Serialize};

/// Where the controller is in a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragState {
    Idle,
    /// Pointer pressed on a cell, no movement yet.
    Anchored,
    /// Pointer moving with the button held.
    Dragging,
}

/// The current selection: fixed corner, moving corner, and the rectangle
/// they span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: CellCoord,
    pub focus: CellCoord,
    /// The inclusive anchor/focus rectangle, row-major.
    pub active: Vec<CellCoord>,
}

impl Selection {
    fn single(coord: CellCoord) -> Self {
        Selection {
            anchor: coord,
            focus: coord,
            active: vec![coord],
        }
    }
}

/// Drives selection changes from resolved pointer intents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionController {
    selection: Selection,
    state: DragState,
}

impl SelectionController {
    pub fn new() -> Self {
        SelectionController {
            selection: Selection::single((0, 0)),
            state: DragState::Idle,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Pointer press: anchor and focus collapse onto the target.
    pub fn start_drag(&mut self, target: CellCoord) {
        self.selection = Selection::single(target);
        self.state = DragState::Anchored;
    }

    /// Pointer move with the button held: focus follows, rectangle recomputes.
    /// Ignored when no drag is in progress.
    pub fn update_drag(&mut self, target: CellCoord) {
        if self.state == DragState::Idle {
            return;
        }
        self.state = DragState::Dragging;
        self.selection.focus = target;
        self.selection.active = rect_coords(self.selection.anchor, target);
    }

    /// Pointer release ends the interaction; the selection stays.
    pub fn end_drag(&mut self) {
        self.state = DragState::Idle;
    }

    /// Modifier-extended click: recompute the rectangle from the existing
    /// anchor to the clicked cell without moving the anchor.
    pub fn extend_to(&mut self, target: CellCoord) {
        self.selection.focus = target;
        self.selection.active = rect_coords(self.selection.anchor, target);
    }

    /// Select an explicit coordinate list (e.g., a programmatic selection).
    /// Anchor and focus land on the first and last coordinates.
    pub fn select(&mut self, coords: Vec<CellCoord>) {
        if coords.is_empty() {
            return;
        }
        self.selection.anchor = coords[0];
        self.selection.focus = *coords.last().unwrap_or(&coords[0]);
        self.selection.active = coords;
        self.state = DragState::Idle;
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}
