//! FILENAME: engine/src/sheet.rs
//! PURPOSE: The edit API and write path coordinating all engine components.
//! CONTEXT: `Sheet` owns the grid, the dependency graph, the selection
//! controller, the clipboard slot, and the history. Every mutation funnels
//! through here: a history snapshot is recorded first, the grid is written,
//! and affected dependents recalculate before control returns. All of it is
//! single-threaded and synchronous; callers never observe a half-applied
//! write.

use crate::address::CellCoord;
use crate::cell::{Cell, CellError, CellStyle, StylePatch};
use crate::clipboard::ClipboardSnapshot;
use crate::dependency_graph::DependencyGraph;
use crate::formula::{self, Evaluator};
use crate::grid::Grid;
use crate::history::History;
use crate::selection::{Selection, SelectionController};
use log::{debug, warn};
use std::collections::HashSet;

/// A single editable grid with formulas, selection, clipboard, and history.
pub struct Sheet {
    grid: Grid,
    graph: DependencyGraph,
    selection: SelectionController,
    clipboard: Option<ClipboardSnapshot>,
    history: History,
}

impl Sheet {
    pub fn new() -> Self {
        Self::from_grid(Grid::new())
    }

    pub fn with_size(rows: u32, cols: u32) -> Self {
        Self::from_grid(Grid::with_size(rows, cols))
    }

    fn from_grid(grid: Grid) -> Self {
        Sheet {
            grid,
            graph: DependencyGraph::new(),
            selection: SelectionController::new(),
            clipboard: None,
            history: History::new(),
        }
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn row_count(&self) -> u32 {
        self.grid.row_count
    }

    pub fn col_count(&self) -> u32 {
        self.grid.col_count
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.grid.get_cell(coord)
    }

    pub fn display_value(&self, coord: CellCoord) -> String {
        self.grid.display_value(coord)
    }

    pub fn selection(&self) -> &Selection {
        self.selection.selection()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Cell edits
    // ------------------------------------------------------------------

    /// Sets a cell's content from raw user text. A leading `=` makes it a
    /// formula. The write and the recalculation of every affected dependent
    /// complete before this returns.
    pub fn set_cell_content(&mut self, coord: CellCoord, raw: &str) {
        if !self.grid.in_bounds(coord) {
            warn!("edit outside grid bounds ignored: {:?}", coord);
            return;
        }
        self.history.record(self.grid.clone());

        let style = self
            .grid
            .get_cell(coord)
            .map(|c| c.style.clone())
            .unwrap_or_default();
        self.write_cell(coord, raw, style);
        self.recalc_from(coord);
    }

    /// Applies a partial style update. Styles never affect evaluation, so
    /// no recalculation runs.
    pub fn set_cell_style(&mut self, coord: CellCoord, patch: &StylePatch) {
        if !self.grid.in_bounds(coord) {
            warn!("style edit outside grid bounds ignored: {:?}", coord);
            return;
        }
        self.history.record(self.grid.clone());

        let mut cell = self.grid.get_cell(coord).cloned().unwrap_or_default();
        cell.style.apply(patch);
        self.grid.set_cell(coord, cell);
    }

    /// Core write: classifies the raw text, maintains the dependency graph
    /// (rejecting writes that would close a cycle), evaluates formulas, and
    /// stores the cell. Does not touch history and does not recalculate
    /// dependents; callers handle both.
    fn write_cell(&mut self, coord: CellCoord, raw: &str, style: CellStyle) {
        if raw.is_empty() {
            self.graph.clear_dependencies(coord);
            let mut cell = Cell::new();
            cell.style = style;
            self.grid.set_cell(coord, cell);
            return;
        }

        let mut cell = Cell::from_raw(raw);
        cell.style = style;

        if let Some(formula) = cell.formula.clone() {
            let deps =
                formula::referenced_coords(&formula, self.grid.row_count, self.grid.col_count);
            if self.graph.would_create_cycle(coord, &deps) {
                warn!("cycle rejected at {:?}: {}", coord, formula);
                self.graph.clear_dependencies(coord);
                cell.display = CellError::Circular.token().to_string();
            } else {
                self.graph.set_dependencies(coord, deps);
                cell.display = match Evaluator::new(&self.grid).evaluate(&formula) {
                    Ok(value) => value,
                    Err(err) => err.token().to_string(),
                };
            }
        } else {
            self.graph.clear_dependencies(coord);
        }

        self.grid.set_cell(coord, cell);
    }

    /// Re-evaluates one formula cell in place against the current grid.
    fn reevaluate(&mut self, coord: CellCoord) {
        let formula = match self.grid.get_cell(coord).and_then(|c| c.formula.clone()) {
            Some(f) => f,
            None => return,
        };
        let display = match Evaluator::new(&self.grid).evaluate(&formula) {
            Ok(value) => value,
            Err(err) => err.token().to_string(),
        };
        if let Some(cell) = self.grid.cells.get_mut(&coord) {
            cell.display = display;
        }
    }

    /// Recomputes every transitive dependent of a changed coordinate in
    /// dependency order; cycle leftovers display the circular token.
    fn recalc_from(&mut self, coord: CellCoord) {
        let plan = self.graph.recalc_plan(coord);
        if !plan.order.is_empty() || !plan.cyclic.is_empty() {
            debug!(
                "recalc from {:?}: {} ordered, {} cyclic",
                coord,
                plan.order.len(),
                plan.cyclic.len()
            );
        }
        for dependent in plan.order {
            self.reevaluate(dependent);
        }
        for stuck in plan.cyclic {
            self.mark_circular(stuck);
        }
    }

    fn mark_circular(&mut self, coord: CellCoord) {
        if let Some(cell) = self.grid.cells.get_mut(&coord) {
            cell.display = CellError::Circular.token().to_string();
        }
    }

    // ------------------------------------------------------------------
    // Selection & drag
    // ------------------------------------------------------------------

    pub fn select(&mut self, coords: Vec<CellCoord>) {
        self.selection.select(coords);
    }

    pub fn start_drag(&mut self, target: CellCoord) {
        self.selection.start_drag(target);
    }

    pub fn update_drag(&mut self, target: CellCoord) {
        self.selection.update_drag(target);
    }

    pub fn end_drag(&mut self) {
        self.selection.end_drag();
    }

    /// Shift-click extension from the current anchor.
    pub fn extend_selection(&mut self, target: CellCoord) {
        self.selection.extend_to(target);
    }

    // ------------------------------------------------------------------
    // Clipboard
    // ------------------------------------------------------------------

    /// Snapshots the current selection. Replaces any previous snapshot.
    pub fn copy(&mut self) {
        self.clipboard =
            ClipboardSnapshot::capture(&self.grid, &self.selection.selection().active);
    }

    /// Copy, then reset every source cell to empty-default, as one history
    /// entry.
    pub fn cut(&mut self) {
        let snapshot =
            match ClipboardSnapshot::capture(&self.grid, &self.selection.selection().active) {
                Some(s) => s,
                None => return,
            };
        self.history.record(self.grid.clone());

        let sources: Vec<CellCoord> = self.selection.selection().active.clone();
        for coord in &sources {
            self.graph.clear_dependencies(*coord);
            self.grid.clear_cell(*coord);
        }
        for coord in sources {
            self.recalc_from(coord);
        }
        self.clipboard = Some(snapshot);
    }

    /// Pastes the snapshot at a target anchor. Destinations outside the
    /// grid bounds are skipped; formula references are re-targeted by the
    /// paste offset (absolute axes stay pinned).
    pub fn paste(&mut self, target: CellCoord) {
        let snapshot = match self.clipboard.clone() {
            Some(s) => s,
            None => return,
        };
        self.history.record(self.grid.clone());

        let (d_row, d_col) = snapshot.offset(target);
        for (dest, cell) in snapshot.placements(target) {
            if !self.grid.in_bounds(dest) {
                warn!("paste destination out of bounds, skipped: {:?}", dest);
                continue;
            }
            let raw = match &cell.formula {
                Some(f) => formula::translate(f, d_row, d_col),
                None => cell.raw.clone(),
            };
            self.write_cell(dest, &raw, cell.style.clone());
            self.recalc_from(dest);
        }
    }

    /// Textual serialization of the last copied rectangle for the system
    /// clipboard. None when nothing has been copied.
    pub fn clipboard_text(&self, delimiter: char) -> Option<String> {
        self.clipboard
            .as_ref()
            .map(|snap| snap.to_delimited_text(delimiter))
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Restores the previous grid snapshot. Selection and clipboard are
    /// untouched. Returns false when at the earliest state.
    pub fn undo(&mut self) -> bool {
        let restored = self.history.undo(&mut self.grid);
        if restored {
            self.rebuild_graph();
        }
        restored
    }

    /// Re-applies an undone snapshot. Returns false when at the latest.
    pub fn redo(&mut self) -> bool {
        let restored = self.history.redo(&mut self.grid);
        if restored {
            self.rebuild_graph();
        }
        restored
    }

    /// Reconstructs the dependency graph from the grid's formula cells.
    /// Snapshots store evaluated displays, so no re-evaluation is needed;
    /// cells that were rejected as circular stay unhooked.
    fn rebuild_graph(&mut self) {
        self.graph.clear();
        let mut coords = self.grid.formula_coords();
        coords.sort_unstable();
        for coord in coords {
            let formula = match self.grid.get_cell(coord).and_then(|c| c.formula.clone()) {
                Some(f) => f,
                None => continue,
            };
            let deps =
                formula::referenced_coords(&formula, self.grid.row_count, self.grid.col_count);
            if !self.graph.would_create_cycle(coord, &deps) {
                self.graph.set_dependencies(coord, deps);
            }
        }
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Appends one row at the bottom edge. Dependency sets are clamped to
    /// the bounds at write time, so formulas whose textual ranges reach past
    /// the old edge get re-hooked against the grown grid.
    pub fn add_row(&mut self) {
        self.history.record(self.grid.clone());
        self.grid.add_row();
        self.rebuild_graph();
    }

    /// Appends one column at the right edge, re-hooking clamped ranges like
    /// `add_row`.
    pub fn add_column(&mut self) {
        self.history.record(self.grid.clone());
        self.grid.add_column();
        self.rebuild_graph();
    }

    /// Removes the bottom row. Cells destroyed by the shrink are unhooked
    /// from the graph and their surviving readers recalculate.
    pub fn delete_row(&mut self) {
        self.history.record(self.grid.clone());
        let removed = self.grid.delete_row();
        self.after_structural_removal(removed);
    }

    /// Removes the rightmost column, with the same recalculation contract
    /// as `delete_row`.
    pub fn delete_column(&mut self) {
        self.history.record(self.grid.clone());
        let removed = self.grid.delete_column();
        self.after_structural_removal(removed);
    }

    fn after_structural_removal(&mut self, removed: Vec<CellCoord>) {
        for coord in &removed {
            self.graph.clear_dependencies(*coord);
        }
        for coord in removed {
            self.recalc_from(coord);
        }
    }

    /// Resets every cell, keeping dimensions, selection, and clipboard.
    pub fn clear(&mut self) {
        self.history.record(self.grid.clone());
        self.grid.clear();
        self.graph.clear();
    }

    // ------------------------------------------------------------------
    // Bulk import/export
    // ------------------------------------------------------------------

    /// Loads a row-major table of raw field strings, replacing the grid's
    /// contents. Runs in two phases: every raw value is applied first, then
    /// all formulas are hooked up and evaluated in one dependency-ordered
    /// batch, so a formula may reference cells that appear later in the
    /// table.
    pub fn import_rows(&mut self, rows: &[Vec<String>]) {
        self.history.record(self.grid.clone());
        self.grid.clear();
        self.graph.clear();

        // Phase 1: raw values only; formulas stay unevaluated.
        for (r, row) in rows.iter().enumerate() {
            for (c, field) in row.iter().enumerate() {
                let coord = (r as u32, c as u32);
                if !self.grid.in_bounds(coord) {
                    warn!("imported field out of bounds, skipped: {:?}", coord);
                    continue;
                }
                if field.is_empty() {
                    continue;
                }
                self.grid.set_cell(coord, Cell::from_raw(field.clone()));
            }
        }

        // Phase 2: hook up every formula, then evaluate the whole batch in
        // dependency order. Cycles are tokenized and unhooked.
        let mut coords = self.grid.formula_coords();
        coords.sort_unstable();
        for &coord in &coords {
            if let Some(f) = self.grid.get_cell(coord).and_then(|c| c.formula.clone()) {
                let deps =
                    formula::referenced_coords(&f, self.grid.row_count, self.grid.col_count);
                self.graph.set_dependencies(coord, deps);
            }
        }

        let plan = self.graph.full_recalc_plan();
        debug!(
            "import batch: {} formulas, {} cyclic",
            plan.order.len(),
            plan.cyclic.len()
        );
        let handled: HashSet<CellCoord> =
            plan.order.iter().chain(plan.cyclic.iter()).copied().collect();

        for coord in &plan.order {
            self.reevaluate(*coord);
        }
        for coord in plan.cyclic {
            self.mark_circular(coord);
            self.graph.clear_dependencies(coord);
        }
        // Formulas with no in-grid references never enter the graph's plan.
        for coord in coords {
            if !handled.contains(&coord) && self.graph.precedents_of(coord).is_none() {
                self.reevaluate(coord);
            }
        }
    }

    /// Exports the full bounded grid as row-major display values.
    pub fn export_rows(&self) -> Vec<Vec<String>> {
        (0..self.grid.row_count)
            .map(|row| {
                (0..self.grid.col_count)
                    .map(|col| self.grid.display_value((row, col)))
                    .collect()
            })
            .collect()
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_and_formula_write() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "2");
        sheet.set_cell_content((1, 0), "3");
        sheet.set_cell_content((2, 0), "=SUM(A1:A2)");

        assert_eq!(sheet.display_value((2, 0)), "5");
        assert_eq!(
            sheet.cell((2, 0)).unwrap().formula.as_deref(),
            Some("=SUM(A1:A2)")
        );
    }

    #[test]
    fn test_edit_triggers_dependent_recalc() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "1");
        sheet.set_cell_content((1, 0), "2");
        sheet.set_cell_content((2, 0), "=SUM(A1:A2)");
        assert_eq!(sheet.display_value((2, 0)), "3");

        sheet.set_cell_content((0, 0), "5");
        assert_eq!(sheet.display_value((2, 0)), "7");
    }

    #[test]
    fn test_chained_recalc() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "1");
        sheet.set_cell_content((1, 0), "=SUM(A1:A1)");
        sheet.set_cell_content((2, 0), "=SUM(A2:A2)");

        sheet.set_cell_content((0, 0), "9");
        assert_eq!(sheet.display_value((1, 0)), "9");
        assert_eq!(sheet.display_value((2, 0)), "9");
    }

    #[test]
    fn test_direct_cycle_is_tokenized() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "=SUM(A1:A2)");
        assert_eq!(sheet.display_value((0, 0)), "#CIRCULAR");
    }

    #[test]
    fn test_transitive_cycle_is_tokenized() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "=SUM(B1:B1)");
        sheet.set_cell_content((0, 1), "=SUM(A1:A1)");

        assert_eq!(sheet.display_value((0, 1)), "#CIRCULAR");
        // The first formula is untouched by the rejected write.
        assert_eq!(sheet.display_value((0, 0)), "0");
    }

    #[test]
    fn test_unknown_function_token() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "=BOGUS(A1:A2)");
        assert_eq!(sheet.display_value((0, 0)), "#NAME?");
    }

    #[test]
    fn test_clearing_input_unhooks_formula() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "1");
        sheet.set_cell_content((1, 0), "=SUM(A1:A1)");
        sheet.set_cell_content((1, 0), "");

        assert!(sheet.cell((1, 0)).is_none());
        // A1 edits no longer ripple anywhere.
        sheet.set_cell_content((0, 0), "7");
        assert!(sheet.cell((1, 0)).is_none());
    }

    #[test]
    fn test_style_patch_preserved_across_content_edit() {
        let mut sheet = Sheet::new();
        sheet.set_cell_style(
            (0, 0),
            &StylePatch {
                bold: Some(true),
                ..Default::default()
            },
        );
        sheet.set_cell_content((0, 0), "text");

        let cell = sheet.cell((0, 0)).unwrap();
        assert!(cell.style.bold);
        assert_eq!(cell.display, "text");
    }

    #[test]
    fn test_copy_paste_rectangle() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "a");
        sheet.set_cell_content((0, 1), "b");
        sheet.set_cell_content((1, 0), "c");
        sheet.set_cell_content((1, 1), "d");

        sheet.start_drag((0, 0));
        sheet.update_drag((1, 1));
        sheet.end_drag();
        sheet.copy();
        sheet.paste((3, 3));

        assert_eq!(sheet.display_value((3, 3)), "a");
        assert_eq!(sheet.display_value((3, 4)), "b");
        assert_eq!(sheet.display_value((4, 3)), "c");
        assert_eq!(sheet.display_value((4, 4)), "d");
        // Source untouched.
        assert_eq!(sheet.display_value((0, 0)), "a");
    }

    #[test]
    fn test_paste_skips_out_of_bounds() {
        let mut sheet = Sheet::with_size(4, 4);
        sheet.set_cell_content((0, 0), "a");
        sheet.set_cell_content((1, 1), "d");

        sheet.start_drag((0, 0));
        sheet.update_drag((1, 1));
        sheet.end_drag();
        sheet.copy();
        sheet.paste((3, 3));

        // Only the top-left cell of the 2x2 block fits.
        assert_eq!(sheet.display_value((3, 3)), "a");
        assert_eq!(sheet.row_count(), 4);
        assert_eq!(sheet.col_count(), 4);
    }

    #[test]
    fn test_paste_retargets_relative_formula() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "1");
        sheet.set_cell_content((1, 0), "2");
        sheet.set_cell_content((0, 2), "10");
        sheet.set_cell_content((1, 2), "20");
        sheet.set_cell_content((2, 0), "=SUM(A1:A2)");

        sheet.select(vec![(2, 0)]);
        sheet.copy();
        sheet.paste((2, 2));

        assert_eq!(
            sheet.cell((2, 2)).unwrap().formula.as_deref(),
            Some("=SUM(C1:C2)")
        );
        assert_eq!(sheet.display_value((2, 2)), "30");
    }

    #[test]
    fn test_paste_keeps_absolute_refs_pinned() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "5");
        sheet.set_cell_content((1, 0), "=SUM($A$1:$A$1)");

        sheet.select(vec![(1, 0)]);
        sheet.copy();
        sheet.paste((3, 3));

        assert_eq!(
            sheet.cell((3, 3)).unwrap().formula.as_deref(),
            Some("=SUM($A$1:$A$1)")
        );
        assert_eq!(sheet.display_value((3, 3)), "5");
    }

    #[test]
    fn test_cut_clears_sources_and_recalculates() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "4");
        sheet.set_cell_content((1, 0), "=SUM(A1:A1)");

        sheet.select(vec![(0, 0)]);
        sheet.cut();

        assert!(sheet.cell((0, 0)).is_none());
        assert_eq!(sheet.display_value((1, 0)), "0");

        sheet.paste((0, 1));
        assert_eq!(sheet.display_value((0, 1)), "4");
    }

    #[test]
    fn test_cut_is_single_undo_step() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "x");
        sheet.set_cell_content((0, 1), "y");

        sheet.select(vec![(0, 0), (0, 1)]);
        sheet.cut();
        assert!(sheet.cell((0, 0)).is_none());
        assert!(sheet.cell((0, 1)).is_none());

        sheet.undo();
        assert_eq!(sheet.display_value((0, 0)), "x");
        assert_eq!(sheet.display_value((0, 1)), "y");
    }

    #[test]
    fn test_undo_redo_roundtrip() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "1");
        sheet.set_cell_content((0, 0), "2");

        assert!(sheet.undo());
        assert_eq!(sheet.display_value((0, 0)), "1");
        assert!(sheet.redo());
        assert_eq!(sheet.display_value((0, 0)), "2");
        assert!(!sheet.redo());
    }

    #[test]
    fn test_undo_restores_dependency_tracking() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "1");
        sheet.set_cell_content((1, 0), "=SUM(A1:A1)");
        sheet.set_cell_content((1, 0), "literal");

        assert!(sheet.undo());
        assert_eq!(sheet.display_value((1, 0)), "1");

        // The restored formula must react to edits again.
        sheet.set_cell_content((0, 0), "8");
        assert_eq!(sheet.display_value((1, 0)), "8");
    }

    #[test]
    fn test_edit_after_undo_truncates_redo() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "1");
        sheet.set_cell_content((0, 0), "2");
        sheet.undo();

        sheet.set_cell_content((0, 0), "3");
        assert!(!sheet.can_redo());
        assert!(!sheet.redo());
        assert_eq!(sheet.display_value((0, 0)), "3");
    }

    #[test]
    fn test_undo_leaves_selection_and_clipboard() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "v");
        sheet.select(vec![(0, 0)]);
        sheet.copy();
        sheet.set_cell_content((0, 1), "w");

        sheet.undo();
        assert_eq!(sheet.selection().anchor, (0, 0));
        assert_eq!(sheet.clipboard_text('\t').unwrap(), "v");
    }

    #[test]
    fn test_oversized_range_write_is_bounded() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((5, 5), "7");
        // The textual rectangle dwarfs the grid; only in-bounds cells count.
        sheet.set_cell_content((0, 0), "=SUM(B1:ZZZZ999999)");
        assert_eq!(sheet.display_value((0, 0)), "7");

        // Overlong column letters degrade like any malformed reference.
        sheet.set_cell_content((0, 1), "=SUM(A1:AAAAAAA9)");
        assert_eq!(sheet.display_value((0, 1)), "0");
    }

    #[test]
    fn test_add_row_rehooks_clamped_ranges() {
        let mut sheet = Sheet::with_size(2, 2);
        sheet.set_cell_content((0, 1), "=SUM(A1:A3)");
        assert_eq!(sheet.display_value((0, 1)), "0");

        sheet.add_row();
        sheet.set_cell_content((2, 0), "5");
        assert_eq!(sheet.display_value((0, 1)), "5");
    }

    #[test]
    fn test_delete_row_recalculates_readers() {
        let mut sheet = Sheet::with_size(3, 3);
        sheet.set_cell_content((2, 0), "7");
        sheet.set_cell_content((0, 1), "=SUM(A1:A3)");
        assert_eq!(sheet.display_value((0, 1)), "7");

        sheet.delete_row();
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.display_value((0, 1)), "0");
    }

    #[test]
    fn test_clear_resets_cells_keeps_bounds() {
        let mut sheet = Sheet::with_size(5, 5);
        sheet.set_cell_content((0, 0), "x");
        sheet.clear();

        assert!(sheet.cell((0, 0)).is_none());
        assert_eq!(sheet.row_count(), 5);
        assert!(sheet.can_undo());
    }

    #[test]
    fn test_import_is_two_phase() {
        let mut sheet = Sheet::new();
        // The formula appears before the cells it reads.
        sheet.import_rows(&[
            vec!["=SUM(A2:A3)".to_string()],
            vec!["2".to_string()],
            vec!["3".to_string()],
        ]);

        assert_eq!(sheet.display_value((0, 0)), "5");
    }

    #[test]
    fn test_import_detects_cycles() {
        let mut sheet = Sheet::new();
        sheet.import_rows(&[
            vec!["=SUM(A2:A2)".to_string()],
            vec!["=SUM(A1:A1)".to_string()],
        ]);

        assert_eq!(sheet.display_value((0, 0)), "#CIRCULAR");
        assert_eq!(sheet.display_value((1, 0)), "#CIRCULAR");
    }

    #[test]
    fn test_export_rows_covers_bounds() {
        let mut sheet = Sheet::with_size(2, 3);
        sheet.set_cell_content((0, 0), "a");
        sheet.set_cell_content((1, 2), "b");

        assert_eq!(
            sheet.export_rows(),
            vec![
                vec!["a".to_string(), String::new(), String::new()],
                vec![String::new(), String::new(), "b".to_string()],
            ]
        );
    }

    #[test]
    fn test_clipboard_text_serialization() {
        let mut sheet = Sheet::new();
        sheet.set_cell_content((0, 0), "1");
        sheet.set_cell_content((0, 1), "2");
        sheet.set_cell_content((1, 0), "3");

        sheet.start_drag((0, 0));
        sheet.update_drag((1, 1));
        sheet.end_drag();
        sheet.copy();

        assert_eq!(sheet.clipboard_text('\t').unwrap(), "1\t2\n3\t");
    }
}
