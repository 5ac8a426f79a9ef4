//! FILENAME: engine/src/lib.rs
//! PURPOSE: Main library entry point for the grid editing engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod address;
pub mod cell;
pub mod clipboard;
pub mod dependency_graph;
pub mod formula;
pub mod grid;
pub mod history;
pub mod range;
pub mod selection;
pub mod sheet;

// Re-export commonly used types at the crate root
pub use address::{col_to_index, coord_to_a1, index_to_col, Address, AddressError, CellCoord};
pub use cell::{Cell, CellError, CellStyle, StylePatch};
pub use clipboard::ClipboardSnapshot;
pub use dependency_graph::{DependencyGraph, RecalcPlan};
pub use formula::{Evaluator, Function, ParsedFormula};
pub use grid::Grid;
pub use history::{History, MAX_HISTORY_SIZE};
pub use range::{bounding_rect, expand, rect_coords};
pub use selection::{DragState, Selection, SelectionController};
pub use sheet::Sheet;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_resolves_addresses() {
        let addr = Address::parse("B3").unwrap();
        assert_eq!(addr.coord(), (2, 1));
        assert_eq!(coord_to_a1((2, 1)), "B3");
    }

    #[test]
    fn it_manages_grid() {
        let mut grid = Grid::new();
        grid.set_cell((0, 0), Cell::from_raw("Hello"));

        let retrieved = grid.get_cell((0, 0));
        assert!(retrieved.is_some());
        if let Some(c) = retrieved {
            assert_eq!(c.display, "Hello");
        }
    }

    #[test]
    fn integration_test_edit_and_recalc_workflow() {
        let mut sheet = Sheet::new();

        sheet.set_cell_content((0, 0), "10");
        sheet.set_cell_content((1, 0), "20");
        sheet.set_cell_content((0, 1), "=SUM(A1:A2)");
        assert_eq!(sheet.display_value((0, 1)), "30");

        // An input edit ripples through before control returns.
        sheet.set_cell_content((0, 0), "15");
        assert_eq!(sheet.display_value((0, 1)), "35");

        // Single-cell text functions track their reference the same way.
        sheet.set_cell_content((2, 0), "  padded  ");
        sheet.set_cell_content((2, 1), "=TRIM(A3)");
        assert_eq!(sheet.display_value((2, 1)), "padded");
    }

    #[test]
    fn integration_test_cycle_prevention() {
        let mut sheet = Sheet::new();

        sheet.set_cell_content((0, 0), "=SUM(B1:B1)");
        sheet.set_cell_content((0, 1), "=SUM(C1:C1)");
        // Closing the loop is rejected; the offending cell shows the token.
        sheet.set_cell_content((0, 2), "=SUM(A1:A1)");

        assert_eq!(sheet.display_value((0, 2)), "#CIRCULAR");
        assert_eq!(sheet.display_value((0, 0)), "0");
    }

    #[test]
    fn integration_test_copy_paste_with_retargeting() {
        let mut sheet = Sheet::new();

        sheet.set_cell_content((0, 0), "1");
        sheet.set_cell_content((1, 0), "2");
        sheet.set_cell_content((2, 0), "=SUM(A1:A2)");
        sheet.set_cell_content((0, 1), "30");
        sheet.set_cell_content((1, 1), "40");

        sheet.select(vec![(2, 0)]);
        sheet.copy();
        sheet.paste((2, 1));

        assert_eq!(
            sheet.cell((2, 1)).unwrap().formula.as_deref(),
            Some("=SUM(B1:B2)")
        );
        assert_eq!(sheet.display_value((2, 1)), "70");
    }

    #[test]
    fn integration_test_history_bound() {
        let mut sheet = Sheet::new();

        for i in 0..(MAX_HISTORY_SIZE + 10) {
            sheet.set_cell_content((0, 0), &i.to_string());
        }

        let mut undos = 0;
        while sheet.undo() {
            undos += 1;
        }
        assert_eq!(undos, MAX_HISTORY_SIZE);
    }
}
