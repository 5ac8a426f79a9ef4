//! FILENAME: engine/src/cell.rs
//! PURPOSE: Defines the fundamental data structures for a single grid cell.
//! CONTEXT: This file contains the `Cell` struct, the `CellError` token enum,
//! and the flat `CellStyle` attributes. It separates the user's raw input
//! (which may be a formula) from the evaluated display string.

use serde::{Deserialize, Serialize};

/// Represents the error tokens a cell can display (e.g., #DIV0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellError {
    /// Empty numeric operand set for AVERAGE
    Div0,
    /// Unknown function name or malformed argument list
    Name,
    /// Aggregate over a range with no numeric values
    Value,
    /// Self-referential dependency chain
    Circular,
}

impl CellError {
    /// The token shown in the cell's display slot.
    pub fn token(&self) -> &'static str {
        match self {
            CellError::Div0 => "#DIV0",
            CellError::Name => "#NAME?",
            CellError::Value => "#VALUE!",
            CellError::Circular => "#CIRCULAR",
        }
    }
}

impl std::fmt::Display for CellError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// Flat per-cell style attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    pub bold: bool,
    pub italic: bool,
    pub font_size: u32,
    pub color: String,
}

impl Default for CellStyle {
    fn default() -> Self {
        CellStyle {
            bold: false,
            italic: false,
            font_size: 12,
            color: "#000000".to_string(),
        }
    }
}

/// A partial style update: `None` fields keep the cell's current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StylePatch {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub font_size: Option<u32>,
    pub color: Option<String>,
}

impl CellStyle {
    /// Merges a partial update into this style.
    pub fn apply(&mut self, patch: &StylePatch) {
        if let Some(bold) = patch.bold {
            self.bold = bold;
        }
        if let Some(italic) = patch.italic {
            self.italic = italic;
        }
        if let Some(size) = patch.font_size {
            self.font_size = size;
        }
        if let Some(ref color) = patch.color {
            self.color = color.clone();
        }
    }
}

/// The atomic unit of the grid.
///
/// Invariant: `formula` is `Some` exactly when `raw` begins with `=`, and
/// `display` always holds the evaluated/literal result, never formula text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// The text the user typed.
    pub raw: String,
    /// The formula text (including the leading `=`) when `raw` is a formula.
    pub formula: Option<String>,
    /// The evaluated result or the literal value, as displayed.
    pub display: String,
    pub style: CellStyle,
}

impl Cell {
    pub fn new() -> Self {
        Cell {
            raw: String::new(),
            formula: None,
            display: String::new(),
            style: CellStyle::default(),
        }
    }

    /// Builds a cell from raw user input, classifying formula vs. literal.
    /// Formula cells start with an empty display; the caller evaluates.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.starts_with('=') {
            Cell {
                formula: Some(raw.clone()),
                raw,
                display: String::new(),
                style: CellStyle::default(),
            }
        } else {
            Cell {
                display: raw.clone(),
                raw,
                formula: None,
                style: CellStyle::default(),
            }
        }
    }

    /// True when the cell holds no content and default style.
    pub fn is_empty_default(&self) -> bool {
        self.raw.is_empty() && self.style == CellStyle::default()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_literal() {
        let cell = Cell::from_raw("hello");
        assert_eq!(cell.raw, "hello");
        assert!(cell.formula.is_none());
        assert_eq!(cell.display, "hello");
    }

    #[test]
    fn test_from_raw_formula() {
        let cell = Cell::from_raw("=SUM(A1:A3)");
        assert_eq!(cell.formula.as_deref(), Some("=SUM(A1:A3)"));
        assert_eq!(cell.display, "");
    }

    #[test]
    fn test_style_patch_merges() {
        let mut style = CellStyle::default();
        style.apply(&StylePatch {
            bold: Some(true),
            font_size: Some(16),
            ..Default::default()
        });
        assert!(style.bold);
        assert!(!style.italic);
        assert_eq!(style.font_size, 16);
        assert_eq!(style.color, "#000000");
    }

    #[test]
    fn test_error_tokens() {
        assert_eq!(CellError::Div0.to_string(), "#DIV0");
        assert_eq!(CellError::Name.to_string(), "#NAME?");
        assert_eq!(CellError::Circular.to_string(), "#CIRCULAR");
    }

    #[test]
    fn test_cell_json_round_trip() {
        let mut cell = Cell::from_raw("=SUM(A1:A2)");
        cell.style.bold = true;

        let json = serde_json::to_string(&cell).unwrap();
        let back: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cell);
    }
}
