//! FILENAME: engine/src/address.rs
//! PURPOSE: Utilities for converting between grid coordinate formats.
//! CONTEXT: This module provides functions to convert between A1-style notation
//! (e.g., "A1", "$B$2", "AA100") and 0-based (row, col) numeric indices used
//! internally. Column "A" = 0, "B" = 1, ..., "Z" = 25, "AA" = 26, etc.
//! Row 1 in A1 notation = row 0 internally. A `$` before the column letters
//! or the row digits marks that axis as absolute.

use serde::{Deserialize, Serialize};

/// A cell coordinate as (row, col) with 0-based indices.
pub type CellCoord = (u32, u32);

/// Error returned when reference text cannot be parsed as an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressError {
    /// The text that failed to parse.
    pub input: String,
}

impl std::fmt::Display for AddressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid cell address: {:?}", self.input)
    }
}

impl std::error::Error for AddressError {}

/// A parsed cell reference with per-axis absolute markers.
///
/// `row` and `col` are 0-based; the textual row is 1-based. The absolute
/// flags only matter for clipboard re-targeting: two addresses with the
/// same coordinate but different markers resolve to the same cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub row: u32,
    pub col: u32,
    pub col_absolute: bool,
    pub row_absolute: bool,
}

impl Address {
    /// Creates a relative address (no `$` markers).
    pub fn new(row: u32, col: u32) -> Self {
        Address {
            row,
            col,
            col_absolute: false,
            row_absolute: false,
        }
    }

    /// The plain (row, col) coordinate, discarding absolute markers.
    pub fn coord(&self) -> CellCoord {
        (self.row, self.col)
    }

    /// Parses A1-style reference text into an `Address`.
    ///
    /// Accepts an optional `$` before the column letters and before the row
    /// digits. Letters are case-insensitive. Fails if the letter run is
    /// empty, the remainder is not purely digits, the row is 0, or trailing
    /// characters remain.
    pub fn parse(text: &str) -> Result<Address, AddressError> {
        let err = || AddressError {
            input: text.to_string(),
        };

        let mut rest = text.trim();
        let col_absolute = rest.starts_with('$');
        if col_absolute {
            rest = &rest[1..];
        }

        let letters: usize = rest
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .count();
        if letters == 0 {
            return Err(err());
        }
        let (col_str, mut rest) = rest.split_at(letters);

        let row_absolute = rest.starts_with('$');
        if row_absolute {
            rest = &rest[1..];
        }

        if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        let row_num: u32 = rest.parse().map_err(|_| err())?;
        if row_num == 0 {
            return Err(err());
        }

        Ok(Address {
            row: row_num - 1,
            col: col_to_index(col_str).ok_or_else(err)?,
            col_absolute,
            row_absolute,
        })
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.col_absolute {
            write!(f, "$")?;
        }
        write!(f, "{}", index_to_col(self.col))?;
        if self.row_absolute {
            write!(f, "$")?;
        }
        write!(f, "{}", self.row + 1)
    }
}

/// Converts a column string (e.g., "A", "AA", "ABC") to a 0-based column index.
/// "A" -> 0, "B" -> 1, ..., "Z" -> 25, "AA" -> 26, "AB" -> 27, etc.
///
/// Input is case-insensitive. The caller guarantees the string is purely
/// alphabetic (the parser enforces this). Returns None when the letter run
/// exceeds the `u32` coordinate space instead of wrapping.
pub fn col_to_index(col_str: &str) -> Option<u32> {
    let mut result: u32 = 0;
    for c in col_str.chars() {
        let digit = (c.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
        result = result.checked_mul(26)?.checked_add(digit)?;
    }
    result.checked_sub(1) // Convert to 0-based
}

/// Converts a 0-based column index to a column string.
/// 0 -> "A", 1 -> "B", ..., 25 -> "Z", 26 -> "AA", 27 -> "AB", etc.
pub fn index_to_col(mut col_index: u32) -> String {
    let mut result = String::new();
    loop {
        let remainder = col_index % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if col_index < 26 {
            break;
        }
        col_index = col_index / 26 - 1;
    }
    result
}

/// Converts a 0-based (row, col) coordinate to an A1-style reference string.
/// (0, 0) -> "A1", (1, 1) -> "B2", (99, 26) -> "AA100"
pub fn coord_to_a1(coord: CellCoord) -> String {
    let (row, col) = coord;
    format!("{}{}", index_to_col(col), row + 1)
}
