//! FILENAME: persistence/src/lib.rs
//! Persistence Module
//!
//! Handles saving and loading sheets as delimited text (CSV/TSV).

mod delimited;
mod error;

pub use delimited::{export_display, load_sheet, read_rows, save_sheet, write_rows};
pub use error::PersistenceError;
