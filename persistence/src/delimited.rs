//! FILENAME: persistence/src/delimited.rs
//! PURPOSE: Reads and writes sheets as delimiter-separated text (CSV/TSV).
//! CONTEXT: Loading feeds the row table through the sheet's two-phase batch
//! import, so formulas may reference cells that appear later in the file.
//! Saving comes in two flavors: source text (raw input, formulas preserved,
//! round-trips through load) and display text (evaluated values, for
//! interop with other tools).

use crate::error::PersistenceError;
use engine::{CellCoord, Sheet};
use log::debug;
use std::io::{Read, Write};

/// Rejects delimiters that collide with the quoting or record framing.
fn validate_delimiter(delimiter: u8) -> Result<(), PersistenceError> {
    match delimiter {
        b'"' | b'\n' | b'\r' => Err(PersistenceError::InvalidFormat(format!(
            "delimiter {:?} conflicts with field quoting",
            delimiter as char
        ))),
        _ => Ok(()),
    }
}

/// Parses delimited text into a row-major table of raw field strings.
/// Records may have differing lengths; short rows simply end early.
pub fn read_rows<R: Read>(reader: R, delimiter: u8) -> Result<Vec<Vec<String>>, PersistenceError> {
    validate_delimiter(delimiter)?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Writes a row-major table as delimited text.
pub fn write_rows<W: Write>(
    writer: W,
    rows: &[Vec<String>],
    delimiter: u8,
) -> Result<(), PersistenceError> {
    validate_delimiter(delimiter)?;
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(writer);

    for row in rows {
        csv_writer.write_record(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Loads a new sheet from delimited text. Formulas evaluate as one batch
/// after every raw value is in place.
pub fn load_sheet<R: Read>(reader: R, delimiter: u8) -> Result<Sheet, PersistenceError> {
    let rows = read_rows(reader, delimiter)?;
    debug!("loading sheet from {} delimited rows", rows.len());

    let mut sheet = Sheet::new();
    sheet.import_rows(&rows);
    Ok(sheet)
}

/// Saves the sheet's raw source text (formula text intact), trimmed to the
/// occupied extent. Loading the output reproduces the sheet's contents.
pub fn save_sheet<W: Write>(
    sheet: &Sheet,
    writer: W,
    delimiter: u8,
) -> Result<(), PersistenceError> {
    write_rows(writer, &source_rows(sheet), delimiter)
}

/// Saves evaluated display values over the full grid bounds, for handing
/// to tools that cannot evaluate formulas.
pub fn export_display<W: Write>(
    sheet: &Sheet,
    writer: W,
    delimiter: u8,
) -> Result<(), PersistenceError> {
    write_rows(writer, &sheet.export_rows(), delimiter)
}

/// Row-major raw input over the occupied extent; empty sheet gives no rows.
fn source_rows(sheet: &Sheet) -> Vec<Vec<String>> {
    let occupied: Vec<CellCoord> = sheet.grid().cells.keys().copied().collect();
    let rows = match occupied.iter().map(|&(r, _)| r).max() {
        Some(max_row) => max_row + 1,
        None => return Vec::new(),
    };
    let cols = occupied.iter().map(|&(_, c)| c).max().unwrap_or(0) + 1;

    (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| {
                    sheet
                        .cell((row, col))
                        .map(|c| c.raw.clone())
                        .unwrap_or_default()
                })
                .collect()
        })
        .collect()
}
