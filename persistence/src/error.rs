//! FILENAME: persistence/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Delimited read/write error: {0}")]
    Delimited(#[from] csv::Error),

    #[error("Invalid file format: {0}")]
    InvalidFormat(String),
}
