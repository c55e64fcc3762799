use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SpliceError {
    #[error("Could not find marker for table '{0}' in seed script")]
    MarkerNotFound(String),

    #[error("Could not find INSERT block for table '{0}' after its marker in seed script")]
    InsertNotFound(String),
}

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("CSV appears to have no header row")]
    MissingHeader,

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read CSV: {0}")]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("CSV not found: {}", .0.display())]
    CsvNotFound(PathBuf),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("No data rows found in CSV")]
    NoRows,

    #[error(transparent)]
    Splice(#[from] SpliceError),

    #[error("Failed to access {}: {source}", .path.display())]
    File { path: PathBuf, source: io::Error },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl UpdateError {
    pub fn file(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();

        move |source| UpdateError::File { path, source }
    }
}
