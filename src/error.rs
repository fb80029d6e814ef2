use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GroszError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Budget document not found: {}", .0.display())]
    DocumentMissing(PathBuf),

    #[error("Could not read budget document '{}': {reason}", .path.display())]
    DocumentRead { path: PathBuf, reason: String },

    #[error("Could not save budget document '{}': {reason}", .path.display())]
    DocumentSave { path: PathBuf, reason: String },

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid cell address: {0}")]
    BadAddress(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, GroszError>;
