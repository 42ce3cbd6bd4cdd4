//! Errors raised at the I/O boundary (tape loading, assumptions files, reports)
//!
//! The projection itself is total and never returns an error.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TapeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate loan id on tape: {id}")]
    DuplicateLoanId { id: String },

    #[error("Unsupported tape format: {path} (expected .csv or .json)")]
    UnsupportedFormat { path: PathBuf },
}
