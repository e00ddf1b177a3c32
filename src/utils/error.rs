//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while parsing a single trace line
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("unrecognized operation keyword: {0}")]
    UnknownOperation(String),

    #[error("invalid {field} field '{text}'")]
    InvalidNumber { field: &'static str, text: String },

    #[error("expected at least 4 fields, found {0}")]
    TooFewFields(usize),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
