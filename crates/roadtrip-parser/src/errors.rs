use std::path::PathBuf;

use thiserror::Error;

use crate::timestamp::TIMESTAMP_LAYOUT;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("timestamp '{input}' does not match {layout}: {reason}", layout = TIMESTAMP_LAYOUT)]
    Layout { input: String, reason: &'static str },

    #[error("timestamp '{input}' has a non-numeric {field} '{token}'")]
    NonNumeric {
        input: String,
        field: &'static str,
        token: String,
    },

    #[error("timestamp '{input}' is not a valid calendar date-time")]
    OutOfRange { input: String },
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("failed to read checkpoint table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("data row {line_index} has no value for {field} (column {column})")]
    MissingField {
        line_index: usize,
        column: usize,
        field: &'static str,
    },

    #[error("data row {line_index} invalid: {message}")]
    DataRow { line_index: usize, message: String },

    #[error("invalid table options: {0}")]
    Options(String),

    #[error("checkpoint table did not contain any data rows")]
    EmptyData,
}
