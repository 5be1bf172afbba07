//! Dispatcher-specific error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatcherError {
    #[error("Error reading CSV file {path}: {source}")]
    CsvRead {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("No valid emails found in the CSV file")]
    NoRecipients,

    #[error("Mail provider rejected the message: HTTP {status}")]
    SendRejected { status: u16 },

    #[error("Mail transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Configuration error: {field}")]
    Configuration { field: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DispatcherError {
    pub fn config(field: impl Into<String>) -> Self {
        DispatcherError::Configuration { field: field.into() }
    }
}

pub type DispatcherResult<T> = Result<T, DispatcherError>;
