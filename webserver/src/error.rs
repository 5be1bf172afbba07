//! WebServer-specific error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use dispatcher::DispatcherError;

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("{message}")]
    InvalidRequest { message: String },

    #[error(transparent)]
    Dispatcher(#[from] DispatcherError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WebServerError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        WebServerError::InvalidRequest {
            message: message.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            WebServerError::FileNotFound { .. } => StatusCode::NOT_FOUND,
            WebServerError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            // Input errors surface verbatim; everything else is internal
            WebServerError::Dispatcher(
                DispatcherError::CsvRead { .. }
                | DispatcherError::NoRecipients
                | DispatcherError::Configuration { .. },
            ) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "status": "error",
            "message": self.to_string()
        }));
        (status, body).into_response()
    }
}

pub type WebServerResult<T> = Result<T, WebServerError>;
