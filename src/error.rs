use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::runner::RunnerError;
use crate::table::TableError;

/// Error type surfaced to the page.
///
/// Serialized as `{"type": ..., "details": {...}}` so the page can tell a
/// warning (missing input) from a bad upload.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    #[error("{message}")]
    Warning { message: String },

    #[error("{message}")]
    InvalidTable { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
        }
    }

    pub fn invalid_table(message: impl Into<String>) -> Self {
        Self::InvalidTable {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Warning { .. } | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidTable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RunnerError> for AppError {
    fn from(err: RunnerError) -> Self {
        match err {
            RunnerError::InvalidTable(TableError::ResultCount { .. } | TableError::Write(_)) => {
                AppError::internal(err.to_string())
            }
            RunnerError::InvalidTable(_) => AppError::invalid_table(err.to_string()),
            _ => AppError::warning(err.to_string()),
        }
    }
}

impl From<TableError> for AppError {
    fn from(err: TableError) -> Self {
        RunnerError::from(err).into()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Internal { .. }) {
            tracing::error!(error = %self, "request failed");
        }
        (self.status(), Json(self)).into_response()
    }
}
