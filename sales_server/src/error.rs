//! Mapping of service failures onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sales_report::ReportError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Errors surfaced by request handlers
#[derive(Debug, Error)]
pub enum AppError {
    /// A query or form value was missing its expected shape
    #[error("Invalid request parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Report(#[from] ReportError),

    /// A blocking report task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidParameter(_)
            | AppError::Report(ReportError::InvalidRequestParameter(_)) => StatusCode::BAD_REQUEST,
            AppError::Report(ReportError::ArtifactNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Report(_) | AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
