use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Failures surfaced to callers of the ingestion, roster and report operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected locally, e.g. an empty submission or roster batch.
    #[error("{0}")]
    InvalidInput(String),

    /// Unknown user id or a facility without roster members.
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Store(#[from] sqlx::Error),

    #[error("Failed to render document: {0}")]
    Render(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        HttpResponse::build(self.status_code()).json(json!({
            "status": "error",
            "message": self.to_string()
        }))
    }
}
