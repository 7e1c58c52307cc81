use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use roster_core::types::DbId;
use roster_core::validation::FieldViolation;
use roster_db::error::DbError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`DbError`] for data-access failures and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce the JSON error
/// envelope `{ "success": false, "error": ..., "details"?: [...] }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A data-access error. Always surfaced as a sanitized 500; the
    /// taxonomy (configuration failures, invariant breaches, driver
    /// errors) matters for the log line, not the client.
    #[error(transparent)]
    Db(#[from] DbError),

    /// A raw database error from a repository read path.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The payload failed schema validation; carries every violation.
    #[error("Validation error")]
    Validation(Vec<FieldViolation>),

    /// The requested row does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details) = match self {
            AppError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                "Validation error".to_string(),
                Some(violations),
            ),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),

            AppError::NotFound { entity, id: _ } => {
                (StatusCode::NOT_FOUND, format!("{entity} not found"), None)
            }

            // Storage and configuration failures propagate unmodified to
            // this boundary, which logs them and leaks no internal detail.
            AppError::Db(err) => {
                tracing::error!(error = %err, "Data-access error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            AppError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "success": false,
            "error": message,
        });
        if let Some(details) = details {
            body["details"] = serde_json::to_value(details).unwrap_or_default();
        }

        (status, axum::Json(body)).into_response()
    }
}
