use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use ytgrab_core::error::CoreError;
use ytgrab_core::metadata::MetadataError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `ytgrab_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The metadata lookup through `yt-dlp` failed.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// A filesystem error (downloads directory).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(CoreError::NotFound { entity, .. }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} not found"),
            ),

            // --- yt-dlp metadata ---
            AppError::Metadata(err) => {
                tracing::error!(error = %err, "Video info lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "METADATA_ERROR",
                    "Failed to get video info".to_string(),
                )
            }

            // --- Filesystem ---
            AppError::Io(err) => {
                tracing::error!(error = %err, "I/O error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
