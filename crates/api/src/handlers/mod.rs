//! Request handlers.
//!
//! Handlers stay thin: they validate input, call into `ytgrab_core` and map
//! errors via [`AppError`](crate::error::AppError).

pub mod downloads;
pub mod video_info;

use crate::error::AppError;

/// Reject a missing or blank `url` field.
pub(crate) fn require_url(url: Option<String>) -> Result<String, AppError> {
    url.map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::BadRequest("URL is required".to_string()))
}
