use std::str::FromStr;

use axum::http::StatusCode;

use crate::infrastructure::http::api::ApiError;

pub mod admin;
pub mod story_manager;
pub mod submissions;

// health check handler
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Parses an identifier taken from a path segment or a request body.
pub fn parse_id<T: FromStr<Err = anyhow::Error>>(raw: &str) -> Result<T, ApiError> {
    raw.parse::<T>()
        .map_err(|e| ApiError::bad_request(format!("invalid id '{raw}': {e}")))
}
