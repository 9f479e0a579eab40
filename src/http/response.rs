//! Rejection responses.
//!
//! Every gate failure answers with the same JSON shape so clients can
//! handle 401/403 uniformly: `{ "error": string, "message": string }`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Fixed error body shared by all gate rejections.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

/// Build a terminal rejection response.
pub fn reject(status: StatusCode, error: &str, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}
