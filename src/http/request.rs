//! Request identity and context.
//!
//! # Responsibilities
//! - Generate a unique request ID as early as possible for tracing
//! - Carry the raw and normalized request path through the guard
//!   pipeline as one immutable value
//!
//! # Design Decisions
//! - The URI is never mutated in place; downstream code reads the
//!   normalized path from [`RequestContext`] extensions

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Raw and canonicalized request path, attached by the guard pipeline.
#[derive(Clone, Debug)]
pub struct RequestContext {
    /// Path exactly as received.
    pub raw_path: String,
    /// Path after slash collapsing and traversal stripping.
    pub normalized_path: String,
}

/// Ensure every request carries an `x-request-id` header.
///
/// An inbound ID is kept (the rendering layer forwards its own); absent
/// one, a UUID v4 is generated.
pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    if !request.headers().contains_key(X_REQUEST_ID) {
        let id = Uuid::new_v4().to_string();
        if let Ok(value) = HeaderValue::from_str(&id) {
            request.headers_mut().insert(X_REQUEST_ID, value);
        }
    }
    next.run(request).await
}
