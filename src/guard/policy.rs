//! Composed route guard.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → normalize.rs (canonical path, carried in RequestContext)
//!     → origin.rs (trusted-origin classification per route policy)
//!     → token.rs (bearer verification, only when the route requires it)
//!     → handler (with Identity attached on authenticated routes)
//! ```
//!
//! # Design Decisions
//! - Stage order is fixed; the first failing stage short-circuits with
//!   its own status code and JSON body
//! - Request state is carried as immutable extension values; the URI is
//!   never rewritten in place
//! - Fail closed: origin denial is 403, credential failures are 401/403

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::schema::AccessConfig;
use crate::guard::normalize::normalize;
use crate::guard::origin::{self, AccessDecision, OriginPolicy};
use crate::guard::token::TokenAuthGate;
use crate::http::request::RequestContext;
use crate::http::response::reject;
use crate::observability::metrics;

/// Per-route protection policy.
#[derive(Clone)]
pub struct RouteGuard {
    /// Trusted-origin signals this route consults.
    pub origin: OriginPolicy,
    /// Whether the token gate runs after origin classification.
    /// Mutating routes always set this; reads may skip it.
    pub requires_auth: bool,
}

impl RouteGuard {
    pub fn origin_only(origin: OriginPolicy) -> Self {
        Self {
            origin,
            requires_auth: false,
        }
    }

    pub fn authenticated(origin: OriginPolicy) -> Self {
        Self {
            origin,
            requires_auth: true,
        }
    }
}

/// State handed to the guard middleware for one route (or route group).
#[derive(Clone)]
pub struct GuardState {
    pub access: Arc<AccessConfig>,
    pub token_gate: Arc<TokenAuthGate>,
    pub policy: RouteGuard,
}

/// Guard middleware wrapping a business handler.
///
/// Stages: normalize → origin classification → (conditionally) token
/// verification → handler. Any denial is terminal for the request.
pub async fn guard_middleware(
    State(guard): State<GuardState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let raw_path = request.uri().path().to_string();
    let context = RequestContext {
        normalized_path: normalize(&raw_path),
        raw_path,
    };

    match origin::classify(&guard.access, &guard.policy.origin, request.headers()) {
        AccessDecision::Allow(signal) => {
            tracing::debug!(
                path = %context.normalized_path,
                signal = ?signal,
                "Origin check passed"
            );
            metrics::record_gate_decision("origin", "allow");
        }
        AccessDecision::Deny(reason) => {
            tracing::warn!(
                path = %context.normalized_path,
                reason = ?reason,
                "Direct API access denied"
            );
            metrics::record_gate_decision("origin", "deny");
            return reject(
                StatusCode::FORBIDDEN,
                "Access Denied",
                "Direct access to this API is not permitted.",
            );
        }
    }

    if guard.policy.requires_auth {
        match guard.token_gate.authenticate(request.headers()) {
            Ok(identity) => {
                tracing::debug!(
                    username = %identity.username,
                    path = %context.normalized_path,
                    "Authenticated"
                );
                metrics::record_gate_decision("token", "allow");
                request.extensions_mut().insert(identity);
            }
            Err(err) => {
                tracing::warn!(
                    path = %context.normalized_path,
                    error = %err,
                    "Authentication failed"
                );
                metrics::record_gate_decision("token", "deny");
                return err.into_response();
            }
        }
    }

    request.extensions_mut().insert(context);
    next.run(request).await
}
