//! Admin API surface and per-route guard wiring.
//!
//! Each route group declares its own [`RouteGuard`] policy instead of
//! repeating the gating checks inline. Reads may stop at origin
//! classification; mutations always run the token gate too.

pub mod handlers;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::handlers::{analytics_summary, assign_brand, health, list_products, login};
use crate::guard::{guard_middleware, GuardState, OriginPolicy, RouteGuard, TrustedSignal};
use crate::http::server::AppState;

/// Build the full API router with guard policies applied per group.
pub fn api_router(state: AppState) -> Router {
    let guard = |policy: RouteGuard| {
        middleware::from_fn_with_state(
            GuardState {
                access: Arc::new(state.config.access.clone()),
                token_gate: state.token_gate.clone(),
                policy,
            },
            guard_middleware,
        )
    };

    // Pure public read: no gate at all.
    let public = Router::new().route("/health", get(health));

    // Catalog reads: any trusted signal passes, no token required.
    let catalog_reads = Router::new()
        .route("/api/products", get(list_products))
        .route_layer(guard(RouteGuard::origin_only(OriginPolicy::all())));

    // Login is reachable from the web client and the rendering layer,
    // not from direct API calls.
    let login_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route_layer(guard(RouteGuard::origin_only(OriginPolicy::only(&[
            TrustedSignal::InternalMarker,
            TrustedSignal::AppHeader,
            TrustedSignal::RefererHost,
        ]))));

    // Admin reads: origin gate, then a verified admin credential.
    let admin_reads = Router::new()
        .route("/api/analytics/summary", get(analytics_summary))
        .route_layer(guard(RouteGuard::authenticated(OriginPolicy::all())));

    // Mutations: origin gate (referer alone is not enough to mutate)
    // followed by the token gate.
    let mutations = Router::new()
        .route("/api/products/assign-brand", post(assign_brand))
        .route_layer(guard(RouteGuard::authenticated(OriginPolicy::only(&[
            TrustedSignal::InternalMarker,
            TrustedSignal::AppHeader,
            TrustedSignal::BearerPresence,
        ]))));

    public
        .merge(catalog_reads)
        .merge(login_routes)
        .merge(admin_reads)
        .merge(mutations)
        .with_state(state)
}
