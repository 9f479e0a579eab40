//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gated API surface
//! - Wire up middleware (tracing, limits, request ID, metrics)
//! - Bind server to listener
//! - Run until the shutdown coordinator fires

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::DefaultBodyLimit, http::StatusCode, middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin;
use crate::config::{GatewayConfig, Secrets};
use crate::guard::TokenAuthGate;
use crate::http::request::request_id_middleware;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub secrets: Arc<Secrets>,
    pub token_gate: Arc<TokenAuthGate>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig, secrets: Secrets) -> Self {
        let token_gate = Arc::new(TokenAuthGate::new(
            &secrets.jwt_secret,
            config.auth.token_ttl_secs,
            &config.auth.token_cookie,
        ));

        let state = AppState {
            config: Arc::new(config.clone()),
            secrets: Arc::new(secrets),
            token_gate,
        };

        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        admin::api_router(state).layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(middleware::from_fn(metrics::track_requests))
                .layer(GlobalConcurrencyLimitLayer::new(config.listener.max_connections))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(config.timeouts.request_secs),
                ))
                .layer(DefaultBodyLimit::max(config.limits.max_body_bytes)),
        )
    }

    /// Run the server, accepting connections on the given listener
    /// until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self.router.into_make_service();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
