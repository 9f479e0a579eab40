//! API handlers behind the guard pipeline.
//!
//! The catalog and analytics handlers are thin stand-ins for the
//! back-office services that live behind this gateway; they exist to
//! demonstrate identity propagation and the guard contract, not to
//! implement the catalog.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::guard::Identity;
use crate::http::response::reject;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
}

#[derive(Deserialize)]
pub struct AssignBrandRequest {
    pub product_id: String,
    pub brand: String,
}

pub async fn health() -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

/// Issue an admin credential against the environment-configured login
/// pair. Mismatches get the same 401 regardless of which field was
/// wrong.
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    if req.username != state.secrets.admin_username
        || req.password != state.secrets.admin_password
    {
        tracing::warn!(username = %req.username, "Login rejected");
        return reject(
            StatusCode::UNAUTHORIZED,
            "Unauthorized",
            "Invalid username or password.",
        );
    }

    match state.token_gate.issue(&req.username) {
        Ok(issued) => {
            tracing::info!(username = %req.username, "Admin login");
            Json(LoginResponse {
                token: issued.token,
                expires_in: issued.expires_in,
            })
            .into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "Token issuance failed");
            reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "Could not issue a credential.",
            )
        }
    }
}

/// Public catalog read. The real catalog service sits behind this.
pub async fn list_products() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "products": [] }))
}

/// Admin analytics summary (origin-gated read).
pub async fn analytics_summary() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "total_requests": 0,
        "enquiries": 0,
        "newsletter_signups": 0,
    }))
}

/// Mutating brand assignment; writes are stamped with the caller.
pub async fn assign_brand(
    Extension(identity): Extension<Identity>,
    Json(req): Json<AssignBrandRequest>,
) -> Json<serde_json::Value> {
    tracing::info!(
        product_id = %req.product_id,
        brand = %req.brand,
        updated_by = %identity.username,
        "Brand assignment"
    );
    Json(serde_json::json!({
        "status": "ok",
        "product_id": req.product_id,
        "brand": req.brand,
        "updated_by": identity.username,
    }))
}
