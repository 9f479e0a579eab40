//! End-to-end tests for the guard pipeline.
//!
//! Each test boots the real server on an ephemeral port and drives it
//! with a plain HTTP client, so the full middleware stack (normalizer,
//! origin gate, token gate, handlers) is exercised.

use std::net::SocketAddr;

use serde_json::{json, Value};
use tokio::net::TcpListener;

use spottive_gateway::{GatewayConfig, HttpServer, Secrets, Shutdown};

const APP_HEADER: &str = "x-app-client";
const APP_HEADER_VALUE: &str = "spottive-web";
const JWT_SECRET: &str = "integration-test-secret";

struct Gateway {
    addr: SocketAddr,
    // Held so the broadcast sender stays alive for the server's lifetime.
    _shutdown: Shutdown,
}

impl Gateway {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

async fn spawn_gateway() -> Gateway {
    let mut config = GatewayConfig::default();
    config.observability.metrics_enabled = false;

    let secrets = Secrets {
        jwt_secret: JWT_SECRET.into(),
        admin_username: "admin".into(),
        admin_password: "hunter2".into(),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, secrets);

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    Gateway {
        addr,
        _shutdown: shutdown,
    }
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

async fn login(gateway: &Gateway) -> String {
    let res = client()
        .post(gateway.url("/api/auth/login"))
        .header(APP_HEADER, APP_HEADER_VALUE)
        .json(&json!({ "username": "admin", "password": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn bare_mutation_is_denied_before_the_handler() {
    let gateway = spawn_gateway().await;

    let res = client()
        .post(gateway.url("/api/products/assign-brand"))
        .json(&json!({ "product_id": "p1", "brand": "hikvision" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 403);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Access Denied");
}

#[tokio::test]
async fn app_header_without_credential_fails_token_gate() {
    let gateway = spawn_gateway().await;

    let res = client()
        .post(gateway.url("/api/products/assign-brand"))
        .header(APP_HEADER, APP_HEADER_VALUE)
        .json(&json!({ "product_id": "p1", "brand": "hikvision" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn expired_token_passes_origin_but_fails_token_gate() {
    let gateway = spawn_gateway().await;

    // Signed with the right secret but already expired.
    let now = chrono::Utc::now().timestamp();
    let expired = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &json!({
            "sub": "u1",
            "username": "admin",
            "role": "admin",
            "iat": now - 7200,
            "exp": now - 3600,
        }),
        &jsonwebtoken::EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();

    let res = client()
        .post(gateway.url("/api/products/assign-brand"))
        .header(APP_HEADER, APP_HEADER_VALUE)
        .header("authorization", format!("Bearer {expired}"))
        .json(&json!({ "product_id": "p1", "brand": "hikvision" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn public_read_needs_no_headers() {
    let gateway = spawn_gateway().await;

    let res = client().get(gateway.url("/health")).send().await.unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "operational");
}

#[tokio::test]
async fn bare_catalog_read_is_denied() {
    let gateway = spawn_gateway().await;

    let res = client()
        .get(gateway.url("/api/products"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 403);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Access Denied");
}

#[tokio::test]
async fn catalog_read_with_app_header_succeeds() {
    let gateway = spawn_gateway().await;

    let res = client()
        .get(gateway.url("/api/products"))
        .header(APP_HEADER, APP_HEADER_VALUE)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert!(body["products"].is_array());
}

#[tokio::test]
async fn login_then_mutate_stamps_the_caller() {
    let gateway = spawn_gateway().await;
    let token = login(&gateway).await;

    let res = client()
        .post(gateway.url("/api/products/assign-brand"))
        .header(APP_HEADER, APP_HEADER_VALUE)
        .header("authorization", format!("Bearer {token}"))
        .json(&json!({ "product_id": "p42", "brand": "dahua" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["updated_by"], "admin");
}

#[tokio::test]
async fn session_cookie_is_accepted_as_fallback() {
    let gateway = spawn_gateway().await;
    let token = login(&gateway).await;

    let res = client()
        .post(gateway.url("/api/products/assign-brand"))
        .header(APP_HEADER, APP_HEADER_VALUE)
        .header("cookie", format!("token={token}"))
        .json(&json!({ "product_id": "p7", "brand": "uniview" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let gateway = spawn_gateway().await;

    let res = client()
        .post(gateway.url("/api/auth/login"))
        .header(APP_HEADER, APP_HEADER_VALUE)
        .json(&json!({ "username": "admin", "password": "wrong" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 401);
}

#[tokio::test]
async fn login_is_origin_gated() {
    let gateway = spawn_gateway().await;

    let res = client()
        .post(gateway.url("/api/auth/login"))
        .json(&json!({ "username": "admin", "password": "hunter2" }))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 403);
}

#[tokio::test]
async fn allow_listed_referer_passes_origin_but_still_needs_credential() {
    let gateway = spawn_gateway().await;

    // 401 rather than 403: the referer satisfied the origin gate, and
    // the request then died at the token gate.
    let res = client()
        .get(gateway.url("/api/analytics/summary"))
        .header("referer", "https://www.spottive.com/admin/analytics")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn admin_read_with_referer_and_token_succeeds() {
    let gateway = spawn_gateway().await;
    let token = login(&gateway).await;

    let res = client()
        .get(gateway.url("/api/analytics/summary"))
        .header("referer", "https://www.spottive.com/admin/analytics")
        .header("authorization", format!("Bearer {token}"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn spoofed_referer_path_fails_gated_read() {
    let gateway = spawn_gateway().await;

    let res = client()
        .get(gateway.url("/api/analytics/summary"))
        .header("referer", "http://evil.com/spottive.com")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 403);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Access Denied");
}

#[tokio::test]
async fn unverified_bearer_fails_admin_read() {
    let gateway = spawn_gateway().await;

    // A bearer prefix satisfies the origin gate, but admin reads then
    // verify the token itself.
    let res = client()
        .get(gateway.url("/api/analytics/summary"))
        .header("authorization", "Bearer garbage")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized");
}
