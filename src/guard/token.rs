//! Bearer credential verification and role enforcement.
//!
//! # Responsibilities
//! - Extract a token from `Authorization: Bearer <t>` or, failing that,
//!   the session cookie
//! - Verify HS256 signature and expiry (zero leeway; expiry is a pure
//!   comparison against current time)
//! - Enforce the `admin` role claim
//! - Produce an [`Identity`] for handlers to stamp writes with
//!
//! Tokens are self-contained and never persisted server-side.

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::response::reject;

const BEARER_PREFIX: &str = "Bearer ";
const ADMIN_ROLE: &str = "admin";

/// Authentication failure taxonomy. Every variant is terminal for the
/// request.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No bearer header and no session cookie where one is required.
    #[error("authentication required: provide a bearer token")]
    MissingCredential,
    /// Bad signature, malformed payload, or expired token.
    #[error("credential is invalid or expired")]
    InvalidCredential,
    /// Valid token, but the role claim does not grant access.
    #[error("this operation requires the admin role")]
    InsufficientRole,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingCredential | Self::InvalidCredential => StatusCode::UNAUTHORIZED,
            Self::InsufficientRole => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let error = match self.status() {
            StatusCode::FORBIDDEN => "Forbidden",
            _ => "Unauthorized",
        };
        reject(self.status(), error, &self.to_string())
    }
}

/// Recognized roles. `admin` is the only role the back-office issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
}

/// Authenticated caller, attached to request extensions for downstream
/// handlers (audit stamping on writes).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: String,
    pub username: String,
    pub role: Role,
}

/// JWT claims carried by an issued credential.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// A freshly issued credential plus its lifetime.
#[derive(Debug, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_in: u64,
}

/// Verifies and issues admin credentials.
pub struct TokenAuthGate {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
    cookie_name: String,
}

impl TokenAuthGate {
    pub fn new(secret: &str, ttl_secs: u64, cookie_name: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry must be a pure comparison against current time.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
            cookie_name: cookie_name.to_string(),
        }
    }

    /// Issue a signed admin credential for `username`.
    pub fn issue(&self, username: &str) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            username: username.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: now,
            exp: now + self.ttl_secs as i64,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        Ok(IssuedToken {
            token,
            expires_in: self.ttl_secs,
        })
    }

    /// Authenticate a request from its headers.
    ///
    /// Extraction order: `Authorization: Bearer <t>` first, then the
    /// session cookie. Verification failures never reveal which check
    /// failed beyond the error taxonomy.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let token = bearer_token(headers)
            .or_else(|| cookie_token(headers, &self.cookie_name))
            .ok_or(AuthError::MissingCredential)?;

        let data = decode::<Claims>(&token, &self.decoding, &self.validation)
            .map_err(|_| AuthError::InvalidCredential)?;

        if data.claims.role != ADMIN_ROLE {
            return Err(AuthError::InsufficientRole);
        }

        Ok(Identity {
            user_id: data.claims.sub,
            username: data.claims.username,
            role: Role::Admin,
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
        .map(str::to_string)
}

/// Pull a single cookie value out of the `Cookie` header.
fn cookie_token(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get("cookie").and_then(|v| v.to_str().ok())?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn gate() -> TokenAuthGate {
        TokenAuthGate::new("test-secret", 3600, "token")
    }

    fn auth_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn issued_token_authenticates() {
        let gate = gate();
        let issued = gate.issue("admin").unwrap();
        let identity = gate
            .authenticate(&auth_headers(&format!("Bearer {}", issued.token)))
            .unwrap();
        assert_eq!(identity.username, "admin");
        assert_eq!(identity.role, Role::Admin);
    }

    #[test]
    fn missing_credential() {
        assert_eq!(
            gate().authenticate(&HeaderMap::new()),
            Err(AuthError::MissingCredential)
        );
    }

    #[test]
    fn cookie_fallback_is_used() {
        let gate = gate();
        let issued = gate.issue("admin").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_str(&format!("theme=dark; token={}", issued.token)).unwrap(),
        );
        assert!(gate.authenticate(&headers).is_ok());
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let other = TokenAuthGate::new("other-secret", 3600, "token");
        let issued = other.issue("admin").unwrap();
        assert_eq!(
            gate().authenticate(&auth_headers(&format!("Bearer {}", issued.token))),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn garbage_token_is_invalid() {
        assert_eq!(
            gate().authenticate(&auth_headers("Bearer not.a.jwt")),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn expired_token_is_invalid_even_with_good_signature() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "u1".into(),
            username: "admin".into(),
            role: "admin".into(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = sign(&claims, "test-secret");
        assert_eq!(
            gate().authenticate(&auth_headers(&format!("Bearer {token}"))),
            Err(AuthError::InvalidCredential)
        );
    }

    #[test]
    fn non_admin_role_is_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "u2".into(),
            username: "intern".into(),
            role: "editor".into(),
            iat: now,
            exp: now + 3600,
        };
        let token = sign(&claims, "test-secret");
        assert_eq!(
            gate().authenticate(&auth_headers(&format!("Bearer {token}"))),
            Err(AuthError::InsufficientRole)
        );
    }

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(AuthError::MissingCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InvalidCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::InsufficientRole.status(), StatusCode::FORBIDDEN);
    }
}
