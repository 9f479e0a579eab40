//! Configuration and secret loading.
//!
//! File config is optional (defaults cover local development); secrets
//! never are. The signing secret and admin credentials must come from
//! the environment, and startup fails if any is unset. There is no
//! fallback value on purpose.

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable carrying the token signing secret.
pub const ENV_JWT_SECRET: &str = "SPOTTIVE_JWT_SECRET";
/// Environment variable carrying the admin login username.
pub const ENV_ADMIN_USER: &str = "SPOTTIVE_ADMIN_USER";
/// Environment variable carrying the admin login password.
pub const ENV_ADMIN_PASS: &str = "SPOTTIVE_ADMIN_PASS";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Required environment variable {0} is not set")]
    MissingEnv(&'static str),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: GatewayConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Secrets consumed by the token layer and the login endpoint.
///
/// Kept out of [`GatewayConfig`] so they cannot end up in a config file
/// or a serialized debug dump.
#[derive(Clone)]
pub struct Secrets {
    pub jwt_secret: String,
    pub admin_username: String,
    pub admin_password: String,
}

impl Secrets {
    /// Read all secrets from the process environment, failing on the
    /// first missing variable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Lookup-injectable constructor (used by tests to avoid mutating
    /// process environment).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingEnv(name))
        };
        Ok(Self {
            jwt_secret: require(ENV_JWT_SECRET)?,
            admin_username: require(ENV_ADMIN_USER)?,
            admin_password: require(ENV_ADMIN_PASS)?,
        })
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("jwt_secret", &"<redacted>")
            .field("admin_username", &self.admin_username)
            .field("admin_password", &"<redacted>")
            .finish()
    }
}
