//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//!
//! environment
//!     → loader.rs (Secrets::from_env, no defaults, fail fast)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All file-config fields have defaults to allow minimal configs
//! - Secrets come only from the environment and never have defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::Secrets;
pub use schema::AccessConfig;
pub use schema::GatewayConfig;
