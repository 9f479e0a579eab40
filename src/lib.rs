//! Spottive Gateway Library
//!
//! Request-authorization gate in front of the Spottive admin API.

pub mod admin;
pub mod config;
pub mod guard;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::loader::Secrets;
pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
