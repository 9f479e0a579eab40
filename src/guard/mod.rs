//! Request-authorization gate subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → normalize.rs (canonical path for classification)
//!     → origin.rs (application-originated vs direct API call)
//!     → token.rs (bearer verification + role check, per route)
//!     → Pass to handler with Identity attached
//! ```
//!
//! # Design Decisions
//! - Stateless: every value is derived per request and discarded
//! - Fail closed: unmatched requests are rejected, never degraded
//! - One configurable policy object per route instead of duplicated
//!   inline checks

pub mod normalize;
pub mod origin;
pub mod policy;
pub mod token;

pub use origin::{AccessDecision, DenyReason, OriginPolicy, TrustedSignal};
pub use policy::{guard_middleware, GuardState, RouteGuard};
pub use token::{AuthError, Identity, Role, TokenAuthGate};
