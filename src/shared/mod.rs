//! Shared Module
//!
//! Types used on both sides of the identity API boundary and by every
//! consumer of the session: the principal and its role, the session states,
//! the error taxonomy, and raw configuration.

/// Authenticated principal and role
pub mod identity;

/// Session states
pub mod session;

/// Authentication error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use identity::{Identity, Role};
pub use session::Session;
pub use error::AuthError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError, MutationPolicy};
