//! Client Session Module
//!
//! Everything the attendance app's screens call into to find out who is
//! signed in and where they may go.
//!
//! # Architecture
//!
//! - **`config`** - Validated client configuration (API URL, timeout, cache path)
//! - **`types`** - Request/response bodies of the identity API
//! - **`auth`** - Identity backend trait, HTTP backend, credential verifier
//! - **`memory`** - In-process identity backend
//! - **`cache`** - On-device session cache
//! - **`state`** - The session store
//! - **`router`** - Role router, capabilities, navigation guard
//! - **`intent`** - Confirm-before-logout decisions
//! - **`form`** - Login/signup form model
//!
//! # Example
//!
//! ```rust,no_run
//! use rollcall::client::{route, Config, SessionStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SessionStore::from_config(&Config::from_env()?)?;
//! store.init();
//! store.login("teacher@school.edu", "secret").await?;
//! let destination = route(&store.current());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod types;
pub mod auth;
pub mod memory;
pub mod cache;
pub mod state;
pub mod router;
pub mod intent;
pub mod form;

// Re-export commonly used types
pub use config::Config;
pub use auth::{CredentialVerifier, HttpIdentityBackend, IdentityBackend};
pub use memory::InMemoryIdentityBackend;
pub use cache::{CachedSession, FileSessionCache, MemorySessionCache, NoSessionCache, SessionCache};
pub use state::SessionStore;
pub use router::{capabilities, guard, route, Capability, Destination};
pub use intent::{request_logout, LogoutDecision, LogoutIntent};
pub use form::AuthForm;
