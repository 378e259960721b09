//! Rollcall - Session & Authorization Core
//!
//! The part of the Rollcall attendance app that knows who is signed in.
//! Screens (class list, enrollment manager, attendance-request approvals)
//! call into this crate to log people in and out and to decide where they
//! land.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared with the identity API
//!   - `Identity` and `Role`
//!   - `Session` states
//!   - `AuthError` taxonomy and raw configuration
//!
//! - **`client`** - The session machinery
//!   - Credential verifier over an `IdentityBackend` (HTTP or in-memory)
//!   - `SessionStore` with its init/login/signup/logout/teardown lifecycle
//!   - Role router, capability lookup, navigation guard
//!   - Logout intent and the login/signup form model
//!
//! # Usage
//!
//! ```rust,no_run
//! use rollcall::client::{route, Config, Destination, SessionStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SessionStore::from_config(&Config::from_env()?)?;
//! match route(&store.init()) {
//!     Destination::Welcome => { /* show login */ }
//!     other => println!("resuming at {:?}", other),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! `SessionStore` is `Send + Sync`; its state sits behind a mutex that is
//! never held across an `.await`, so `current()` never waits on the network.
//!
//! # Error Handling
//!
//! Expected failures are `AuthError` values. Only
//! `AuthError::BackendContract` is unrecoverable, and even that is not fatal
//! to the process.

/// Shared types and data structures
pub mod shared;

/// Session store, verifier and router
pub mod client;
