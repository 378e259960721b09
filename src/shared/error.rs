//! Authentication Error Types
//!
//! This module defines the tagged outcome returned by the credential verifier
//! and the session store. Expected conditions (bad input, wrong password,
//! duplicate account, unreachable backend, concurrent sign-in) are values of
//! [`AuthError`], never panics.
//!
//! # Error Categories
//!
//! - `Validation` - Empty or malformed input, fixed by re-prompting
//! - `InvalidCredentials` - The backend found no matching account
//! - `DuplicateEmail` - Signup conflict
//! - `Network` - Backend unreachable, timed out, non-2xx or malformed JSON
//! - `Busy` - A concurrent sign-in was rejected or superseded
//! - `BackendContract` - The backend answered with something it promised never to send
//!
//! Only `BackendContract` is unrecoverable; the presentation layer should show
//! a generic failure for it.
//!
//! # Usage
//!
//! ```rust
//! use rollcall::shared::error::AuthError;
//!
//! let error = AuthError::validation("email", "Email is required");
//! assert!(error.is_recoverable());
//! ```
use thiserror::Error;

/// Outcome of a failed login, signup or verification
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Input rejected before (or by) the backend
    #[error("Validation error in field '{field}': {message}")]
    Validation {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Wrong email or password
    #[error("Invalid credentials: {message}")]
    InvalidCredentials {
        /// Message reported by the backend, surfaced verbatim
        message: String,
    },

    /// An account with this email already exists
    #[error("An account with email '{email}' already exists")]
    DuplicateEmail {
        /// The conflicting email
        email: String,
    },

    /// Backend unreachable or returned an unusable response
    #[error("Network error: {message}")]
    Network {
        /// Transport or decoding detail, for logs
        message: String,
    },

    /// Another login or signup holds the store
    #[error("Another sign-in is in progress")]
    Busy,

    /// The backend violated its response contract
    #[error("Identity backend contract violation: {message}")]
    BackendContract {
        /// What was wrong with the response
        message: String,
    },
}

impl AuthError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid credentials error
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            message: message.into(),
        }
    }

    pub fn duplicate_email(email: impl Into<String>) -> Self {
        Self::DuplicateEmail {
            email: email.into(),
        }
    }

    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn contract(message: impl Into<String>) -> Self {
        Self::BackendContract {
            message: message.into(),
        }
    }

    /// Whether the caller can recover by retrying or re-prompting.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::BackendContract { .. })
    }

    /// Text suitable for showing to the person at the keyboard.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message, .. } => message.clone(),
            Self::InvalidCredentials { message } => message.clone(),
            Self::DuplicateEmail { .. } => {
                "An account with this email already exists".to_string()
            }
            Self::Network { .. } => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::Busy => "Another sign-in is in progress. Please try again.".to_string(),
            Self::BackendContract { .. } => "Something went wrong. Please try again later.".to_string(),
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network(format!("request timed out: {}", err))
        } else if err.is_decode() {
            Self::network(format!("malformed response: {}", err))
        } else {
            Self::network(err.to_string())
        }
    }
}

/// A body that does not parse is indistinguishable from a broken backend
impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::network(format!("malformed response: {}", err))
    }
}
