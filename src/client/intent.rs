//! Confirm-before-logout as data.
//!
//! The presentation layer asks for an intent, shows whatever dialog it likes,
//! resolves the intent with the person's answer, and hands the decision to
//! [`SessionStore::apply`](crate::client::SessionStore::apply).

use crate::shared::Session;

/// What a logout request needs before it can happen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoutIntent {
    /// Nobody is signed in
    AlreadySignedOut,
    /// Ask the signed-in person to confirm
    ConfirmRequired { name: String },
}

/// Outcome of a resolved intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutDecision {
    Proceed,
    Cancel,
    Nothing,
}

pub fn request_logout(session: &Session) -> LogoutIntent {
    match session.identity() {
        Some(identity) => LogoutIntent::ConfirmRequired {
            name: identity.name().to_string(),
        },
        None => LogoutIntent::AlreadySignedOut,
    }
}

impl LogoutIntent {
    /// Prompt text for the confirmation dialog, if one is needed
    pub fn prompt(&self) -> Option<String> {
        match self {
            LogoutIntent::ConfirmRequired { name } => Some(format!("Log out of {}'s account?", name)),
            LogoutIntent::AlreadySignedOut => None,
        }
    }

    pub fn resolve(self, confirmed: bool) -> LogoutDecision {
        match (self, confirmed) {
            (LogoutIntent::AlreadySignedOut, _) => LogoutDecision::Nothing,
            (LogoutIntent::ConfirmRequired { .. }, true) => LogoutDecision::Proceed,
            (LogoutIntent::ConfirmRequired { .. }, false) => LogoutDecision::Cancel,
        }
    }
}
