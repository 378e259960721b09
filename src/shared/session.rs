//! Process-wide authentication state.

use crate::shared::identity::Identity;

/// Current authentication state
///
/// `Unresolved` only exists between process start and the first restore
/// attempt (or first settled sign-in); it is never re-entered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Unresolved,
    Anonymous,
    Authenticated(Identity),
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, Session::Unresolved)
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Session::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }
}
