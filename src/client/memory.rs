//! In-process identity backend.
//!
//! Speaks the same envelope as the HTTP API so the verifier cannot tell the
//! two apart. Used by the test suites and by the probe's offline mode.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::client::auth::IdentityBackend;
use crate::client::types::{AuthEnvelope, LoginRequest, SignupRequest};
use crate::shared::{AuthError, Identity, Role};

struct Account {
    identity: Identity,
    password: String,
}

/// Accounts held in memory, keyed by lowercase email
pub struct InMemoryIdentityBackend {
    accounts: Mutex<HashMap<String, Account>>,
    signup_role: Role,
    latency: HashMap<String, Duration>,
    unreachable: HashSet<String>,
}

impl Default for InMemoryIdentityBackend {
    fn default() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            signup_role: Role::Teacher,
            latency: HashMap::new(),
            unreachable: HashSet::new(),
        }
    }
}

impl InMemoryIdentityBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing account
    pub fn with_account(self, identity: Identity, password: impl Into<String>) -> Self {
        let key = identity.email().to_ascii_lowercase();
        self.lock().insert(key, Account { identity, password: password.into() });
        self
    }

    /// Role given to accounts created through signup. Admin is never handed out.
    pub fn with_signup_role(mut self, role: Role) -> Self {
        if role.is_admin() {
            tracing::warn!("Refusing admin as signup role; keeping {}", self.signup_role);
        } else {
            self.signup_role = role;
        }
        self
    }

    /// Delay every answer for `email` by `delay`
    pub fn with_latency(mut self, email: &str, delay: Duration) -> Self {
        self.latency.insert(email.to_ascii_lowercase(), delay);
        self
    }

    /// Answer every request for `email` with a network error, after any latency
    pub fn with_outage(mut self, email: &str) -> Self {
        self.unreachable.insert(email.to_ascii_lowercase());
        self
    }

    pub fn account_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Account>> {
        self.accounts.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    async fn simulate_latency(&self, email: &str) -> Result<(), AuthError> {
        if let Some(delay) = self.latency.get(email) {
            tokio::time::sleep(*delay).await;
        }
        if self.unreachable.contains(email) {
            return Err(AuthError::network("identity service unreachable"));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityBackend for InMemoryIdentityBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthEnvelope, AuthError> {
        let key = request.email.to_ascii_lowercase();
        self.simulate_latency(&key).await?;

        let accounts = self.lock();
        let envelope = match accounts.get(&key) {
            Some(account) if account.password == request.password => AuthEnvelope {
                success: true,
                user: Some(account.identity.clone()),
                error: None,
            },
            _ => AuthEnvelope {
                success: false,
                user: None,
                error: Some("Invalid email or password".to_string()),
            },
        };
        Ok(envelope)
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthEnvelope, AuthError> {
        let key = request.email.to_ascii_lowercase();
        self.simulate_latency(&key).await?;

        let mut accounts = self.lock();
        if accounts.contains_key(&key) {
            return Ok(AuthEnvelope {
                success: false,
                user: None,
                error: Some("Email already registered".to_string()),
            });
        }

        let identity = Identity::new(
            Uuid::new_v4().to_string(),
            request.name.clone(),
            request.email.clone(),
            self.signup_role.clone(),
        );
        accounts.insert(
            key,
            Account { identity: identity.clone(), password: request.password.clone() },
        );
        Ok(AuthEnvelope { success: true, user: Some(identity), error: None })
    }
}
