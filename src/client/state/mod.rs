//! Session Store
//!
//! Owns the process-wide [`Session`] and serializes the operations that change
//! it. Construct one per process (or per test) and hand references to the
//! presentation layer; there is no global instance.
//!
//! # Lifecycle
//!
//! `new` (Unresolved) → `init` (restore from cache) → `login` / `signup` /
//! `logout` any number of times → `teardown`.
//!
//! # Ordering
//!
//! Every login/signup takes a ticket from a monotonic counter when it is
//! called, before the returned future is first polled; `logout` advances the
//! counter too. A result commits only if its ticket is still the newest one,
//! so a slow response can never overwrite the outcome of a later call, however
//! the caller schedules the futures. With [`MutationPolicy::RejectConcurrent`]
//! a second call is refused up front instead.
//!
//! The state lock only guards in-memory bookkeeping. Cache reads and writes
//! happen after it is released, tagged with the ticket that produced them, and
//! a write older than the last one applied is skipped.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::client::auth::{validate_login, validate_signup, CredentialVerifier};
use crate::client::cache::{FileSessionCache, NoSessionCache, SessionCache};
use crate::client::config::Config;
use crate::client::intent::LogoutDecision;
use crate::shared::{AuthError, Identity, MutationPolicy, Session};

struct Inner {
    session: Session,
    /// Ticket of the most recently issued mutation
    issued: u64,
    in_flight: usize,
}

/// Releases an in-flight slot when a login/signup finishes or is dropped
struct InFlight<'a> {
    store: &'a SessionStore,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut inner = self.store.lock();
        inner.in_flight = inner.in_flight.saturating_sub(1);
    }
}

/// Holder of the current session
pub struct SessionStore {
    verifier: CredentialVerifier,
    cache: Arc<dyn SessionCache>,
    policy: MutationPolicy,
    max_age: Option<chrono::Duration>,
    inner: Mutex<Inner>,
    /// Ticket of the last cache write; held for the duration of cache I/O
    cache_ticket: Mutex<u64>,
}

impl SessionStore {
    pub fn new(verifier: CredentialVerifier, cache: Arc<dyn SessionCache>) -> Self {
        Self {
            verifier,
            cache,
            policy: MutationPolicy::default(),
            max_age: None,
            inner: Mutex::new(Inner {
                session: Session::Unresolved,
                issued: 0,
                in_flight: 0,
            }),
            cache_ticket: Mutex::new(0),
        }
    }

    /// Store talking to the HTTP identity API, caching to the configured file
    pub fn from_config(config: &Config) -> Result<Self, AuthError> {
        let verifier = CredentialVerifier::http(config)?;
        let cache: Arc<dyn SessionCache> = match config.session_file() {
            Some(path) => Arc::new(FileSessionCache::new(path)),
            None => {
                tracing::warn!("No data directory available; sessions will not survive restarts");
                Arc::new(NoSessionCache)
            }
        };
        let mut store = Self::new(verifier, cache).with_policy(config.mutation_policy());
        store.max_age = config.session_max_age();
        Ok(store)
    }

    pub fn with_policy(mut self, policy: MutationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Ignore cached sessions older than `max_age` at startup
    pub fn with_max_age(mut self, max_age: chrono::Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Resolve the session from the cache. Only the first call does anything.
    pub fn init(&self) -> Session {
        {
            let inner = self.lock();
            if inner.session.is_resolved() {
                return inner.session.clone();
            }
        }

        let (restored, expired) = match self.cache.load() {
            Ok(Some(entry)) if entry.is_fresh(self.max_age, Utc::now()) => {
                tracing::info!("Restored session for: {}", entry.identity.email());
                (Session::Authenticated(entry.identity), false)
            }
            Ok(Some(entry)) => {
                tracing::info!("Cached session for {} expired; starting signed out", entry.identity.email());
                (Session::Anonymous, true)
            }
            Ok(None) => (Session::Anonymous, false),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session cache: {}", e);
                (Session::Anonymous, false)
            }
        };

        let ticket = {
            let mut inner = self.lock();
            // A sign-in may have settled while the cache was being read
            if inner.session.is_resolved() {
                return inner.session.clone();
            }
            inner.session = restored.clone();
            inner.issued
        };
        if expired {
            self.write_cache(ticket, None);
        }
        restored
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Session {
        self.lock().session.clone()
    }

    /// Whether a login or signup is waiting on the backend
    pub fn is_busy(&self) -> bool {
        self.lock().in_flight > 0
    }

    /// Sign in. Validation and ticketing happen on this call; the returned
    /// future only waits for the backend and commits.
    pub fn login<'a>(
        &'a self,
        email: &'a str,
        password: &'a str,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send + 'a {
        let started = validate_login(email, password).and_then(|()| self.begin());
        if let Ok((ticket, _)) = &started {
            tracing::info!("Login request #{} for: {}", ticket, email.trim());
        }

        async move {
            let (ticket, _slot) = started?;
            let outcome = self.verifier.verify(email, password).await;
            self.settle(ticket, outcome)
        }
    }

    /// Create an account and sign in as it. Ordered the same way as [`login`](Self::login).
    pub fn signup<'a>(
        &'a self,
        name: &'a str,
        email: &'a str,
        password: &'a str,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send + 'a {
        let started = validate_signup(name, email, password).and_then(|()| self.begin());
        if let Ok((ticket, _)) = &started {
            tracing::info!("Signup request #{} for: {}", ticket, email.trim());
        }

        async move {
            let (ticket, _slot) = started?;
            let outcome = self.verifier.register(name, email, password).await;
            self.settle(ticket, outcome)
        }
    }

    /// Sign out. Safe to call in any state.
    pub fn logout(&self) {
        let ticket = {
            let mut inner = self.lock();
            inner.issued += 1;
            match std::mem::replace(&mut inner.session, Session::Anonymous) {
                Session::Authenticated(identity) => {
                    tracing::info!("Signed out: {}", identity.email());
                }
                _ => tracing::debug!("Logout with no active session"),
            }
            inner.issued
        };
        self.write_cache(ticket, None);
    }

    /// Carry out a resolved logout intent and return the resulting session
    pub fn apply(&self, decision: LogoutDecision) -> Session {
        if decision == LogoutDecision::Proceed {
            self.logout();
        }
        self.current()
    }

    /// Consume the store. Pending login/signup futures borrow it, so none can
    /// outlive this call and commit afterwards.
    pub fn teardown(self) {
        let authenticated = self.lock().session.is_authenticated();
        tracing::info!("Session store torn down (signed in: {})", authenticated);
    }

    fn begin(&self) -> Result<(u64, InFlight<'_>), AuthError> {
        let mut inner = self.lock();
        if self.policy == MutationPolicy::RejectConcurrent && inner.in_flight > 0 {
            tracing::warn!("Rejecting sign-in while another is in flight");
            return Err(AuthError::Busy);
        }
        inner.issued += 1;
        inner.in_flight += 1;
        Ok((inner.issued, InFlight { store: self }))
    }

    fn settle(&self, ticket: u64, outcome: Result<Identity, AuthError>) -> Result<Identity, AuthError> {
        let committed = {
            let mut inner = self.lock();
            if ticket != inner.issued {
                match &outcome {
                    Err(error @ AuthError::BackendContract { .. }) => {
                        tracing::error!("Superseded request #{} hit a backend fault: {}", ticket, error);
                    }
                    _ => tracing::debug!("Discarding result of request #{}; newest is #{}", ticket, inner.issued),
                }
                return Err(AuthError::Busy);
            }

            match outcome {
                Ok(identity) => {
                    tracing::info!("Signed in: {} ({})", identity.email(), identity.role());
                    inner.session = Session::Authenticated(identity.clone());
                    Ok(identity)
                }
                Err(error) => {
                    if error.is_recoverable() {
                        tracing::warn!("Request #{} failed: {}", ticket, error);
                    } else {
                        tracing::error!("Request #{} failed: {}", ticket, error);
                    }
                    inner.session = Session::Anonymous;
                    Err(error)
                }
            }
        };

        self.write_cache(ticket, committed.as_ref().ok());
        committed
    }

    /// Save `identity` (or clear the cache on `None`) unless a newer write
    /// already landed. Never called with the state lock held.
    fn write_cache(&self, ticket: u64, identity: Option<&Identity>) {
        let mut last = self.cache_ticket.lock().unwrap_or_else(PoisonError::into_inner);
        if ticket < *last {
            tracing::debug!("Skipping cache write for request #{}; #{} already written", ticket, *last);
            return;
        }
        *last = ticket;

        let result = match identity {
            Some(identity) => self.cache.save(identity),
            None => self.cache.clear(),
        };
        if let Err(e) = result {
            tracing::warn!("Failed to update session cache: {}", e);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
