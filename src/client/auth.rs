/**
 * Authentication Module
 *
 * HTTP client for the identity API and the credential verifier that turns
 * its responses into typed outcomes.
 *
 * # Verification Process
 *
 * 1. Reject empty input locally (no request is sent)
 * 2. Send exactly one request, bounded by the configured timeout
 * 3. Map the response envelope to `Identity` or an `AuthError`
 *
 * The verifier never touches the session; the store decides what to commit.
 */

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::client::config::Config;
use crate::client::types::{AuthEnvelope, LoginRequest, SignupRequest};
use crate::shared::{AuthError, Identity};

/// Fallback text when the backend rejects a login without saying why
const DEFAULT_REJECTION: &str = "Invalid email or password";

/// Remote (or simulated) source of truth for accounts
///
/// Implementations report transport failures as `AuthError::Network` and
/// otherwise hand back the response envelope untouched.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthEnvelope, AuthError>;

    async fn signup(&self, request: &SignupRequest) -> Result<AuthEnvelope, AuthError>;
}

/// Identity API over HTTP
#[derive(Debug, Clone)]
pub struct HttpIdentityBackend {
    client: Client,
    login_url: String,
    signup_url: String,
}

impl HttpIdentityBackend {
    pub fn new(config: &Config) -> Result<Self, AuthError> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self {
            client,
            login_url: config.api_url("/login"),
            signup_url: config.api_url("/signup"),
        })
    }

    async fn post<T: Serialize + Sync>(&self, url: &str, body: &T) -> Result<AuthEnvelope, AuthError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Request to {} failed: {}", url, e);
                AuthError::from(e)
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!("Identity API returned {} for {}", status, url);
            return Err(AuthError::network(format!("{} returned {}", url, status)));
        }

        let body = response.text().await?;
        let envelope: AuthEnvelope = serde_json::from_str(&body)?;
        Ok(envelope)
    }
}

#[async_trait]
impl IdentityBackend for HttpIdentityBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthEnvelope, AuthError> {
        self.post(&self.login_url, request).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<AuthEnvelope, AuthError> {
        self.post(&self.signup_url, request).await
    }
}

/// Validates credential attempts and checks them against an identity backend
#[derive(Clone)]
pub struct CredentialVerifier {
    backend: Arc<dyn IdentityBackend>,
}

impl CredentialVerifier {
    pub fn new(backend: Arc<dyn IdentityBackend>) -> Self {
        Self { backend }
    }

    /// Verifier backed by the HTTP identity API described by `config`
    pub fn http(config: &Config) -> Result<Self, AuthError> {
        Ok(Self::new(Arc::new(HttpIdentityBackend::new(config)?)))
    }

    /// Check an email/password pair against the backend.
    pub async fn verify(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        validate_login(email, password)?;

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let envelope = self.backend.login(&request).await?;

        if !envelope.success {
            tracing::warn!("Login rejected for: {}", request.email);
            let message = envelope.error.unwrap_or_else(|| DEFAULT_REJECTION.to_string());
            return Err(AuthError::invalid_credentials(message));
        }

        let identity = require_user(envelope)?;
        tracing::info!("Credentials verified for: {} ({})", identity.email(), identity.role());
        Ok(identity)
    }

    /// Create an account and return its identity.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<Identity, AuthError> {
        validate_signup(name, email, password)?;

        let request = SignupRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let envelope = self.backend.signup(&request).await?;

        if !envelope.success {
            tracing::warn!("Signup rejected for: {}", request.email);
            return Err(match envelope.error {
                Some(message) if mentions_existing_account(&message) => {
                    AuthError::duplicate_email(request.email)
                }
                Some(message) => AuthError::validation("signup", message),
                None => AuthError::validation("signup", "Signup was rejected"),
            });
        }

        let identity = require_user(envelope)?;
        tracing::info!("Account created for: {} ({})", identity.email(), identity.role());
        Ok(identity)
    }
}

/// Local checks for a login attempt; no I/O.
pub fn validate_login(email: &str, password: &str) -> Result<(), AuthError> {
    if email.trim().is_empty() {
        return Err(AuthError::validation("email", "Email is required"));
    }
    if password.trim().is_empty() {
        return Err(AuthError::validation("password", "Password is required"));
    }
    Ok(())
}

/// Local checks for a signup attempt; no I/O.
pub fn validate_signup(name: &str, email: &str, password: &str) -> Result<(), AuthError> {
    if name.trim().is_empty() {
        return Err(AuthError::validation("name", "Name is required"));
    }
    validate_login(email, password)?;
    if !looks_like_email(email.trim()) {
        return Err(AuthError::validation("email", "Please enter a valid email address"));
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

fn mentions_existing_account(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    ["exist", "already", "taken", "registered"]
        .iter()
        .any(|needle| message.contains(needle))
}

fn require_user(envelope: AuthEnvelope) -> Result<Identity, AuthError> {
    envelope.user.ok_or_else(|| {
        tracing::error!("Identity API reported success without a user");
        AuthError::contract("success response carried no user")
    })
}
