/**
 * Wire Types Module
 *
 * Request and response bodies exchanged with the identity API.
 */

use serde::{Deserialize, Serialize};

use crate::shared::Identity;

/// Body of `POST /login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /signup`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Response from both auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthEnvelope {
    pub success: bool,
    #[serde(default)]
    pub user: Option<Identity>,
    #[serde(default)]
    pub error: Option<String>,
}
