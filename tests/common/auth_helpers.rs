//! Authentication test helpers
//!
//! Identity fixtures, wire bodies, and store builders.

use std::sync::Arc;

use rollcall::client::{CredentialVerifier, InMemoryIdentityBackend, SessionCache, SessionStore};
use rollcall::shared::{Identity, Role};
use serde_json::{json, Value};

pub const TEACHER_EMAIL: &str = "osei@school.edu";
pub const STUDENT_EMAIL: &str = "ama@school.edu";
pub const ADMIN_EMAIL: &str = "dana@school.edu";
pub const PASSWORD: &str = "correct horse";

pub fn teacher() -> Identity {
    Identity::new("t-100", "Kwame Osei", TEACHER_EMAIL, Role::Teacher)
}

pub fn student() -> Identity {
    Identity::new("s-200", "Ama Mensah", STUDENT_EMAIL, Role::Student)
        .with_avatar("https://cdn.school.edu/avatars/ama.png")
}

pub fn admin() -> Identity {
    Identity::new("a-300", "Dana Park", ADMIN_EMAIL, Role::Admin)
}

/// `{success: true, user}` as the identity API sends it
pub fn success_body(identity: &Identity) -> Value {
    json!({ "success": true, "user": identity })
}

pub fn failure_body(error: &str) -> Value {
    json!({ "success": false, "error": error })
}

/// In-memory backend knowing the three fixture accounts
pub fn seeded_backend() -> InMemoryIdentityBackend {
    InMemoryIdentityBackend::new()
        .with_account(teacher(), PASSWORD)
        .with_account(student(), PASSWORD)
        .with_account(admin(), PASSWORD)
}

pub fn memory_store(backend: InMemoryIdentityBackend, cache: Arc<dyn SessionCache>) -> SessionStore {
    SessionStore::new(CredentialVerifier::new(Arc::new(backend)), cache)
}
