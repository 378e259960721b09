use crate::client::router::{route, Destination};
use crate::client::state::SessionStore;

/// State behind the login/signup screen
#[derive(Debug, Clone, Default)]
pub struct AuthForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub is_signup_mode: bool,
    pub error: Option<String>,
    pub loading: bool,
}

impl AuthForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn toggle_mode(&mut self) {
        self.is_signup_mode = !self.is_signup_mode;
        self.clear_error();
        self.password.clear();
        self.confirm_password.clear();
    }

    /// Log in or sign up with the current inputs, then route.
    ///
    /// Failures land in `error` as user-facing text; the returned destination
    /// always reflects the store's session afterwards.
    pub async fn submit(&mut self, store: &SessionStore) -> Destination {
        self.clear_error();

        if self.is_signup_mode && self.password != self.confirm_password {
            self.set_error("Passwords do not match");
            return route(&store.current());
        }

        self.loading = true;
        let result = if self.is_signup_mode {
            store.signup(&self.name, &self.email, &self.password).await
        } else {
            store.login(&self.email, &self.password).await
        };
        self.loading = false;

        match result {
            Ok(identity) => {
                tracing::debug!("Form submitted for: {}", identity.email());
                self.password.clear();
                self.confirm_password.clear();
                self.is_signup_mode = false;
            }
            Err(e) => {
                if !e.is_recoverable() {
                    tracing::error!("Unrecoverable sign-in failure: {}", e);
                }
                self.set_error(e.user_message());
            }
        }

        route(&store.current())
    }
}
