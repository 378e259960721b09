//! Mock server helpers for integration tests
//!
//! Wraps a wiremock server that stands in for the identity API.

use std::path::Path;
use std::time::Duration;

use rollcall::client::Config;
use rollcall::shared::AppConfig;
use serde_json::Value;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Identity API double
pub struct MockIdentityApi {
    pub server: MockServer,
}

impl MockIdentityApi {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Client config pointing at this server, caching to `session_file`
    pub fn config(&self, session_file: &Path) -> Config {
        let builder = AppConfig::builder()
            .api_url(self.server.uri())
            .request_timeout_secs(1)
            .session_file(session_file);
        Config::with_builder(builder).expect("mock config is valid")
    }

    /// Answer every `POST {endpoint}` with `status` and a JSON body
    pub async fn respond(&self, endpoint: &str, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer every `POST {endpoint}` with a raw, non-JSON body
    pub async fn respond_raw(&self, endpoint: &str, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Answer `POST /login` for one email after `delay`
    pub async fn login_for(&self, email: &str, body: Value, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_partial_json(serde_json::json!({ "email": email })))
            .respond_with(ResponseTemplate::new(200).set_body_json(body).set_delay(delay))
            .mount(&self.server)
            .await;
    }

    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or(0)
    }
}
