//! HTTP mock server helpers for testing outbound provider calls.
//!
//! A thin wrapper around `wiremock` for declarative stubbing of the
//! Congress.gov, news, video and postal-code APIs.
//!
//! # Quick Start
//!
//! ```ignore
//! use crate::common::http_mock::MockHttpServer;
//!
//! #[tokio::test]
//! async fn test_external_api_call() {
//!     let server = MockHttpServer::start().await;
//!
//!     server
//!         .expect_get("/member/P000145/sponsored-legislation")
//!         .with_header("X-API-Key", "test-key")
//!         .respond_with_json(json!({"pagination": {"count": 0}}))
//!         .mount()
//!         .await;
//!
//!     // Point the client at server.url()
//! }
//! ```
//!
//! # Patterns
//!
//! - **Success response**: `.respond_with_json(value)` or `.respond_with_body(string)`
//! - **Error response**: `.respond_with_status(503)`
//! - **Timeout simulation**: `.respond_with_delay(Duration::from_secs(30))`
//! - **Request verification**: `.expect_times(1)` then `server.verify().await`

#![allow(dead_code)]

use std::time::Duration;

use serde_json::Value;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockBuilder, MockServer, ResponseTemplate,
};

/// A running stub server; dropped servers shut down.
pub struct MockHttpServer {
    server: MockServer,
}

impl MockHttpServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL of the server, without a trailing slash.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// The underlying wiremock server, for matchers this wrapper lacks.
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Start stubbing a GET request for `route`.
    pub fn expect_get(&self, route: &str) -> StubBuilder<'_> {
        StubBuilder {
            server: &self.server,
            mock: Mock::given(method("GET")).and(path(route)),
            status: 200,
            body: None,
            delay: None,
            times: None,
        }
    }

    /// Panic if any stub's `expect_times` was not met.
    pub async fn verify(&self) {
        self.server.verify().await;
    }

    /// Number of requests the server has seen.
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }
}

enum StubBody {
    Json(Value),
    Text(String),
}

/// Fluent builder for one stubbed route.
pub struct StubBuilder<'a> {
    server: &'a MockServer,
    mock: MockBuilder,
    status: u16,
    body: Option<StubBody>,
    delay: Option<Duration>,
    times: Option<u64>,
}

impl StubBuilder<'_> {
    /// Only match requests carrying this header value.
    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.mock = self.mock.and(header(name, value));
        self
    }

    /// Only match requests carrying this query parameter.
    #[must_use]
    pub fn with_query(mut self, name: &'static str, value: &'static str) -> Self {
        self.mock = self.mock.and(query_param(name, value));
        self
    }

    #[must_use]
    pub fn respond_with_json(mut self, body: Value) -> Self {
        self.body = Some(StubBody::Json(body));
        self
    }

    #[must_use]
    pub fn respond_with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(StubBody::Text(body.into()));
        self
    }

    #[must_use]
    pub fn respond_with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// JSON body for a non-200 response set with `respond_with_status`.
    #[must_use]
    pub fn with_json_response(self, body: Value) -> Self {
        self.respond_with_json(body)
    }

    #[must_use]
    pub fn respond_with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    #[must_use]
    pub fn expect_times(mut self, times: u64) -> Self {
        self.times = Some(times);
        self
    }

    /// Register the stub with the server.
    pub async fn mount(self) {
        let mut template = ResponseTemplate::new(self.status);
        template = match self.body {
            Some(StubBody::Json(body)) => template.set_body_json(body),
            Some(StubBody::Text(body)) => template.set_body_string(body),
            None => template,
        };
        if let Some(delay) = self.delay {
            template = template.set_delay(delay);
        }

        let mut mock = self.mock.respond_with(template);
        if let Some(times) = self.times {
            mock = mock.expect(times);
        }
        mock.mount(self.server).await;
    }
}
