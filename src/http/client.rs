// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation
//!
//! The client is stateless: no cookies survive between calls. Every call
//! returns a [`Response`], failures included, so callers check
//! `status_code` and `text` rather than a `Result`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;

use super::args::Args;
use super::headers::ACCEPT;
use super::request::{Request, RequestBuilder, DEFAULT_MAX_REDIRECTS};
use super::response::{Response, ResponseReader};
use super::transport::{ReqwestTransport, Transport};
use super::DEFAULT_USER_AGENT;
use crate::error::Error;

/// Deadline applied when a call does not set its own
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Timeout for calls that do not set one
    pub timeout: Duration,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// Headers sent with every request
    pub default_headers: HeaderMap,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            default_headers,
        }
    }
}

impl ClientConfig {
    /// Create a new client config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set default timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set max redirects
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Add a default header
    pub fn default_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.default_headers
            .insert(name, HeaderValue::from_static(value));
        self
    }
}

/// Stateless HTTP client
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: ClientConfig) -> Self {
        let transport = ReqwestTransport::new(&config.user_agent, config.default_headers.clone());
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client sending through the given transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, config }
    }

    /// Get client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute a GET request
    pub async fn get(&self, url: &str, args: impl Into<Option<Args>>) -> Response {
        self.request(Method::GET, url, args).await
    }

    /// Execute a HEAD request
    pub async fn head(&self, url: &str, args: impl Into<Option<Args>>) -> Response {
        self.request(Method::HEAD, url, args).await
    }

    /// Execute an OPTIONS request
    pub async fn options(&self, url: &str, args: impl Into<Option<Args>>) -> Response {
        self.request(Method::OPTIONS, url, args).await
    }

    /// Execute a POST request
    pub async fn post(&self, url: &str, args: impl Into<Option<Args>>) -> Response {
        self.request(Method::POST, url, args).await
    }

    /// Execute a PUT request
    pub async fn put(&self, url: &str, args: impl Into<Option<Args>>) -> Response {
        self.request(Method::PUT, url, args).await
    }

    /// Execute a PATCH request
    pub async fn patch(&self, url: &str, args: impl Into<Option<Args>>) -> Response {
        self.request(Method::PATCH, url, args).await
    }

    /// Execute a DELETE request
    pub async fn delete(&self, url: &str, args: impl Into<Option<Args>>) -> Response {
        self.request(Method::DELETE, url, args).await
    }

    /// Build and execute a request
    ///
    /// No arguments behaves exactly like `Args::default()`.
    pub async fn request(&self, method: Method, url: &str, args: impl Into<Option<Args>>) -> Response {
        let args = args.into().unwrap_or_default();
        let built = RequestBuilder::new(method, url)
            .args(args)
            .max_redirects(self.config.max_redirects)
            .build();

        match built {
            Ok(request) => self.execute(request).await,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Request could not be built");
                Response::from_error(&e, 0)
            }
        }
    }

    /// Execute a prepared request
    ///
    /// The timeout covers the wait for headers and, for buffered responses,
    /// the body read. Streaming bodies are not cut off.
    pub async fn execute(&self, mut request: Request) -> Response {
        let start = Instant::now();
        let deadline = *request.timeout.get_or_insert(self.config.timeout);

        let reader = ResponseReader::new(request.stream);
        let method = request.method.clone();
        let url = request.url.clone();
        tracing::debug!(method = %method, url = %url, "Request");

        let sent = tokio::time::timeout(deadline, self.transport.send(request))
            .await
            .unwrap_or_else(|_| Err(Error::Timeout(deadline)));

        match sent {
            Ok(raw) => {
                let remaining = deadline.saturating_sub(start.elapsed());
                let response = reader.with_deadline(remaining).read(raw).await;
                tracing::debug!(
                    method = %method,
                    url = %url,
                    status = response.status_code,
                    streaming = response.is_streaming(),
                    time_ms = start.elapsed().as_millis() as u64,
                    "Response"
                );
                response
            }
            Err(e) => {
                tracing::debug!(method = %method, url = %url, error = %e, "Request failed");
                Response::from_error(&e, e.status().unwrap_or(0))
            }
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::mock::ScriptedTransport;
    use crate::http::RedirectPolicy;
    use serde_json::json;

    fn client(transport: &Arc<ScriptedTransport>) -> HttpClient {
        HttpClient::with_transport(ClientConfig::default(), transport.clone())
    }

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new();
        assert_eq!(client.config().user_agent, DEFAULT_USER_AGENT);
        assert_eq!(client.config().timeout, DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn test_no_args_follows_redirects_with_default_timeout() {
        let transport = ScriptedTransport::new();
        transport.respond(200, &[], "ok");

        let resp = client(&transport).get("http://example.com/", None).await;
        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.text, "ok");

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].redirect, RedirectPolicy::Limited(DEFAULT_MAX_REDIRECTS));
        assert_eq!(sent[0].timeout, Some(DEFAULT_TIMEOUT));
    }

    #[tokio::test]
    async fn test_caller_timeout_honored() {
        let transport = ScriptedTransport::new();
        transport.respond(204, &[], "");

        let args = Args::new().timeout(Duration::from_millis(250));
        client(&transport).delete("http://example.com/item/1", args).await;

        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::DELETE);
        assert_eq!(sent[0].timeout, Some(Duration::from_millis(250)));
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_text() {
        let transport = ScriptedTransport::new();
        transport.fail("connection refused");

        let resp = client(&transport).post("http://example.com/", Args::new().data("x")).await;
        assert_eq!(resp.status_code, 0);
        assert_eq!(resp.text, "connection refused");
        assert!(resp.headers.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_known_status() {
        let transport = ScriptedTransport::new();
        let raw = http::Response::builder().status(503).body("").unwrap();
        let err = reqwest::Response::from(raw).error_for_status().unwrap_err();
        transport.fail_with(Error::from(err));

        let resp = client(&transport).get("http://example.com/", None).await;
        assert_eq!(resp.status_code, 503);
        assert!(resp.text.starts_with("HTTP error"));
    }

    #[tokio::test]
    async fn test_bad_url_becomes_text() {
        let transport = ScriptedTransport::new();
        let resp = client(&transport).get("not a url", None).await;

        assert_eq!(resp.status_code, 0);
        assert!(resp.text.starts_with("Invalid URL"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_json_body_on_the_wire() {
        let transport = ScriptedTransport::new();
        transport.respond(201, &[("content-type", "application/json")], r#"{"id":1}"#);

        let args = Args::new()
            .header("Content-Type", "application/json")
            .data(json!({"a": 1}));
        let resp = client(&transport).put("http://example.com/items", args).await;

        assert_eq!(resp.json().unwrap()["id"], 1);
        assert_eq!(transport.requests()[0].body.as_deref(), Some(&br#"{"a":1}"#[..]));
    }

    #[tokio::test]
    async fn test_stream_flag_forces_streaming() {
        let transport = ScriptedTransport::new();
        transport.respond(200, &[("content-type", "text/plain")], "chunked");

        let mut resp = client(&transport)
            .get("http://example.com/feed", Args::new().stream(true))
            .await;
        assert!(resp.text.is_empty());

        let body = resp.take_body().unwrap().read_to_end().await.unwrap();
        assert_eq!(body, "chunked");
    }
}
