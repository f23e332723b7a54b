// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # requests - Convenience HTTP Client
//!
//! Request/response API with content-type driven encoding and session-level
//! cookie persistence, built on reqwest.
//!
//! ## Features
//!
//! - Query encoding: raw strings pass through, maps become `k=v&k=v`
//! - Body encoding: `Content-Type: application/json` always sends JSON,
//!   otherwise strings pass through and maps are form encoded
//! - Always-succeeds calls: transport failures end up in `Response::text`
//! - Server-sent events: `text/event-stream` bodies are handed over unread
//! - Sessions: cookies set by responses are replayed on later requests
//! - Pluggable transport: anything implementing [`Transport`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use requests::{Args, Session};
//!
//! #[tokio::main]
//! async fn main() {
//!     let session = Session::new();
//!
//!     let login = session
//!         .post(
//!             "https://example.com/login",
//!             Args::new().form("user", "bob").form("password", "hunter2"),
//!         )
//!         .await;
//!     println!("login: {}", login.status_code);
//!
//!     // The session cookie from the login response goes along automatically.
//!     let me = session.get("https://example.com/api/me", None).await;
//!     match me.json() {
//!         Ok(profile) => println!("profile: {:?}", profile),
//!         Err(e) => eprintln!("unexpected body {:?}: {}", me.text, e),
//!     }
//! }
//! ```

pub mod error;
pub mod http;

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{
    Args, Auth, BodyStream, ClientConfig, Cookie, CookieJar, CookieScope, HttpClient,
    RedirectPolicy, Request, RequestBuilder, Response, ResponseReader, ReqwestTransport,
    SameSite, Session, Transport, TransportResponse,
};

// Encoding helpers
pub use http::{encode_body, encode_query, map_to_query, query_to_map};

pub use reqwest::{Method, StatusCode};

/// requests version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Execute a GET request with a fresh client
pub async fn get(url: &str, args: impl Into<Option<Args>>) -> Response {
    request(Method::GET, url, args).await
}

/// Execute a HEAD request with a fresh client
pub async fn head(url: &str, args: impl Into<Option<Args>>) -> Response {
    request(Method::HEAD, url, args).await
}

/// Execute an OPTIONS request with a fresh client
pub async fn options(url: &str, args: impl Into<Option<Args>>) -> Response {
    request(Method::OPTIONS, url, args).await
}

/// Execute a POST request with a fresh client
pub async fn post(url: &str, args: impl Into<Option<Args>>) -> Response {
    request(Method::POST, url, args).await
}

/// Execute a PUT request with a fresh client
pub async fn put(url: &str, args: impl Into<Option<Args>>) -> Response {
    request(Method::PUT, url, args).await
}

/// Execute a PATCH request with a fresh client
pub async fn patch(url: &str, args: impl Into<Option<Args>>) -> Response {
    request(Method::PATCH, url, args).await
}

/// Execute a DELETE request with a fresh client
pub async fn delete(url: &str, args: impl Into<Option<Args>>) -> Response {
    request(Method::DELETE, url, args).await
}

/// Execute a request with a fresh client
///
/// No state is shared with other calls; use [`Session`] to keep cookies.
pub async fn request(method: Method, url: &str, args: impl Into<Option<Args>>) -> Response {
    HttpClient::new().request(method, url, args).await
}

/// Create a new session
pub fn session() -> Session {
    Session::new()
}
