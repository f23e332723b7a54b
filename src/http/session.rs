// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Sessions: a client plus a cookie jar that outlives single calls
//!
//! Before each call the session merges the call's own cookies into the jar
//! (stored cookies win on conflict) and sends the jar's cookies for the
//! target URL. After the call every cookie the response set is upserted,
//! attributed to the responding host when it names no domain.
//!
//! The jar is locked per operation, so a session can be shared across tasks.
//! Two calls racing on the same session still interleave their merge and
//! update steps; serialize them if the cookie order between them matters.

use reqwest::Method;
use url::Url;

use super::args::Args;
use super::client::{ClientConfig, HttpClient};
use super::cookie::{Cookie, CookieJar, CookieScope};
use super::response::Response;

/// Stateful client keeping cookies across requests
#[derive(Clone)]
pub struct Session {
    client: HttpClient,
    cookie_jar: CookieJar,
}

impl Session {
    /// Create a session with per-origin cookie scoping
    pub fn new() -> Self {
        Self::with_client(HttpClient::new(), CookieJar::new())
    }

    /// Create a session whose jar keeps one cookie per name and sends all of
    /// them everywhere
    pub fn legacy() -> Self {
        Self::with_client(HttpClient::new(), CookieJar::with_scope(CookieScope::Name))
    }

    /// Create a session with custom client configuration
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_client(HttpClient::with_config(config), CookieJar::new())
    }

    /// Create a session from an existing client and jar
    pub fn with_client(client: HttpClient, cookie_jar: CookieJar) -> Self {
        Self { client, cookie_jar }
    }

    /// Get the cookie jar
    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    /// Get the underlying client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Value of a stored cookie ("" when absent)
    pub fn get_cookie(&self, name: &str) -> String {
        self.cookie_jar
            .get(name)
            .map(|c| c.value)
            .unwrap_or_default()
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

    /// Execute a request with the session's cookies
    pub async fn request(&self, method: Method, url: &str, args: impl Into<Option<Args>>) -> Response {
        let mut args = args.into().unwrap_or_default();

        // The client reports a bad URL; nothing will be sent.
        let target = Url::parse(url).ok();
        args.cookies = match target {
            Some(ref target) => {
                self.cookie_jar.absorb_for(target, &args.cookies);
                self.cookie_jar.cookies_for(target)
            }
            None => Vec::new(),
        };

        let response = self.client.request(method, url, args).await;

        let origin = response.url.as_ref().or(target.as_ref());
        let received: Vec<Cookie> = response
            .cookies
            .iter()
            .cloned()
            .map(|mut cookie| {
                if let Some(origin) = origin {
                    cookie.attribute_to(origin);
                }
                cookie
            })
            .collect();
        self.cookie_jar.update(&received);
        response
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
