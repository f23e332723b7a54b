// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Per-call request arguments

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde_json::{Map, Value};

use super::cookie::Cookie;
use super::encode;
use crate::error::Result;

/// Optional argument bundle for a single request
///
/// Every field has a "use the default" value, so `Args::default()` is the
/// same as passing no arguments at all.
#[derive(Debug, Clone)]
pub struct Args {
    /// Query parameters: a raw string or an object of key/value pairs
    pub params: Option<Value>,
    /// Body data: a raw string, an object (form encoded) or any JSON value
    pub data: Option<Value>,
    /// JSON body, serialized verbatim; overrides `data`
    pub json: Option<Value>,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Cookies sent with this request
    pub cookies: Vec<Cookie>,
    /// Proxy URL used for every scheme
    pub proxy: Option<String>,
    /// Authorization
    pub auth: Option<Auth>,
    /// Per-call deadline (None = client default)
    pub timeout: Option<Duration>,
    /// Follow redirects
    pub allow_redirects: bool,
    /// Verify the server's TLS certificate
    pub verify: bool,
    /// Force (Some(true)) or forbid (Some(false)) streaming the body
    pub stream: Option<bool>,
    /// PEM file holding a client certificate and its private key
    pub cert: Option<PathBuf>,
}

/// Authorization scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// HTTP Basic auth
    Basic { username: String, password: String },
    /// Bearer token
    Bearer(String),
}

impl Auth {
    /// Basic auth from a username and password
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Auth::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Bearer token auth
    pub fn bearer(token: impl Into<String>) -> Self {
        Auth::Bearer(token.into())
    }

    /// Value of the `Authorization` header
    pub fn header_value(&self) -> String {
        match self {
            Auth::Basic { username, password } => {
                let encoded = base64::Engine::encode(
                    &base64::engine::general_purpose::STANDARD,
                    format!("{}:{}", username, password),
                );
                format!("Basic {}", encoded)
            }
            Auth::Bearer(token) => format!("Bearer {}", token),
        }
    }
}

impl Default for Args {
    fn default() -> Self {
        Self {
            params: None,
            data: None,
            json: None,
            headers: HashMap::new(),
            cookies: Vec::new(),
            proxy: None,
            auth: None,
            timeout: None,
            allow_redirects: true,
            verify: true,
            stream: None,
            cert: None,
        }
    }
}

impl Args {
    /// Create an empty argument bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query parameters (string or object)
    pub fn params(mut self, params: impl Into<Value>) -> Self {
        self.params = Some(params.into());
        self
    }

    /// Add a single query parameter, turning `params` into an object
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        insert_pair(&mut self.params, key.into(), value.into());
        self
    }

    /// Set the body data (string, object or any JSON value)
    pub fn data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Add a single form field, turning `data` into an object
    pub fn form(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        insert_pair(&mut self.data, key.into(), value.into());
        self
    }

    /// Set a JSON body
    pub fn json(mut self, json: impl Into<Value>) -> Self {
        self.json = Some(json.into());
        self
    }

    /// Set a header, replacing an earlier value for the same name
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set multiple headers
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Add a cookie
    pub fn cookie(mut self, cookie: Cookie) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set authorization
    pub fn auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enable/disable following redirects
    pub fn allow_redirects(mut self, allow: bool) -> Self {
        self.allow_redirects = allow;
        self
    }

    /// Enable/disable TLS certificate verification
    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Force or forbid streaming the response body
    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }

    /// Set client certificate PEM file
    pub fn cert(mut self, cert: impl Into<PathBuf>) -> Self {
        self.cert = Some(cert.into());
        self
    }

    /// Check that `params` and `data` can be encoded without loss
    ///
    /// Sending never fails on these: the encoder quietly drops what it cannot
    /// represent. Call this first to find out.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref params) = self.params {
            encode::try_encode_query(params)?;
        }
        if let Some(ref data) = self.data {
            encode::try_encode_body(data, &self.headers)?;
        }
        if let Some(ref json) = self.json {
            serde_json::to_vec(json)?;
        }
        Ok(())
    }
}

fn insert_pair(slot: &mut Option<Value>, key: String, value: Value) {
    match slot {
        Some(Value::Object(map)) => {
            map.insert(key, value);
        }
        _ => {
            let mut map = Map::new();
            map.insert(key, value);
            *slot = Some(Value::Object(map));
        }
    }
}
