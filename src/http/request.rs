// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Prepared requests and the builder that assembles them from [`Args`]

use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use url::Url;

use super::args::Args;
use super::cookie::{cookie_header, Cookie};
use super::encode::{self, JSON_MEDIA_TYPE};
use super::headers::{AUTHORIZATION, CONTENT_TYPE};
use crate::error::{Error, Result};

/// Default number of redirects followed
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Redirect handling for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectPolicy {
    /// Return the first 3xx response as-is
    None,
    /// Follow up to this many redirects
    Limited(usize),
}

/// A request ready to hand to a transport
#[derive(Debug, Clone)]
pub struct Request {
    /// Request method
    pub method: Method,
    /// Request URL, query included
    pub url: Url,
    /// Request headers
    pub headers: HeaderMap,
    /// Cookies, sent as one `Cookie` header
    pub cookies: Vec<Cookie>,
    /// Request body
    pub body: Option<Bytes>,
    /// Redirect handling
    pub redirect: RedirectPolicy,
    /// Proxy URL (unparsed)
    pub proxy: Option<String>,
    /// Deadline for the response headers and any buffered body (None = client default)
    pub timeout: Option<Duration>,
    /// Verify TLS certificates
    pub verify: bool,
    /// Client certificate PEM file
    pub cert: Option<PathBuf>,
    /// Streaming override for the response
    pub stream: Option<bool>,
}

impl Request {
    /// Create a bare request
    pub fn new(method: Method, url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            method,
            url: Url::parse(url.as_ref())?,
            headers: HeaderMap::new(),
            cookies: Vec::new(),
            body: None,
            redirect: RedirectPolicy::Limited(DEFAULT_MAX_REDIRECTS),
            proxy: None,
            timeout: None,
            verify: true,
            cert: None,
            stream: None,
        })
    }

    /// Value of the `Cookie` header this request carries
    pub fn cookie_header(&self) -> Option<String> {
        cookie_header(&self.cookies)
    }

    /// Get the host
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Get a header value as text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Assembles a [`Request`] from a method, a URL and an argument bundle
#[derive(Debug)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    args: Args,
    max_redirects: usize,
}

impl RequestBuilder {
    /// Create a new request builder
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            args: Args::default(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    /// Use these arguments
    pub fn args(mut self, args: Args) -> Self {
        self.args = args;
        self
    }

    /// Set how many redirects are followed when redirects are allowed
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Build the request
    ///
    /// Encoded parameters are appended after a `?` without looking at the
    /// URL: a URL that already has a query ends up with two `?`.
    pub fn build(self) -> Result<Request> {
        let Self {
            method,
            mut url,
            args,
            max_redirects,
        } = self;

        if let Some(ref params) = args.params {
            let query = encode::encode_query(params);
            if !query.is_empty() {
                url.push('?');
                url.push_str(&query);
            }
        }

        let mut request = Request::new(method, &url)?;

        for (name, value) in &args.headers {
            match header_pair(name, value) {
                Ok((name, value)) => {
                    request.headers.insert(name, value);
                }
                Err(e) => tracing::warn!(error = %e, "Skipping header"),
            }
        }

        if let Some(ref json) = args.json {
            match serde_json::to_vec(json) {
                Ok(body) => {
                    request.body = Some(Bytes::from(body));
                    if !request.headers.contains_key(CONTENT_TYPE) {
                        request.headers.insert(
                            HeaderName::from_static(CONTENT_TYPE),
                            HeaderValue::from_static(JSON_MEDIA_TYPE),
                        );
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Dropping JSON body"),
            }
        } else if let Some(ref data) = args.data {
            let body = encode::encode_body(data, &args.headers);
            if !body.is_empty() {
                request.body = Some(body);
            }
        }

        if let Some(ref auth) = args.auth {
            let (name, value) = header_pair(AUTHORIZATION, &auth.header_value())?;
            request.headers.insert(name, value);
        }

        request.cookies = args.cookies;
        request.redirect = if args.allow_redirects {
            RedirectPolicy::Limited(max_redirects)
        } else {
            RedirectPolicy::None
        };
        request.proxy = args.proxy;
        request.timeout = args.timeout;
        request.verify = args.verify;
        request.cert = args.cert;
        request.stream = args.stream;

        Ok(request)
    }
}

fn header_pair(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let header_name =
        HeaderName::try_from(name).map_err(|e| Error::invalid_header(name, e))?;
    let header_value =
        HeaderValue::try_from(value).map_err(|e| Error::invalid_header(name, e))?;
    Ok((header_name, header_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Auth;
    use serde_json::json;

    fn build(method: Method, url: &str, args: Args) -> Request {
        RequestBuilder::new(method, url).args(args).build().unwrap()
    }

    #[test]
    fn test_request_creation() {
        let req = Request::new(Method::GET, "https://example.com/path").unwrap();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.host(), Some("example.com"));
        assert_eq!(req.redirect, RedirectPolicy::Limited(DEFAULT_MAX_REDIRECTS));
    }

    #[test]
    fn test_params_appended() {
        let req = build(Method::GET, "https://example.com/search", Args::new().param("q", "rust"));
        assert_eq!(req.url.as_str(), "https://example.com/search?q=rust");
    }

    #[test]
    fn test_raw_params_not_reencoded() {
        let req = build(Method::GET, "https://example.com/", Args::new().params("a=%41&b=c"));
        assert_eq!(req.url.query(), Some("a=%41&b=c"));
    }

    #[test]
    fn test_existing_query_not_merged() {
        let req = build(Method::GET, "https://example.com/?a=1", Args::new().param("b", 2));
        assert_eq!(req.url.query(), Some("a=1?b=2"));
    }

    #[test]
    fn test_empty_params_leave_url_alone() {
        let req = build(Method::GET, "https://example.com/x", Args::new().params(json!([1])));
        assert_eq!(req.url.as_str(), "https://example.com/x");
    }

    #[test]
    fn test_headers_overwrite() {
        let req = build(
            Method::GET,
            "https://example.com",
            Args::new().header("x-custom", "one").header("x-custom", "two"),
        );
        assert_eq!(req.header("x-custom"), Some("two"));
        assert_eq!(req.headers.get_all("x-custom").iter().count(), 1);
    }

    #[test]
    fn test_invalid_header_skipped() {
        let req = build(
            Method::GET,
            "https://example.com",
            Args::new().header("bad header", "x").header("x-ok", "1"),
        );
        assert_eq!(req.headers.len(), 1);
    }

    #[test]
    fn test_json_content_type_forces_json_body() {
        let req = build(
            Method::POST,
            "https://example.com",
            Args::new()
                .header("Content-Type", "application/json")
                .data(json!({"a": 1})),
        );
        assert_eq!(req.body.as_deref(), Some(&br#"{"a":1}"#[..]));
    }

    #[test]
    fn test_form_body() {
        let req = build(Method::POST, "https://example.com", Args::new().form("user", "bob"));
        assert_eq!(req.body.as_deref(), Some(&b"user=bob"[..]));
        assert!(req.header("content-type").is_none());
    }

    #[test]
    fn test_json_arg_sets_content_type() {
        let req = build(Method::POST, "https://example.com", Args::new().json(json!([1, 2])));
        assert_eq!(req.body.as_deref(), Some(&b"[1,2]"[..]));
        assert_eq!(req.header("content-type"), Some("application/json"));
    }

    #[test]
    fn test_unsupported_data_sends_no_body() {
        let req = build(Method::POST, "https://example.com", Args::new().data(json!(42)));
        assert!(req.body.is_none());
    }

    #[test]
    fn test_redirect_policy() {
        let req = build(Method::GET, "https://example.com", Args::default());
        assert_eq!(req.redirect, RedirectPolicy::Limited(DEFAULT_MAX_REDIRECTS));

        let req = build(Method::GET, "https://example.com", Args::new().allow_redirects(false));
        assert_eq!(req.redirect, RedirectPolicy::None);

        let req = RequestBuilder::new(Method::GET, "https://example.com")
            .max_redirects(3)
            .build()
            .unwrap();
        assert_eq!(req.redirect, RedirectPolicy::Limited(3));
    }

    #[test]
    fn test_cookies_and_auth() {
        let req = build(
            Method::GET,
            "https://example.com",
            Args::new()
                .cookie(Cookie::new("a", "1"))
                .cookie(Cookie::new("b", "2"))
                .auth(Auth::bearer("tok")),
        );
        assert_eq!(req.cookie_header().as_deref(), Some("a=1; b=2"));
        assert_eq!(req.header("authorization"), Some("Bearer tok"));
    }

    #[test]
    fn test_options_carried() {
        let req = build(
            Method::GET,
            "https://example.com",
            Args::new()
                .proxy("http://proxy:8080")
                .timeout(Duration::from_secs(5))
                .verify(false)
                .stream(true),
        );
        assert_eq!(req.proxy.as_deref(), Some("http://proxy:8080"));
        assert_eq!(req.timeout, Some(Duration::from_secs(5)));
        assert!(!req.verify);
        assert_eq!(req.stream, Some(true));
    }

    #[test]
    fn test_invalid_url() {
        let err = RequestBuilder::new(Method::GET, "not a url").build().unwrap_err();
        assert!(matches!(err, Error::Url(_)));
    }
}
