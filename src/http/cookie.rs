// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookies and the session cookie jar
//!
//! The jar keeps cookies in arrival order and upserts on identity. Identity
//! is selected by [`CookieScope`]: `(name, domain, path)` for proper per-origin
//! scoping, or the bare name for the flat legacy behaviour where one cookie
//! per name is kept and every cookie goes out with every request.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use url::Url;

/// A single HTTP cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value
    pub value: String,
    /// Domain the cookie belongs to (empty = not yet attributed)
    pub domain: String,
    /// Sent only to `domain` itself, not its subdomains
    #[serde(default)]
    pub host_only: bool,
    /// Path the cookie is valid for
    pub path: String,
    /// Expiration time (None = session cookie)
    pub expires: Option<DateTime<Utc>>,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// HttpOnly flag
    pub http_only: bool,
    /// SameSite attribute
    pub same_site: SameSite,
}

/// SameSite cookie attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SameSite {
    #[default]
    None,
    Lax,
    Strict,
}

impl Cookie {
    /// Create a new cookie
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            host_only: false,
            path: "/".to_string(),
            expires: None,
            secure: false,
            http_only: false,
            same_site: SameSite::default(),
        }
    }

    /// Set the domain
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set secure flag
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set http_only flag
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Set expiration time
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Check if the cookie is expired
    pub fn is_expired(&self) -> bool {
        self.expires.map_or(false, |exp| exp < Utc::now())
    }

    /// Check if the cookie should be sent to the given URL
    ///
    /// A cookie that was never attributed to a domain matches nothing.
    pub fn matches(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or("");
        if !self.domain_matches(host) {
            return false;
        }

        if !self.path_matches(url.path()) {
            return false;
        }

        if self.secure && url.scheme() != "https" {
            return false;
        }

        !self.is_expired()
    }

    fn domain_matches(&self, host: &str) -> bool {
        if self.domain.is_empty() {
            return false;
        }

        let domain = self.domain.trim_start_matches('.');
        if self.host_only {
            return host.eq_ignore_ascii_case(domain);
        }

        host.eq_ignore_ascii_case(domain)
            || host
                .to_ascii_lowercase()
                .ends_with(&format!(".{}", domain.to_ascii_lowercase()))
    }

    // RFC 6265 5.1.4: "/admin" covers "/admin" and "/admin/x", not "/administrator".
    fn path_matches(&self, request_path: &str) -> bool {
        let cookie_path = self.path.as_str();
        if request_path == cookie_path {
            return true;
        }

        request_path.starts_with(cookie_path)
            && (cookie_path.ends_with('/') || request_path[cookie_path.len()..].starts_with('/'))
    }

    /// Parse a Set-Cookie header value
    ///
    /// The domain stays empty unless the header carries a `Domain` attribute.
    pub fn parse(header: &str) -> Option<Self> {
        let mut parts = header.split(';');
        let first = parts.next()?.trim();

        let (name, value) = first.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let mut cookie = Cookie::new(name, value.trim().trim_matches('"'));

        for part in parts {
            let part = part.trim();
            if let Some((attr, val)) = part.split_once('=') {
                let attr = attr.trim().to_lowercase();
                let val = val.trim();
                match attr.as_str() {
                    "domain" => cookie.domain = val.trim_start_matches('.').to_string(),
                    "path" => cookie.path = val.to_string(),
                    "expires" => {
                        if let Ok(dt) = DateTime::parse_from_rfc2822(val) {
                            cookie.expires = Some(dt.with_timezone(&Utc));
                        }
                    }
                    "max-age" => {
                        if let Some(expires) = val
                            .parse::<i64>()
                            .ok()
                            .and_then(chrono::Duration::try_seconds)
                            .and_then(|age| Utc::now().checked_add_signed(age))
                        {
                            cookie.expires = Some(expires);
                        }
                    }
                    "samesite" => {
                        cookie.same_site = match val.to_lowercase().as_str() {
                            "strict" => SameSite::Strict,
                            "lax" => SameSite::Lax,
                            _ => SameSite::None,
                        };
                    }
                    _ => {}
                }
            } else {
                match part.to_lowercase().as_str() {
                    "secure" => cookie.secure = true,
                    "httponly" => cookie.http_only = true,
                    _ => {}
                }
            }
        }

        Some(cookie)
    }

    /// Parse a Set-Cookie header, attributing it to the responding host
    pub fn parse_for(header: &str, url: &Url) -> Option<Self> {
        let mut cookie = Self::parse(header)?;
        cookie.attribute_to(url);
        Some(cookie)
    }

    /// Tie a cookie without a domain to the host of `url`
    ///
    /// The cookie then goes back to that exact host only.
    pub fn attribute_to(&mut self, url: &Url) {
        if self.domain.is_empty() {
            self.domain = url.host_str().unwrap_or("").to_string();
            self.host_only = true;
        }
    }

    /// Convert to cookie header format
    pub fn to_header_value(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

/// Render cookies as a single `Cookie` request header value
pub fn cookie_header(cookies: &[Cookie]) -> Option<String> {
    if cookies.is_empty() {
        return None;
    }

    Some(
        cookies
            .iter()
            .map(|c| c.to_header_value())
            .collect::<Vec<_>>()
            .join("; "),
    )
}

/// What makes two cookies "the same cookie" inside a jar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CookieScope {
    /// Keyed by (name, domain, path); only matching cookies are sent
    #[default]
    Origin,
    /// Keyed by name alone; every cookie is sent everywhere
    Name,
}

impl CookieScope {
    fn same_cookie(self, a: &Cookie, b: &Cookie) -> bool {
        match self {
            CookieScope::Name => a.name == b.name,
            CookieScope::Origin => {
                a.name == b.name
                    && a.path == b.path
                    && a.domain
                        .trim_start_matches('.')
                        .eq_ignore_ascii_case(b.domain.trim_start_matches('.'))
            }
        }
    }
}

/// Thread-safe cookie storage
///
/// Clones share the same storage. Each operation takes the lock on its own;
/// a sequence of operations is not atomic.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: Arc<RwLock<Vec<Cookie>>>,
    scope: CookieScope,
}

impl CookieJar {
    /// Create a new empty cookie jar with per-origin scoping
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty cookie jar with the given identity rule
    pub fn with_scope(scope: CookieScope) -> Self {
        Self {
            cookies: Arc::default(),
            scope,
        }
    }

    /// Create a flat jar keyed by cookie name
    pub fn flat() -> Self {
        Self::with_scope(CookieScope::Name)
    }

    /// Identity rule used by this jar
    pub fn scope(&self) -> CookieScope {
        self.scope
    }

    /// Insert a cookie, replacing the stored one with the same identity
    ///
    /// The cookie moves to the end, so the jar stays ordered by last update.
    pub fn add(&self, cookie: Cookie) {
        let mut cookies = self.cookies.write();
        if let Some(index) = cookies.iter().position(|c| self.scope.same_cookie(c, &cookie)) {
            cookies.remove(index);
        }
        cookies.push(cookie);
    }

    /// Upsert every cookie in order; later cookies win
    pub fn update<'a>(&self, cookies: impl IntoIterator<Item = &'a Cookie>) {
        for cookie in cookies {
            tracing::trace!(name = %cookie.name, domain = %cookie.domain, "Storing cookie");
            self.add(cookie.clone());
        }
    }

    /// Store per-call cookies bound for `url`
    ///
    /// Cookies without a domain are attributed to the host of `url`. A cookie
    /// is skipped when the jar already sends a cookie of that name to `url`.
    pub fn absorb_for<'a>(&self, url: &Url, cookies: impl IntoIterator<Item = &'a Cookie>) {
        let mut stored = self.cookies.write();
        for cookie in cookies {
            let mut cookie = cookie.clone();
            cookie.attribute_to(url);

            let shadowed = stored.iter().any(|c| {
                self.scope.same_cookie(c, &cookie) || (c.name == cookie.name && self.sends_to(c, url))
            });
            if shadowed {
                tracing::trace!(name = %cookie.name, "Stored cookie takes priority");
                continue;
            }
            stored.push(cookie);
        }
    }

    /// Check whether a cookie with the same identity is stored
    pub fn contains(&self, cookie: &Cookie) -> bool {
        self.cookies
            .read()
            .iter()
            .any(|c| self.scope.same_cookie(c, cookie))
    }

    /// Copy of every stored cookie, in insertion order
    pub fn cookies(&self) -> Vec<Cookie> {
        self.cookies.read().clone()
    }

    /// Cookies to send with a request to `url`
    pub fn cookies_for(&self, url: &Url) -> Vec<Cookie> {
        self.cookies
            .read()
            .iter()
            .filter(|c| self.sends_to(c, url))
            .cloned()
            .collect()
    }

    fn sends_to(&self, cookie: &Cookie, url: &Url) -> bool {
        match self.scope {
            CookieScope::Name => true,
            CookieScope::Origin => cookie.matches(url),
        }
    }

    /// Cookie header value for a URL
    pub fn get_cookie_header(&self, url: &Url) -> Option<String> {
        cookie_header(&self.cookies_for(url))
    }

    /// Most recently stored cookie with the given name
    pub fn get(&self, name: &str) -> Option<Cookie> {
        self.cookies.read().iter().rev().find(|c| c.name == name).cloned()
    }

    /// Clear all cookies
    pub fn clear(&self) {
        self.cookies.write().clear();
    }

    /// Get total cookie count
    pub fn len(&self) -> usize {
        self.cookies.read().len()
    }

    /// Check if jar is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export all cookies as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&*self.cookies.read())
    }

    /// Import cookies from JSON
    pub fn from_json(json: &str, scope: CookieScope) -> serde_json::Result<Self> {
        let cookies: Vec<Cookie> = serde_json::from_str(json)?;
        let jar = CookieJar::with_scope(scope);
        for cookie in cookies {
            jar.add(cookie);
        }
        Ok(jar)
    }
}
