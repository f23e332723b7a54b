// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client layer
//!
//! Argument encoding, request preparation, response materialization and the
//! session cookie jar. Network I/O goes through the [`Transport`] trait.

mod args;
mod client;
mod cookie;
mod encode;
mod request;
mod response;
mod session;
mod transport;

#[cfg(test)]
mod mock;

pub use args::{Args, Auth};
pub use client::{ClientConfig, HttpClient, DEFAULT_TIMEOUT};
pub use cookie::{cookie_header, Cookie, CookieJar, CookieScope, SameSite};
pub use encode::{
    encode_body, encode_query, map_to_query, query_to_map, try_encode_body, try_encode_query,
    JSON_MEDIA_TYPE,
};
pub use request::{RedirectPolicy, Request, RequestBuilder, DEFAULT_MAX_REDIRECTS};
pub use response::{Response, ResponseReader, EVENT_STREAM};
pub use session::Session;
pub use transport::{BodyStream, ReqwestTransport, Transport, TransportResponse};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("requests/", env!("CARGO_PKG_VERSION"));

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const AUTHORIZATION: &str = "authorization";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const COOKIE: &str = "cookie";
    pub const LOCATION: &str = "location";
    pub const SET_COOKIE: &str = "set-cookie";
    pub const USER_AGENT: &str = "user-agent";
}
