// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport capability
//!
//! The client never opens sockets itself. A [`Transport`] takes a prepared
//! [`Request`] and returns the status, the headers and a still-unread body.
//! [`ReqwestTransport`] is the production implementation.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use url::Url;

use super::request::{RedirectPolicy, Request};
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};

/// Sends prepared requests
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return once the response headers are in
    async fn send(&self, request: Request) -> Result<TransportResponse>;
}

/// Response headers plus an unread body
#[derive(Debug)]
pub struct TransportResponse {
    /// Response status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// URL that produced this response (after redirects)
    pub url: Url,
    /// Response body
    pub body: BodyStream,
}

/// Incrementally readable response body
///
/// Owns the underlying connection: drop it or call [`BodyStream::close`]
/// to release it.
pub struct BodyStream {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>,
}

impl BodyStream {
    /// Wrap a stream of chunks
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }

    /// Body made of a single in-memory chunk
    pub fn from_bytes(body: impl Into<Bytes>) -> Self {
        Self::new(futures::stream::once(futures::future::ready(Ok(body.into()))))
    }

    /// Body with no content
    pub fn empty() -> Self {
        Self::new(futures::stream::empty())
    }

    /// Read the next chunk; None once the body is exhausted
    pub async fn chunk(&mut self) -> Option<Result<Bytes>> {
        self.inner.next().await
    }

    /// Read the rest of the body into memory
    pub async fn read_to_end(mut self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        while let Some(chunk) = self.inner.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }

    /// Release the body without reading it
    pub fn close(self) {}
}

impl Stream for BodyStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl fmt::Debug for BodyStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BodyStream").finish_non_exhaustive()
    }
}

/// Transport built on reqwest
///
/// A client is assembled per request because redirect, proxy and TLS
/// settings are per-call arguments. reqwest's own cookie store stays off:
/// cookies are the session's business.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    user_agent: String,
    default_headers: HeaderMap,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT, HeaderMap::new())
    }
}

impl ReqwestTransport {
    /// Create a transport sending the given user agent and default headers
    pub fn new(user_agent: impl Into<String>, default_headers: HeaderMap) -> Self {
        Self {
            user_agent: user_agent.into(),
            default_headers,
        }
    }

    fn client_for(&self, request: &Request) -> Result<Client> {
        let redirect = match request.redirect {
            RedirectPolicy::None => Policy::none(),
            RedirectPolicy::Limited(max) => Policy::limited(max),
        };

        let mut builder = Client::builder()
            .user_agent(&self.user_agent)
            .default_headers(self.default_headers.clone())
            .redirect(redirect)
            .danger_accept_invalid_certs(!request.verify)
            .cookie_store(false);

        if let Some(ref proxy_url) = request.proxy {
            match reqwest::Proxy::all(proxy_url.as_str()) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => {
                    tracing::warn!(proxy = %proxy_url, error = %e, "Ignoring invalid proxy, connecting directly")
                }
            }
        }

        if let Some(ref cert) = request.cert {
            let pem = std::fs::read(cert)?;
            builder = builder.identity(reqwest::Identity::from_pem(&pem)?);
        }

        Ok(builder.build()?)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request) -> Result<TransportResponse> {
        let client = self.client_for(&request)?;

        let mut builder = client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());

        if let Some(cookie_header) = request.cookie_header() {
            builder = builder.header(super::headers::COOKIE, cookie_header);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        Ok(TransportResponse {
            status: response.status(),
            headers: response.headers().clone(),
            url: response.url().clone(),
            body: BodyStream::new(response.bytes_stream().map(|chunk| chunk.map_err(Error::from))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    #[tokio::test]
    async fn test_body_stream_chunks() {
        let chunks = vec![Ok(Bytes::from("data: one\n\n")), Ok(Bytes::from("data: two\n\n"))];
        let mut body = BodyStream::new(futures::stream::iter(chunks));

        assert_eq!(body.chunk().await.unwrap().unwrap(), "data: one\n\n");
        assert_eq!(body.read_to_end().await.unwrap(), "data: two\n\n");
    }

    #[tokio::test]
    async fn test_body_stream_error_surfaces() {
        let chunks = vec![Ok(Bytes::from("partial")), Err(Error::other("connection reset"))];
        let body = BodyStream::new(futures::stream::iter(chunks));
        assert!(body.read_to_end().await.is_err());
    }

    #[test]
    fn test_invalid_proxy_falls_back() {
        let transport = ReqwestTransport::default();
        let mut request = Request::new(Method::GET, "http://example.com").unwrap();
        request.proxy = Some("::not a proxy::".to_string());
        assert!(transport.client_for(&request).is_ok());
    }

    #[test]
    fn test_missing_cert_file_fails() {
        let transport = ReqwestTransport::default();
        let mut request = Request::new(Method::GET, "https://example.com").unwrap();
        request.cert = Some("/nonexistent/client.pem".into());
        assert!(matches!(transport.client_for(&request), Err(Error::Io(_))));
    }
}
