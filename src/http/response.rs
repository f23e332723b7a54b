// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Responses and the reader that materializes them
//!
//! A response is either buffered (`content`/`text` filled in) or streaming
//! (`body` holds the live connection). Server-sent event feeds stream by
//! default; everything else is read to completion.

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

use super::cookie::Cookie;
use super::encode::media_type;
use super::headers::{CONTENT_TYPE, SET_COOKIE};
use super::transport::{BodyStream, TransportResponse};
use crate::error::{Error, Result};

/// Content type that selects streaming when no override is given
pub const EVENT_STREAM: &str = "text/event-stream";

/// HTTP response representation
///
/// A failed call still yields a `Response`: `status_code` is 0 (or the status
/// seen before the failure) and `text` holds the error description.
#[derive(Debug, Default)]
pub struct Response {
    /// Response status code (0 = no response received)
    pub status_code: u16,
    /// Body decoded as UTF-8 (lossy)
    pub text: String,
    /// Raw body
    pub content: Bytes,
    /// Response headers
    pub headers: HeaderMap,
    /// Cookies set by this response
    pub cookies: Vec<Cookie>,
    /// Final URL (after redirects)
    pub url: Option<Url>,
    /// Live body for streaming responses
    pub body: Option<BodyStream>,
}

impl Response {
    /// Response standing in for a failed call
    pub fn from_error(error: &Error, status_code: u16) -> Self {
        Self {
            status_code,
            text: error.to_string(),
            ..Self::default()
        }
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Check if status is redirect (3xx)
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }

    /// Check if the body is exposed as a stream
    pub fn is_streaming(&self) -> bool {
        self.body.is_some()
    }

    /// Take ownership of the streaming body
    pub fn take_body(&mut self) -> Option<BodyStream> {
        self.body.take()
    }

    /// Parse the text as a JSON object
    pub fn json(&self) -> Result<Map<String, Value>> {
        match serde_json::from_str::<Value>(&self.text)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::NotAnObject {
                found: json_kind(&other),
            }),
        }
    }

    /// Deserialize the text into any type
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.text).map_err(Error::from)
    }

    /// Get a header value ("" when absent)
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    /// Get all values for a header
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// Get content type
    pub fn content_type(&self) -> &str {
        self.header(CONTENT_TYPE)
    }

    /// Value of a cookie set by this response ("" when absent)
    pub fn get_cookie(&self, name: &str) -> &str {
        self.cookies
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
            .unwrap_or("")
    }
}

/// Turns a transport response into a [`Response`]
///
/// The deadline bounds buffered reads only. A streaming body is handed over
/// without one and lives as long as the caller keeps reading.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseReader {
    stream: Option<bool>,
    deadline: Option<Duration>,
}

impl ResponseReader {
    /// Reader honoring an explicit streaming choice, sniffing when None
    pub fn new(stream: Option<bool>) -> Self {
        Self {
            stream,
            deadline: None,
        }
    }

    /// Give up on a buffered body after `deadline`
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Decide whether a response with these headers is streamed
    pub fn should_stream(&self, headers: &HeaderMap) -> bool {
        self.stream.unwrap_or_else(|| {
            headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map_or(false, |ct| media_type(ct).eq_ignore_ascii_case(EVENT_STREAM))
        })
    }

    /// Classify and materialize the response
    ///
    /// A body that fails half-way leaves the status in place and puts the
    /// error in `text`.
    pub async fn read(&self, response: TransportResponse) -> Response {
        let TransportResponse {
            status,
            headers,
            url,
            body,
        } = response;
        let streaming = self.should_stream(&headers);

        // Only buffered responses get their cookies attributed to the host.
        let cookies: Vec<Cookie> = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|h| {
                if streaming {
                    Cookie::parse(h)
                } else {
                    Cookie::parse_for(h, &url)
                }
            })
            .collect();

        if streaming {
            tracing::debug!(status = %status, url = %url, "Streaming response body");
            return Response {
                status_code: status.as_u16(),
                headers,
                cookies,
                url: Some(url),
                body: Some(body),
                ..Response::default()
            };
        }

        let content = match self.deadline {
            Some(limit) => tokio::time::timeout(limit, body.read_to_end())
                .await
                .unwrap_or_else(|_| Err(Error::Timeout(limit))),
            None => body.read_to_end().await,
        };

        match content {
            Ok(content) => Response {
                status_code: status.as_u16(),
                text: String::from_utf8_lossy(&content).into_owned(),
                content,
                headers,
                cookies,
                url: Some(url),
                body: None,
            },
            Err(e) => {
                tracing::debug!(status = %status, url = %url, error = %e, "Reading response body failed");
                Response {
                    status_code: status.as_u16(),
                    text: e.to_string(),
                    headers,
                    cookies,
                    url: Some(url),
                    ..Response::default()
                }
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use reqwest::StatusCode;

    fn transport_response(headers: &[(&'static str, &'static str)], body: BodyStream) -> TransportResponse {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.append(*name, HeaderValue::from_static(*value));
        }
        TransportResponse {
            status: StatusCode::OK,
            headers: map,
            url: Url::parse("https://shop.example.com/cart").unwrap(),
            body,
        }
    }

    fn response_with_text(text: &str) -> Response {
        Response {
            status_code: 200,
            text: text.to_string(),
            ..Response::default()
        }
    }

    #[test]
    fn test_response_status() {
        let resp = response_with_text("");
        assert!(resp.is_success());
        assert!(!resp.is_redirect());
        assert!(!resp.is_streaming());
    }

    #[test]
    fn test_json_object() {
        let map = response_with_text(r#"{"ok":true,"n":3}"#).json().unwrap();
        assert_eq!(map["ok"], Value::Bool(true));
        assert_eq!(map["n"], 3);
    }

    #[test]
    fn test_json_rejects_non_json() {
        let err = response_with_text("not json").json().unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_json_rejects_non_object() {
        let err = response_with_text("[1,2]").json().unwrap_err();
        assert!(matches!(err, Error::NotAnObject { found: "an array" }));
    }

    #[test]
    fn test_missing_header_and_cookie_are_empty() {
        let resp = response_with_text("");
        assert_eq!(resp.header("x-missing"), "");
        assert_eq!(resp.get_cookie("missing"), "");
    }

    #[test]
    fn test_from_error() {
        let resp = Response::from_error(&Error::other("connection refused"), 0);
        assert_eq!(resp.status_code, 0);
        assert_eq!(resp.text, "connection refused");
        assert!(resp.content.is_empty());
    }

    #[test]
    fn test_buffered_read_backfills_cookie_domain() {
        let raw = transport_response(
            &[
                ("content-type", "text/html"),
                ("set-cookie", "cart=42; Path=/"),
                ("set-cookie", "promo=x; Domain=example.com"),
            ],
            BodyStream::from_bytes("<h1>cart</h1>"),
        );
        let resp = tokio_test::block_on(ResponseReader::default().read(raw));

        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.text, "<h1>cart</h1>");
        assert_eq!(&resp.content[..], b"<h1>cart</h1>");
        assert!(resp.body.is_none());
        assert_eq!(resp.cookies.len(), 2);
        assert_eq!(resp.cookies[0].domain, "shop.example.com");
        assert_eq!(resp.cookies[1].domain, "example.com");
        assert_eq!(resp.get_cookie("cart"), "42");
        assert_eq!(resp.header("Content-Type"), "text/html");
    }

    #[test]
    fn test_event_stream_is_not_buffered() {
        let raw = transport_response(
            &[("content-type", "text/event-stream")],
            BodyStream::from_bytes("data: hello\n\n"),
        );
        let mut resp = tokio_test::block_on(ResponseReader::default().read(raw));

        assert!(resp.is_streaming());
        assert!(resp.text.is_empty());
        assert!(resp.content.is_empty());

        let body = resp.take_body().unwrap();
        let data = tokio_test::block_on(body.read_to_end()).unwrap();
        assert_eq!(data, "data: hello\n\n");
    }

    #[test]
    fn test_stream_flag_overrides_content_type() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/event-stream; charset=utf-8"));
        assert!(ResponseReader::new(None).should_stream(&headers));
        assert!(!ResponseReader::new(Some(false)).should_stream(&headers));

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(!ResponseReader::new(None).should_stream(&headers));
        assert!(ResponseReader::new(Some(true)).should_stream(&headers));
        assert!(!ResponseReader::new(None).should_stream(&HeaderMap::new()));
    }

    #[tokio::test]
    async fn test_buffered_read_times_out_with_status() {
        let stalled = BodyStream::new(futures::stream::pending::<Result<Bytes>>());
        let raw = transport_response(&[("content-type", "text/plain")], stalled);
        let resp = ResponseReader::default()
            .with_deadline(Duration::from_millis(20))
            .read(raw)
            .await;

        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.text, "Request timed out after 20ms");
    }

    #[tokio::test]
    async fn test_streaming_body_ignores_deadline() {
        let raw = transport_response(
            &[("content-type", "text/event-stream")],
            BodyStream::from_bytes("data: late\n\n"),
        );
        let mut resp = ResponseReader::default()
            .with_deadline(Duration::from_millis(10))
            .read(raw)
            .await;

        tokio::time::sleep(Duration::from_millis(30)).await;
        let data = resp.take_body().unwrap().read_to_end().await.unwrap();
        assert_eq!(data, "data: late\n\n");
    }

    #[test]
    fn test_body_failure_keeps_status() {
        let chunks = vec![Ok(Bytes::from("par")), Err(Error::other("connection reset"))];
        let mut raw = transport_response(&[], BodyStream::new(futures::stream::iter(chunks)));
        raw.status = StatusCode::BAD_GATEWAY;
        let resp = tokio_test::block_on(ResponseReader::default().read(raw));

        assert_eq!(resp.status_code, 502);
        assert_eq!(resp.text, "connection reset");
        assert!(resp.content.is_empty());
    }
}
