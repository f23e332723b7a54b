// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for the requests client
//!
//! Boundary calls (`get`, `post`, `Session::request`, ...) never return these:
//! transport failures are folded into the `Response` text. They surface from
//! the decoding helpers, the strict encoder and the lower-level building blocks
//! (`RequestBuilder`, `Transport`).

use std::time::Duration;

use thiserror::Error;

/// Result type alias for requests operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the requests client
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed in the transport
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Deadline passed before the response (or a buffered body) arrived
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// JSON parsing or serialization failed
    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response text parsed as JSON but was not an object
    #[error("Parse error: expected a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    /// Query string pair without `=`
    #[error("Malformed query pair '{pair}': missing '='")]
    Format { pair: String },

    /// Argument shape the encoder cannot represent
    #[error("Cannot encode {field}: unsupported {shape} value")]
    Encoding {
        field: &'static str,
        shape: &'static str,
    },

    /// Header name or value rejected
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// I/O error (client certificate loading)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an encoding error
    pub fn encoding(field: &'static str, shape: &'static str) -> Self {
        Error::Encoding { field, shape }
    }

    /// Create a header error
    pub fn invalid_header(name: impl Into<String>, reason: impl ToString) -> Self {
        Error::InvalidHeader {
            name: name.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout(_) => true,
            Error::Http(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Status code received before the failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if the connection could not be established
    pub fn is_connect(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_connect())
    }

    /// Check if this is a network error
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Io(_) | Error::Timeout(_))
    }

    /// Check if this came from decoding malformed input
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            Error::Json(_) | Error::NotAnObject { .. } | Error::Format { .. }
        )
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}
