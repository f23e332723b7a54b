// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Query string and body encoding
//!
//! Turns loosely typed request arguments into wire-ready text. The lenient
//! `encode_*` functions never fail: shapes they cannot represent degrade to an
//! empty string. The `try_encode_*` variants report those shapes instead.
//!
//! Pairs are emitted in the iteration order of the map. `serde_json::Map`
//! iterates in key order, but callers should treat the order as unspecified.

use std::collections::HashMap;

use bytes::Bytes;
use serde_json::{Map, Value};

use super::headers::CONTENT_TYPE;
use crate::error::{Error, Result};

/// Media type that switches body encoding to JSON
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Encode query parameters, degrading unsupported shapes to ""
pub fn encode_query(params: &Value) -> String {
    try_encode_query(params).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Dropping query parameters");
        String::new()
    })
}

/// Encode query parameters
///
/// Strings pass through untouched: the caller owns their escaping.
pub fn try_encode_query(params: &Value) -> Result<String> {
    match params {
        Value::String(s) => Ok(s.clone()),
        Value::Object(map) => Ok(map_to_query(map)),
        Value::Null => Ok(String::new()),
        other => Err(Error::encoding("params", shape_of(other))),
    }
}

/// Encode a request body, degrading unsupported shapes to an empty body
pub fn encode_body(data: &Value, headers: &HashMap<String, String>) -> Bytes {
    try_encode_body(data, headers).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Dropping request body");
        Bytes::new()
    })
}

/// Encode a request body
///
/// A JSON content type wins over every other rule: even a string or a map is
/// serialized as JSON then.
pub fn try_encode_body(data: &Value, headers: &HashMap<String, String>) -> Result<Bytes> {
    if declares_json(headers) {
        return Ok(Bytes::from(serde_json::to_vec(data)?));
    }

    match data {
        Value::String(s) => Ok(Bytes::from(s.clone())),
        Value::Object(map) => Ok(Bytes::from(map_to_query(map))),
        Value::Null => Ok(Bytes::new()),
        other => Err(Error::encoding("data", shape_of(other))),
    }
}

/// Join a map as `key=value&key=value`
///
/// Nothing is percent-encoded.
pub fn map_to_query(map: &Map<String, Value>) -> String {
    map.iter()
        .map(|(k, v)| format!("{}={}", k, display_value(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Split `key=value&key=value` back into a map
///
/// The value is everything after the first `=`. Empty segments are skipped;
/// a segment without `=` is an error.
pub fn query_to_map(query: &str) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').ok_or_else(|| Error::Format {
            pair: pair.to_string(),
        })?;
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}

/// Default string form of a value: strings unquoted, everything else as JSON
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Media type of a `Content-Type` value, without parameters
pub(crate) fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or("").trim()
}

/// Check whether a header set declares a JSON body
pub(crate) fn declares_json(headers: &HashMap<String, String>) -> bool {
    headers.iter().any(|(name, value)| {
        name.eq_ignore_ascii_case(CONTENT_TYPE)
            && media_type(value).eq_ignore_ascii_case(JSON_MEDIA_TYPE)
    })
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
