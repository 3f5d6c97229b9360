//! HTTP response handling and SODA error classification.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;

use crate::error::{Error, ErrorKind, Result, UNKNOWN_ERROR_CODE};

/// Response header carrying type information on legacy (v1) datasets.
pub const LEGACY_TYPES_HEADER: &str = "x-soda2-legacy-types";

/// Response header present on SODA 2.x backends.
pub const TRUTH_LAST_MODIFIED_HEADER: &str = "x-soda2-truth-last-modified";

/// A fully-read HTTP response.
///
/// The executor returns this by value rather than writing headers into a
/// caller-supplied map; header names are normalized to lowercase and values
/// are trimmed, so lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: HashMap<String, String>,
    body: String,
}

impl Response {
    /// Create a response from its parts, normalizing header names.
    pub fn new(status: u16, headers: HashMap<String, String>, body: String) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v.trim().to_string()))
            .collect();

        Self {
            status,
            headers,
            body,
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// All response headers, keyed by lowercase name.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// The raw response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns true if the legacy-API marker header is present and truthy.
    pub fn legacy_types(&self) -> bool {
        self.header(LEGACY_TYPES_HEADER)
            .is_some_and(|v| !v.is_empty() && v != "false" && v != "0")
    }

    /// The value of the truth-last-modified marker header, if present.
    pub fn truth_last_modified(&self) -> Option<&str> {
        self.header(TRUTH_LAST_MODIFIED_HEADER)
    }

    /// The Last-Modified header parsed as an RFC 2822 timestamp.
    pub fn last_modified(&self) -> Option<DateTime<FixedOffset>> {
        let value = self
            .header("last-modified")
            .or_else(|| self.truth_last_modified())?;

        DateTime::parse_from_rfc2822(value).ok()
    }

    /// Decode the body as JSON, classifying failures.
    ///
    /// The protocol, in order:
    /// 1. A body that is not valid JSON raises an HTTP error carrying the
    ///    numeric status and raw body (covers 5xx HTML pages, proxy errors).
    /// 2. A JSON object with a truthy `error` field raises a SODA domain
    ///    error; its `code` defaults to [`UNKNOWN_ERROR_CODE`] when absent.
    /// 3. Anything else is deserialized into `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T> {
        let value = self.into_json_value()?;
        serde_json::from_value(value).map_err(Into::into)
    }

    /// Decode the body as a raw `serde_json::Value` with the same
    /// classification as [`Response::into_json`].
    pub fn into_json_value(self) -> Result<serde_json::Value> {
        let value: serde_json::Value = match serde_json::from_str(&self.body) {
            Ok(value) => value,
            Err(_) => {
                return Err(Error::new(ErrorKind::Http {
                    status: self.status,
                    body: self.body,
                }));
            }
        };

        if let Some(err) = parse_soda_error(&value) {
            return Err(err);
        }

        Ok(value)
    }
}

/// Check a decoded JSON body for an in-band SODA error envelope.
fn parse_soda_error(value: &serde_json::Value) -> Option<Error> {
    let error_flag = value.get("error")?;

    // Only a truthy flag counts; `"error": false` is a normal body.
    let is_error = match error_flag {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.is_empty(),
        _ => true,
    };

    if !is_error {
        return None;
    }

    let code = value
        .get("code")
        .and_then(|c| c.as_str())
        .unwrap_or(UNKNOWN_ERROR_CODE)
        .to_string();
    let message = value
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or_default()
        .to_string();

    Some(Error::new(ErrorKind::Soda {
        code,
        message,
        data: value.clone(),
    }))
}
