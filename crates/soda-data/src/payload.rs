//! Upload payload normalization.
//!
//! Mutations (upsert/replace) always transmit JSON. Callers may hand over a
//! structured `serde_json::Value`, an already-serialized JSON string, or the
//! output of a [`Converter`](crate::Converter); everything is normalized to a
//! JSON string before any network activity, and malformed input fails there.

use soda_client::{Error, ErrorKind, Result};

use crate::converter::Converter;

/// An upload payload for upsert/replace operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// An already-serialized JSON string. Validated before transmission.
    Json(String),
    /// A structured value, serialized on normalization.
    Value(serde_json::Value),
}

impl Payload {
    /// Build a payload by running a [`Converter`].
    pub fn from_converter<C: Converter + ?Sized>(converter: &C) -> Result<Self> {
        Ok(Payload::Json(converter.to_json()?))
    }

    /// Normalize to a JSON string.
    ///
    /// A raw string that does not parse as JSON is a contract violation and
    /// fails with a validation error.
    pub fn into_json_text(self) -> Result<String> {
        match self {
            Payload::Value(value) => serde_json::to_string(&value).map_err(Into::into),
            Payload::Json(text) => {
                if serde_json::from_str::<serde_json::Value>(&text).is_err() {
                    return Err(Error::new(ErrorKind::InvalidPayload(
                        "the given data is not valid JSON".to_string(),
                    )));
                }

                Ok(text)
            }
        }
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Value(value)
    }
}

impl From<Vec<serde_json::Value>> for Payload {
    fn from(rows: Vec<serde_json::Value>) -> Self {
        Payload::Value(serde_json::Value::Array(rows))
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Json(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Json(text.to_string())
    }
}
