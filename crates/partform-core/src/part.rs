//! Multipart part input.
//!
//! Parts arrive already segmented by a boundary splitter. A typed caller
//! builds [`RawPart`] values directly; a dynamic caller hands over a JSON
//! body which [`parts_from_value`] checks in full before any part is
//! converted, so a single malformed element rejects the whole body.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::FormError;
use crate::headers::PartHeaders;

/// One segment of a multipart body: its headers and payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawPart {
    /// Headers in arrival order, names case-preserved.
    pub headers: Vec<(String, String)>,
    /// The part's payload.
    pub data: Vec<u8>,
}

impl RawPart {
    /// Create an empty part.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the payload.
    #[must_use]
    pub fn data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = data.into();
        self
    }

    /// Build a fresh lower-cased header map; later case variants win.
    #[must_use]
    pub fn normalized_headers(&self) -> PartHeaders {
        self.headers
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect()
    }

    /// Payload size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Name of a JSON value's type, as reported in input errors.
#[must_use]
pub fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "missing",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// Convert a dynamic body into parts.
///
/// The body must be an array of objects, each with a `headers` object of
/// string values and a `data` array of bytes.
///
/// # Errors
///
/// Returns [`FormError::InvalidInput`] naming the type actually received.
pub fn parts_from_value(body: &Value) -> Result<Vec<RawPart>, FormError> {
    let Value::Array(items) = body else {
        return Err(FormError::invalid_input(format!(
            "expecting a multipart array, not {}",
            type_name(Some(body))
        )));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| part_from_value(index, item))
        .collect()
}

fn part_from_value(index: usize, item: &Value) -> Result<RawPart, FormError> {
    let Value::Object(object) = item else {
        return Err(FormError::invalid_input(format!(
            "part {index}: expecting an object, not {}",
            type_name(Some(item))
        )));
    };

    let headers = headers_from_object(index, object)?;
    let data = data_from_object(index, object)?;
    Ok(RawPart { headers, data })
}

fn headers_from_object(
    index: usize,
    object: &Map<String, Value>,
) -> Result<Vec<(String, String)>, FormError> {
    let headers = match object.get("headers") {
        Some(Value::Object(headers)) => headers,
        other => {
            return Err(FormError::invalid_input(format!(
                "part {index}: expecting `headers` to be an object, not {}",
                type_name(other)
            )));
        }
    };

    headers
        .iter()
        .map(|(name, value)| match value {
            Value::String(value) => Ok((name.clone(), value.clone())),
            other => Err(FormError::invalid_input(format!(
                "part {index}: expecting header `{name}` to be a string, not {}",
                type_name(Some(other))
            ))),
        })
        .collect()
}

fn data_from_object(index: usize, object: &Map<String, Value>) -> Result<Vec<u8>, FormError> {
    let data = match object.get("data") {
        Some(Value::Array(data)) => data,
        other => {
            return Err(FormError::invalid_input(format!(
                "part {index}: expecting `data` to be a byte buffer, not {}",
                type_name(other)
            )));
        }
    };

    data.iter()
        .map(|byte| {
            byte.as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| {
                    FormError::invalid_input(format!(
                        "part {index}: expecting `data` to be a byte buffer, found {} element",
                        type_name(Some(byte))
                    ))
                })
        })
        .collect()
}
