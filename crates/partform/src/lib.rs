//! Form fields from multipart parts.
//!
//! partform exposes already-split `multipart/form-data` parts to
//! application code as a name/value mapping, the way HTML form submissions
//! are usually presented to handlers:
//!
//! - **Text fields**: parts without a content type or filename, decoded as UTF-8
//! - **File fields**: raw payload plus filename and the remaining headers
//! - **Lenient skipping**: parts that are not named `form-data` fields are ignored
//! - **Strict shape**: a malformed body fails as a whole, never partially
//!
//! # Quick Start
//!
//! ```
//! use partform::prelude::*;
//! use serde_json::json;
//!
//! let body = json!([
//!     {
//!         "headers": { "Content-Disposition": "form-data; name=\"title\"" },
//!         "data": [104, 101, 108, 108, 111]
//!     }
//! ]);
//! let fields = partform::from_client(&body).unwrap();
//! assert_eq!(fields.text("title"), Some("hello"));
//! ```
//!
//! # Crate Structure
//!
//! - [`partform_core`]: part, header, disposition and field types plus the reducer

#![forbid(unsafe_code)]

pub use partform_core as core;

pub use partform_core::{
    Disposition, DispositionError, DispositionParser, FieldReducer, FieldValue, FileField,
    FormError, FormFields, PartHeaders, RawPart, ReducerConfig, Rfc6266Parser, parse_disposition,
};

use serde_json::Value;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        FieldReducer, FieldValue, FileField, FormError, FormFields, RawPart, ReducerConfig,
    };
}

/// Reduce a dynamic multipart body into form fields.
///
/// `body` must be an array of `{ "headers": {..}, "data": [bytes] }`
/// objects. The whole body is checked before any field is produced.
///
/// # Errors
///
/// [`FormError::InvalidInput`] when the body is mis-shaped, naming the
/// type received; [`FormError::Disposition`] when a present
/// `Content-Disposition` header is malformed.
pub fn from_client(body: &Value) -> Result<FormFields, FormError> {
    from_client_with(&FieldReducer::new(), body)
}

/// Like [`from_client`], using the given reducer.
///
/// # Errors
///
/// See [`from_client`] and [`FieldReducer::reduce`].
pub fn from_client_with<P: DispositionParser>(
    reducer: &FieldReducer<P>,
    body: &Value,
) -> Result<FormFields, FormError> {
    let parts = partform_core::parts_from_value(body)?;
    reducer.reduce(parts)
}

/// Reduce typed parts into form fields.
///
/// # Errors
///
/// See [`FieldReducer::reduce`].
pub fn from_parts(parts: Vec<RawPart>) -> Result<FormFields, FormError> {
    FieldReducer::new().reduce(parts)
}
