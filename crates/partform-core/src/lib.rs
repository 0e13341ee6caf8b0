//! Core types for partform.
//!
//! This crate turns already-segmented `multipart/form-data` parts into the
//! name/value mapping a request handler expects:
//! - [`RawPart`] input and dynamic body validation ([`parts_from_value`])
//! - [`PartHeaders`], a lower-cased header map
//! - [`Disposition`] and the pluggable [`DispositionParser`]
//! - [`FieldReducer`] producing [`FormFields`] of [`FieldValue`]s
//! - [`FormError`] and [`DispositionError`]
//!
//! Splitting a raw body on its boundary is left to the caller.

#![forbid(unsafe_code)]

pub mod disposition;
pub mod error;
mod field;
mod headers;
pub mod part;
pub mod reducer;

pub use disposition::{
    Disposition, DispositionParser, FORM_DATA, Rfc6266Parser, parse_disposition,
};
pub use error::{DispositionError, FormError};
pub use field::{FieldValue, FileField, FormFields};
pub use headers::PartHeaders;
pub use part::{RawPart, parts_from_value};
pub use reducer::{FieldReducer, ReducerConfig, reduce};
