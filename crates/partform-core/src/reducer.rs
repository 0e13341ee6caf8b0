//! Reduction of multipart parts into form fields.
//!
//! Each part is honored only if it carries a `content-disposition` header
//! of type `form-data` with a non-empty `name`. Anything else is skipped
//! without error; only a malformed disposition value or a configured limit
//! fails the call.
//!
//! A part becomes a [`FieldValue::File`] when it declares a `content-type`
//! header or a `filename` parameter, and a [`FieldValue::Text`] otherwise.
//! Repeated names keep the last value.
//!
//! # Example
//!
//! ```
//! use partform_core::{FieldReducer, RawPart};
//!
//! let parts = vec![
//!     RawPart::new()
//!         .header("Content-Disposition", r#"form-data; name="title""#)
//!         .data(b"hello".to_vec()),
//! ];
//! let fields = FieldReducer::new().reduce(parts).unwrap();
//! assert_eq!(fields.text("title"), Some("hello"));
//! ```

use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::disposition::{DispositionParser, Rfc6266Parser};
use crate::error::FormError;
use crate::field::{FieldValue, FileField, FormFields};
use crate::part::RawPart;

const CONTENT_DISPOSITION: &str = "content-disposition";
const CONTENT_TYPE: &str = "content-type";

/// Limits applied while reducing parts.
///
/// Both limits are unset by default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReducerConfig {
    /// Maximum number of honored parts.
    max_fields: Option<usize>,
    /// Maximum summed payload size of all parts, in bytes.
    max_total_size: Option<usize>,
}

impl ReducerConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of fields.
    #[must_use]
    pub fn max_fields(mut self, count: usize) -> Self {
        self.max_fields = Some(count);
        self
    }

    /// Set the maximum total payload size.
    #[must_use]
    pub fn max_total_size(mut self, size: usize) -> Self {
        self.max_total_size = Some(size);
        self
    }

    /// Get the maximum number of fields.
    #[must_use]
    pub fn get_max_fields(&self) -> Option<usize> {
        self.max_fields
    }

    /// Get the maximum total payload size.
    #[must_use]
    pub fn get_max_total_size(&self) -> Option<usize> {
        self.max_total_size
    }
}

/// Why a part contributed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    NoDisposition,
    NotFormData,
    NoName,
}

impl Skip {
    fn reason(self) -> &'static str {
        match self {
            Self::NoDisposition => "no content-disposition header",
            Self::NotFormData => "disposition type is not form-data",
            Self::NoName => "missing name parameter",
        }
    }
}

/// Reduces parts into [`FormFields`].
#[derive(Debug, Clone, Default)]
pub struct FieldReducer<P = Rfc6266Parser> {
    config: ReducerConfig,
    parser: P,
}

impl FieldReducer {
    /// Create a reducer with the default parser and no limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reducer with the default parser and the given limits.
    #[must_use]
    pub fn with_config(config: ReducerConfig) -> Self {
        Self {
            config,
            parser: Rfc6266Parser,
        }
    }
}

impl<P: DispositionParser> FieldReducer<P> {
    /// Use a different disposition parser.
    #[must_use]
    pub fn with_parser<Q: DispositionParser>(self, parser: Q) -> FieldReducer<Q> {
        FieldReducer {
            config: self.config,
            parser,
        }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &ReducerConfig {
        &self.config
    }

    /// Reduce parts into form fields, in input order.
    ///
    /// # Errors
    ///
    /// Fails if a present `content-disposition` header cannot be parsed or
    /// a configured limit is exceeded. No partial result is returned.
    pub fn reduce<I>(&self, parts: I) -> Result<FormFields, FormError>
    where
        I: IntoIterator<Item = RawPart>,
    {
        let parts: Vec<RawPart> = parts.into_iter().collect();
        self.check_total_size(&parts)?;

        let total = parts.len();
        let mut fields = FormFields::new();
        let mut honored = 0usize;

        for (index, part) in parts.into_iter().enumerate() {
            let (name, value) = match self.reduce_part(part)? {
                Ok(field) => field,
                Err(skip) => {
                    debug!(part = index, reason = skip.reason(), "skipping multipart part");
                    continue;
                }
            };

            honored += 1;
            if let Some(max) = self.config.max_fields {
                if honored > max {
                    warn!(count = honored, max, "multipart body has too many fields");
                    return Err(FormError::TooManyFields {
                        count: honored,
                        max,
                    });
                }
            }

            trace!(
                field = %name,
                file = value.is_file(),
                size = value.as_bytes().len(),
                "reduced multipart field"
            );
            if fields.insert(name, value).is_some() {
                debug!(part = index, "field name repeated, keeping the later value");
            }
        }

        debug!(parts = total, fields = fields.len(), "reduced multipart body");
        Ok(fields)
    }

    fn check_total_size(&self, parts: &[RawPart]) -> Result<(), FormError> {
        let Some(max) = self.config.max_total_size else {
            return Ok(());
        };
        let size = parts
            .iter()
            .fold(0usize, |sum, part| sum.saturating_add(part.size()));
        if size > max {
            warn!(size, max, "multipart body is too large");
            return Err(FormError::TotalTooLarge { size, max });
        }
        Ok(())
    }

    /// The outer `Result` is a hard failure, the inner one a skip.
    fn reduce_part(&self, part: RawPart) -> Result<Result<(String, FieldValue), Skip>, FormError> {
        let mut headers = part.normalized_headers();

        let Some(header) = headers.get(CONTENT_DISPOSITION).filter(|v| !v.is_empty()) else {
            return Ok(Err(Skip::NoDisposition));
        };
        let disposition = self.parser.parse(header)?;

        if !disposition.is_form_data() {
            return Ok(Err(Skip::NotFormData));
        }
        let Some(name) = disposition.name().filter(|n| !n.is_empty()) else {
            return Ok(Err(Skip::NoName));
        };

        let filename = disposition
            .filename()
            .filter(|f| !f.is_empty())
            .map(str::to_string);
        let has_type = headers.get(CONTENT_TYPE).is_some_and(|t| !t.is_empty());

        let value = if has_type || filename.is_some() {
            headers.remove(CONTENT_DISPOSITION);
            FieldValue::File(FileField {
                data: part.data,
                filename,
                headers,
            })
        } else {
            FieldValue::Text(String::from_utf8_lossy(&part.data).into_owned())
        };

        Ok(Ok((name.to_string(), value)))
    }
}

/// Reduce parts with the default reducer.
///
/// # Errors
///
/// See [`FieldReducer::reduce`].
pub fn reduce<I>(parts: I) -> Result<FormFields, FormError>
where
    I: IntoIterator<Item = RawPart>,
{
    FieldReducer::new().reduce(parts)
}
