//! Error types for form-field reduction.

/// Errors raised while parsing a `Content-Disposition` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispositionError {
    /// The header value is empty.
    Empty,
    /// The disposition type is not a valid token.
    InvalidType,
    /// A parameter does not follow the `name=value` grammar.
    InvalidParameter,
    /// The same parameter appears more than once.
    DuplicateParameter { name: String },
    /// An extended (`name*`) parameter is not a valid RFC 5987 ext-value.
    InvalidExtendedValue,
    /// An extended parameter uses a charset other than UTF-8 or ISO-8859-1.
    UnsupportedCharset { charset: String },
}

impl std::fmt::Display for DispositionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty Content-Disposition value"),
            Self::InvalidType => write!(f, "invalid disposition type format"),
            Self::InvalidParameter => write!(f, "invalid disposition parameter format"),
            Self::DuplicateParameter { name } => {
                write!(f, "duplicate disposition parameter: {name}")
            }
            Self::InvalidExtendedValue => write!(f, "invalid extended parameter value"),
            Self::UnsupportedCharset { charset } => {
                write!(f, "unsupported charset in extended parameter: {charset}")
            }
        }
    }
}

impl std::error::Error for DispositionError {}

/// Errors that can occur while reducing multipart parts into form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// The body is not a list of well-formed parts.
    InvalidInput { detail: String },
    /// A present `Content-Disposition` header could not be parsed.
    Disposition(DispositionError),
    /// More honored parts than the configured maximum.
    TooManyFields { count: usize, max: usize },
    /// Summed payload size exceeds the configured maximum.
    TotalTooLarge { size: usize, max: usize },
}

impl FormError {
    pub(crate) fn invalid_input(detail: impl Into<String>) -> Self {
        Self::InvalidInput {
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { detail } => write!(f, "invalid multipart input: {detail}"),
            Self::Disposition(err) => write!(f, "invalid Content-Disposition: {err}"),
            Self::TooManyFields { count, max } => {
                write!(f, "too many fields: {count} exceeds limit of {max}")
            }
            Self::TotalTooLarge { size, max } => {
                write!(
                    f,
                    "total upload too large: {size} bytes exceeds limit of {max}"
                )
            }
        }
    }
}

impl std::error::Error for FormError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Disposition(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DispositionError> for FormError {
    fn from(err: DispositionError) -> Self {
        Self::Disposition(err)
    }
}
