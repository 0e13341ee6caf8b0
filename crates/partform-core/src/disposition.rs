//! `Content-Disposition` header parsing.
//!
//! Implements the RFC 6266 grammar used by `multipart/form-data` parts:
//!
//! ```text
//! disposition = type *( OWS ";" OWS param ) OWS
//! param       = token OWS "=" OWS ( token / quoted-string )
//! ```
//!
//! Extended parameters (`filename*=UTF-8''na%C3%AFve.txt`, RFC 5987) are
//! decoded and stored under the plain parameter name, taking precedence over
//! the plain form wherever it appears.

use std::collections::HashMap;

use crate::error::DispositionError;

/// The disposition type honored for form fields.
pub const FORM_DATA: &str = "form-data";

/// A parsed `Content-Disposition` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disposition {
    kind: String,
    parameters: HashMap<String, String>,
}

impl Disposition {
    /// Create a disposition from an already lower-cased type and parameters.
    #[must_use]
    pub fn new(kind: impl Into<String>, parameters: HashMap<String, String>) -> Self {
        Self {
            kind: kind.into(),
            parameters,
        }
    }

    /// The lower-cased disposition type (`form-data`, `inline`, ...).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// All parameters, keyed by lower-cased name.
    #[must_use]
    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }

    /// Get a parameter by name (case-insensitive).
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The `name` parameter.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.parameter("name")
    }

    /// The `filename` parameter.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.parameter("filename")
    }

    /// Returns true if the type is `form-data`.
    #[must_use]
    pub fn is_form_data(&self) -> bool {
        self.kind == FORM_DATA
    }
}

/// Parses `Content-Disposition` header values.
///
/// The reducer consults this for every part that carries the header.
/// Closures of the matching signature implement it too, which is handy for
/// tests and for hosts that already have a parser of their own.
pub trait DispositionParser {
    /// Parse a header value.
    fn parse(&self, value: &str) -> Result<Disposition, DispositionError>;
}

impl<F> DispositionParser for F
where
    F: Fn(&str) -> Result<Disposition, DispositionError>,
{
    fn parse(&self, value: &str) -> Result<Disposition, DispositionError> {
        self(value)
    }
}

/// The default RFC 6266 parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rfc6266Parser;

impl DispositionParser for Rfc6266Parser {
    fn parse(&self, value: &str) -> Result<Disposition, DispositionError> {
        parse_disposition(value)
    }
}

/// Parse a `Content-Disposition` header value.
///
/// # Errors
///
/// Fails on empty input, a malformed type or parameter, a repeated
/// parameter name, or an undecodable extended parameter.
pub fn parse_disposition(value: &str) -> Result<Disposition, DispositionError> {
    if value.is_empty() {
        return Err(DispositionError::Empty);
    }

    let bytes = value.as_bytes();
    let type_end = scan_token(bytes, 0);
    if type_end == 0 {
        return Err(DispositionError::InvalidType);
    }
    let kind = value[..type_end].to_ascii_lowercase();

    let mut index = skip_whitespace(bytes, type_end);
    if index < bytes.len() && bytes[index] != b';' {
        return Err(DispositionError::InvalidType);
    }

    let mut seen: Vec<String> = Vec::new();
    let mut parameters = HashMap::new();

    while index < bytes.len() {
        let (raw_name, raw_value, next) =
            scan_parameter(value, index).ok_or(DispositionError::InvalidParameter)?;
        index = next;

        let name = raw_name.to_ascii_lowercase();
        if seen.contains(&name) {
            return Err(DispositionError::DuplicateParameter { name });
        }
        seen.push(name.clone());

        if is_extended_name(&name) {
            let decoded = decode_ext_value(raw_value)?;
            parameters.insert(name[..name.len() - 1].to_string(), decoded);
            continue;
        }

        // An extended form already filled this slot.
        if parameters.contains_key(&name) {
            continue;
        }
        parameters.insert(name, unquote(raw_value));
    }

    Ok(Disposition { kind, parameters })
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'.' | b'^' | b'_' | b'`'
                | b'|' | b'~' | b'-'
        )
}

fn is_qdtext_byte(b: u8) -> bool {
    matches!(b, 0x20 | 0x21 | 0x23..=0x5b | 0x5d..=0x7e) || b >= 0x80
}

fn scan_token(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && is_token_byte(bytes[i]) {
        i += 1;
    }
    i
}

fn skip_whitespace(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t') {
        i += 1;
    }
    i
}

/// Index just past the closing quote of the quoted string opening at `start`.
fn scan_quoted(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => return Some(i + 1),
            b'\\' => {
                let escaped = *bytes.get(i + 1)?;
                if !(0x20..=0x7e).contains(&escaped) {
                    return None;
                }
                i += 2;
            }
            b if is_qdtext_byte(b) => i += 1,
            _ => return None,
        }
    }
    None
}

/// Scan `; name = value` at `start`, returning raw name, raw value and the
/// index past trailing whitespace.
fn scan_parameter(value: &str, start: usize) -> Option<(&str, &str, usize)> {
    let bytes = value.as_bytes();
    if bytes.get(start) != Some(&b';') {
        return None;
    }

    let name_start = skip_whitespace(bytes, start + 1);
    let name_end = scan_token(bytes, name_start);
    if name_end == name_start {
        return None;
    }

    let eq = skip_whitespace(bytes, name_end);
    if bytes.get(eq) != Some(&b'=') {
        return None;
    }

    let value_start = skip_whitespace(bytes, eq + 1);
    let value_end = if bytes.get(value_start) == Some(&b'"') {
        scan_quoted(bytes, value_start)?
    } else {
        let end = scan_token(bytes, value_start);
        if end == value_start {
            return None;
        }
        end
    };

    Some((
        &value[name_start..name_end],
        &value[value_start..value_end],
        skip_whitespace(bytes, value_end),
    ))
}

fn unquote(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// `filename*` is extended, `file*name` is an ordinary token.
fn is_extended_name(name: &str) -> bool {
    name.find('*') == Some(name.len() - 1)
}

fn is_charset_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'+' | b'-' | b'^' | b'_' | b'`' | b'{' | b'}'
                | b'~'
        )
}

fn is_attr_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'&' | b'+' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~' | b'-'
        )
}

/// `language = 2*3ALPHA *3("-" 3ALPHA) / 4*8ALPHA / ""`
fn is_language_tag(tag: &str) -> bool {
    if tag.is_empty() {
        return true;
    }
    let mut pieces = tag.split('-');
    let Some(primary) = pieces.next() else {
        return false;
    };
    if !primary.bytes().all(|b| b.is_ascii_alphabetic()) {
        return false;
    }
    match primary.len() {
        2 | 3 => {
            let rest: Vec<&str> = pieces.collect();
            rest.len() <= 3
                && rest
                    .iter()
                    .all(|p| p.len() == 3 && p.bytes().all(|b| b.is_ascii_alphabetic()))
        }
        4..=8 => pieces.next().is_none(),
        _ => false,
    }
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Decode an RFC 5987 `charset'language'value-chars` ext-value.
fn decode_ext_value(raw: &str) -> Result<String, DispositionError> {
    let mut pieces = raw.splitn(3, '\'');
    let (Some(charset), Some(language), Some(encoded)) =
        (pieces.next(), pieces.next(), pieces.next())
    else {
        return Err(DispositionError::InvalidExtendedValue);
    };

    if charset.is_empty()
        || !charset.bytes().all(is_charset_byte)
        || !is_language_tag(language)
        || encoded.is_empty()
    {
        return Err(DispositionError::InvalidExtendedValue);
    }

    let bytes = encoded.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hi = bytes.get(i + 1).copied().and_then(hex_digit);
                let lo = bytes.get(i + 2).copied().and_then(hex_digit);
                let (Some(hi), Some(lo)) = (hi, lo) else {
                    return Err(DispositionError::InvalidExtendedValue);
                };
                decoded.push((hi << 4) | lo);
                i += 3;
            }
            b if is_attr_byte(b) => {
                decoded.push(b);
                i += 1;
            }
            _ => return Err(DispositionError::InvalidExtendedValue),
        }
    }

    match charset.to_ascii_lowercase().as_str() {
        "utf-8" => Ok(String::from_utf8_lossy(&decoded).into_owned()),
        "iso-8859-1" => Ok(decoded.iter().map(|&b| char::from(b)).collect()),
        _ => Err(DispositionError::UnsupportedCharset {
            charset: charset.to_string(),
        }),
    }
}
