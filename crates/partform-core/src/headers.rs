//! Part header map.

use std::collections::HashMap;

use serde::Serialize;

/// Headers of a single multipart part, keyed by lower-cased name.
///
/// Inserting a name that differs from an existing one only in case
/// replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PartHeaders {
    inner: HashMap<String, String>,
}

impl PartHeaders {
    /// Create empty headers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a header value by name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Returns true if a header with this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(&name.to_lowercase())
    }

    /// Insert a header, lower-casing its name.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.inner
            .insert(name.as_ref().to_lowercase(), value.into());
    }

    /// Remove a header, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.inner.remove(&name.to_lowercase())
    }

    /// A copy of these headers without `name`.
    #[must_use]
    pub fn without(&self, name: &str) -> Self {
        let mut copy = self.clone();
        copy.remove(name);
        copy
    }

    /// Iterate over all headers as (name, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for PartHeaders
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_lower_cased() {
        let headers: PartHeaders = [("Content-Type", "text/plain")].into_iter().collect();
        assert_eq!(headers.iter().next(), Some(("content-type", "text/plain")));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/plain"));
        assert!(headers.contains("content-type"));
    }

    #[test]
    fn test_case_variant_names_last_write_wins() {
        let headers: PartHeaders = [("X-Tag", "first"), ("x-tag", "second"), ("X-TAG", "third")]
            .into_iter()
            .collect();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("x-tag"), Some("third"));
    }

    #[test]
    fn test_values_pass_through_unchanged() {
        let headers: PartHeaders = [("X-Mixed", "  Keep Case  ")].into_iter().collect();
        assert_eq!(headers.get("x-mixed"), Some("  Keep Case  "));
    }

    #[test]
    fn test_without_leaves_original_intact() {
        let headers: PartHeaders = [
            ("Content-Disposition", "form-data; name=\"a\""),
            ("Content-Type", "text/plain"),
        ]
        .into_iter()
        .collect();
        let rest = headers.without("content-disposition");
        assert_eq!(rest.len(), 1);
        assert_eq!(rest.get("content-type"), Some("text/plain"));
        assert_eq!(headers.len(), 2);
    }
}
