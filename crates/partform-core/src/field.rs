//! Reduced form fields.

use std::collections::HashMap;

use serde::Serialize;

use crate::headers::PartHeaders;

/// A file-like field: the raw payload plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileField {
    /// The part's payload, moved out of the input part.
    pub data: Vec<u8>,
    /// Filename from the disposition, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// The part's headers without `content-disposition`.
    pub headers: PartHeaders,
}

impl FileField {
    /// The part's declared `content-type`, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type")
    }

    /// Size of the payload in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// File extension taken from the filename.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.filename
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }
}

/// The value of a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// A plain field decoded as UTF-8.
    Text(String),
    /// A field that declared a content type or a filename.
    File(FileField),
}

impl FieldValue {
    /// Returns true for a text field.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns true for a file field.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// The text, if this is a text field.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::File(_) => None,
        }
    }

    /// The file, if this is a file field.
    #[must_use]
    pub fn as_file(&self) -> Option<&FileField> {
        match self {
            Self::File(file) => Some(file),
            Self::Text(_) => None,
        }
    }

    /// The raw bytes of either variant.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::File(file) => &file.data,
        }
    }
}

/// Form fields keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormFields {
    fields: HashMap<String, FieldValue>,
}

impl FormFields {
    /// Create an empty set of fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a field, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.fields.insert(name.into(), value)
    }

    /// Get a field by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Get a text field by name.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Get a file field by name.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&FileField> {
        self.get(name).and_then(FieldValue::as_file)
    }

    /// Remove and return a field.
    pub fn take(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// Check if a field exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterate over all fields.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Get the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consume into the underlying map.
    #[must_use]
    pub fn into_inner(self) -> HashMap<String, FieldValue> {
        self.fields
    }
}

impl IntoIterator for FormFields {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::hash_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_file() -> FileField {
        FileField {
            data: vec![1, 2, 3],
            filename: Some("photo.tar.gz".to_string()),
            headers: [("Content-Type", "application/gzip")].into_iter().collect(),
        }
    }

    #[test]
    fn test_file_field_helpers() {
        let file = sample_file();
        assert_eq!(file.content_type(), Some("application/gzip"));
        assert_eq!(file.size(), 3);
        assert_eq!(file.extension(), Some("gz"));

        let unnamed = FileField {
            filename: None,
            ..sample_file()
        };
        assert_eq!(unnamed.extension(), None);
    }

    #[test]
    fn test_form_fields_accessors() {
        let mut fields = FormFields::new();
        assert!(fields.is_empty());
        fields.insert("title", FieldValue::Text("hello".to_string()));
        fields.insert("upload", FieldValue::File(sample_file()));

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.text("title"), Some("hello"));
        assert!(fields.file("title").is_none());
        assert_eq!(fields.file("upload").map(FileField::size), Some(3));
        assert!(fields.text("upload").is_none());
        assert_eq!(fields.get("upload").map(FieldValue::as_bytes), Some(&[1, 2, 3][..]));

        let taken = fields.take("title").unwrap();
        assert!(taken.is_text());
        assert!(!fields.contains("title"));
    }

    #[test]
    fn test_insert_replaces_previous_value() {
        let mut fields = FormFields::new();
        assert!(fields.insert("a", FieldValue::Text("1".into())).is_none());
        let old = fields.insert("a", FieldValue::Text("2".into()));
        assert_eq!(old, Some(FieldValue::Text("1".into())));
        assert_eq!(fields.text("a"), Some("2"));
    }

    #[test]
    fn test_serialize_shape() {
        let mut fields = FormFields::new();
        fields.insert("title", FieldValue::Text("hello".to_string()));
        fields.insert(
            "note",
            FieldValue::File(FileField {
                data: b"x".to_vec(),
                filename: None,
                headers: [("content-type", "text/plain")].into_iter().collect(),
            }),
        );

        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            value,
            json!({
                "title": { "kind": "text", "value": "hello" },
                "note": {
                    "kind": "file",
                    "value": { "data": [120], "headers": { "content-type": "text/plain" } }
                }
            })
        );
    }
}
