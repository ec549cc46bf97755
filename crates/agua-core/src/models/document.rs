// ABOUTME: Schema-less document model mirroring Firestore field values
// ABOUTME: Provides typed accessors with the lenient defaults the mobile app data needs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

use std::collections::btree_map::{self, BTreeMap};

use chrono::{DateTime, Utc};

/// A single Firestore field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// `nullValue`
    Null,
    /// `booleanValue`
    Boolean(bool),
    /// `integerValue` (64-bit, sent as a decimal string on the wire)
    Integer(i64),
    /// `doubleValue`
    Double(f64),
    /// `stringValue`
    String(String),
    /// `timestampValue`
    Timestamp(DateTime<Utc>),
    /// `arrayValue`
    Array(Vec<FieldValue>),
    /// `mapValue`
    Map(Fields),
    /// Write-only sentinel resolved by the store to its request time
    ServerTimestamp,
}

impl FieldValue {
    /// Numeric view of the value; integers are widened to `f64`
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(value) => Some(*value),
            Self::Integer(value) => Some(*value as f64),
            _ => None,
        }
    }

    /// String view of the value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Timestamp view of the value
    #[must_use]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Timestamp(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<usize> for FieldValue {
    fn from(value: usize) -> Self {
        Self::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// Ordered field map of a document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(BTreeMap<String, FieldValue>);

impl Fields {
    /// Create an empty field map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Insert or replace a field
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Raw access to a field
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Number stored under `name`, or `0.0` when absent or not numeric
    #[must_use]
    pub fn number_or_zero(&self, name: &str) -> f64 {
        self.get(name).and_then(FieldValue::as_f64).unwrap_or(0.0)
    }

    /// String stored under `name`
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    /// Timestamp stored under `name`
    #[must_use]
    pub fn timestamp(&self, name: &str) -> Option<DateTime<Utc>> {
        self.get(name).and_then(FieldValue::as_timestamp)
    }

    /// Names of fields holding the server timestamp sentinel
    #[must_use]
    pub fn server_timestamp_fields(&self) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(_, value)| matches!(value, FieldValue::ServerTimestamp))
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Copy of the map without server timestamp sentinels
    #[must_use]
    pub fn without_server_timestamps(&self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(_, value)| !matches!(value, FieldValue::ServerTimestamp))
                .map(|(name, value)| (name.clone(), value.clone()))
                .collect(),
        )
    }

    /// Field names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over fields in name order
    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.0.iter()
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for Fields {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A document read back from the store
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Store-assigned document id (last path segment)
    pub id: String,
    /// Path relative to the database root, e.g. `users/abc/daily_records/r1`
    pub path: String,
    /// Document fields (empty for missing parent documents)
    pub fields: Fields,
    /// `false` for ids that only exist as parents of sub-collections
    pub exists: bool,
}

impl Document {
    /// Build an existing document from its path
    #[must_use]
    pub fn new(path: impl Into<String>, fields: Fields) -> Self {
        let path = path.into();
        Self {
            id: last_segment(&path).to_owned(),
            path,
            fields,
            exists: true,
        }
    }

    /// Build a placeholder for a document that has sub-collections but no fields
    #[must_use]
    pub fn missing(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            id: last_segment(&path).to_owned(),
            path,
            fields: Fields::new(),
            exists: false,
        }
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_defaults_to_zero() {
        let fields = Fields::new()
            .with("litersUsed", 80.0)
            .with("quantity", 10_i64)
            .with("activityName", "Ducha");

        assert!((fields.number_or_zero("litersUsed") - 80.0).abs() < f64::EPSILON);
        assert!((fields.number_or_zero("quantity") - 10.0).abs() < f64::EPSILON);
        assert!(fields.number_or_zero("activityName").abs() < f64::EPSILON);
        assert!(fields.number_or_zero("missing").abs() < f64::EPSILON);
    }

    #[test]
    fn test_server_timestamp_split() {
        let fields = Fields::new()
            .with("totalLiters", 12.5)
            .with("lastUpdate", FieldValue::ServerTimestamp);

        assert_eq!(fields.server_timestamp_fields(), vec!["lastUpdate"]);
        let plain = fields.without_server_timestamps();
        assert_eq!(plain.len(), 1);
        assert!(plain.get("lastUpdate").is_none());
    }

    #[test]
    fn test_document_id_from_path() {
        let doc = Document::new("users/u1/daily_records/r1", Fields::new());
        assert_eq!(doc.id, "r1");
        assert!(doc.exists);

        let parent = Document::missing("users/u2");
        assert_eq!(parent.id, "u2");
        assert!(!parent.exists);
    }
}
