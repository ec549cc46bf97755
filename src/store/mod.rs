// ABOUTME: Document store abstraction shared by the Firestore client and the in-memory store
// ABOUTME: Defines the async operations the seeding and maintenance jobs need
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

//! # Document Stores
//!
//! Jobs are written against [`DocumentStore`] so they run unchanged against
//! Firestore ([`crate::firestore::FirestoreClient`]) and against
//! [`MemoryStore`], which backs `--dry-run` and the test suite.
//!
//! Paths are slash-separated and relative to the database root:
//! collection paths have an odd number of segments (`users/u1/daily_records`),
//! document paths an even number (`users/u1/daily_records/r1`).

use agua_core::errors::{AppError, AppResult};
use agua_core::models::{Document, FieldValue, Fields};
use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// In-memory document store
pub mod memory;

pub use memory::{AddCall, MemoryStore};

/// Length of generated document ids, matching the Firebase SDKs
const AUTO_ID_LENGTH: usize = 20;

/// Async document store operations
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store name for log output (e.g. "firestore", "memory")
    fn name(&self) -> &'static str;

    /// Insert a new document with a generated id and return that id
    ///
    /// No duplicate detection is performed.
    async fn add_document(&self, collection_path: &str, fields: &Fields) -> AppResult<String>;

    /// Create or fully replace the document at `document_path`
    async fn set_document(&self, document_path: &str, fields: &Fields) -> AppResult<()>;

    /// Overwrite only the given fields of an existing document
    ///
    /// Fails with `ResourceNotFound` if the document does not exist.
    async fn update_fields(&self, document_path: &str, fields: &Fields) -> AppResult<()>;

    /// Delete a document; deleting a missing document succeeds
    ///
    /// Sub-collections of the document are left untouched.
    async fn delete_document(&self, document_path: &str) -> AppResult<()>;

    /// List the documents of a collection
    ///
    /// With `include_missing`, ids that only exist as parents of
    /// sub-collections are returned as [`Document::missing`] entries.
    async fn list_documents(
        &self,
        collection_path: &str,
        include_missing: bool,
    ) -> AppResult<Vec<Document>>;

    /// Documents of a collection whose `field` equals `value`
    async fn query_equal(
        &self,
        collection_path: &str,
        field: &str,
        value: &FieldValue,
    ) -> AppResult<Vec<Document>>;
}

/// Generate a 20-character alphanumeric document id
#[must_use]
pub fn auto_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(AUTO_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// Join a collection path and a document id
#[must_use]
pub fn child_path(collection_path: &str, document_id: &str) -> String {
    format!("{collection_path}/{document_id}")
}

/// Check that `path` names a collection (odd number of non-empty segments)
///
/// # Errors
///
/// Returns `InvalidInput` for empty segments or document paths.
pub fn validate_collection_path(path: &str) -> AppResult<()> {
    validate_path(path, 1, "collection")
}

/// Check that `path` names a document (even number of non-empty segments)
///
/// # Errors
///
/// Returns `InvalidInput` for empty segments or collection paths.
pub fn validate_document_path(path: &str) -> AppResult<()> {
    validate_path(path, 0, "document")
}

fn validate_path(path: &str, parity: usize, kind: &str) -> AppResult<()> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.iter().any(|segment| segment.is_empty()) || segments.len() % 2 != parity {
        return Err(AppError::invalid_input(format!(
            "'{path}' is not a valid {kind} path"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_id_shape() {
        let id = auto_id();
        assert_eq!(id.len(), AUTO_ID_LENGTH);
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(id, auto_id());
    }

    #[test]
    fn test_path_validation() {
        assert!(validate_collection_path("activity_types").is_ok());
        assert!(validate_collection_path("users/u1/daily_records").is_ok());
        assert!(validate_collection_path("users/u1").is_err());
        assert!(validate_collection_path("users//daily_records").is_err());

        assert!(validate_document_path("global_stats/2025-12-09").is_ok());
        assert!(validate_document_path("global_stats").is_err());
        assert!(validate_document_path("").is_err());
    }
}
