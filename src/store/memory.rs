// ABOUTME: In-process document store with Firestore-like semantics
// ABOUTME: Backs dry runs and tests; records every insert and can simulate insert failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

use std::collections::BTreeMap;

use agua_core::errors::{AppError, AppResult};
use agua_core::models::{Document, FieldValue, Fields};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{auto_id, child_path, validate_collection_path, validate_document_path, DocumentStore};

/// One recorded `add_document` call
#[derive(Debug, Clone, PartialEq)]
pub struct AddCall {
    /// Collection the document was added to
    pub collection_path: String,
    /// Generated document id
    pub document_id: String,
    /// Fields as written (server timestamps resolved)
    pub fields: Fields,
}

#[derive(Default)]
struct State {
    /// Collection path -> documents in insertion order
    collections: BTreeMap<String, Vec<(String, Fields)>>,
    add_calls: Vec<AddCall>,
}

impl State {
    fn find(&self, document_path: &str) -> Option<(&str, usize)> {
        let (collection, id) = document_path.rsplit_once('/')?;
        let (key, docs) = self.collections.get_key_value(collection)?;
        docs.iter()
            .position(|(doc_id, _)| doc_id == id)
            .map(|index| (key.as_str(), index))
    }

    fn upsert(&mut self, document_path: &str, fields: Fields) {
        let Some((collection, id)) = document_path.rsplit_once('/') else {
            return;
        };
        let docs = self.collections.entry(collection.to_owned()).or_default();
        if let Some(existing) = docs.iter_mut().find(|(doc_id, _)| doc_id == id) {
            existing.1 = fields;
        } else {
            docs.push((id.to_owned(), fields));
        }
    }
}

/// In-memory [`DocumentStore`]
///
/// Listings return documents in insertion order.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    fail_after_adds: Option<usize>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose inserts fail once `successful_adds` have succeeded
    #[must_use]
    pub fn failing_after(successful_adds: usize) -> Self {
        Self {
            state: RwLock::new(State::default()),
            fail_after_adds: Some(successful_adds),
        }
    }

    /// Every successful `add_document` call, in order
    pub async fn add_calls(&self) -> Vec<AddCall> {
        self.state.read().await.add_calls.clone()
    }

    /// Existing documents of a collection, in insertion order
    pub async fn documents(&self, collection_path: &str) -> Vec<Document> {
        self.state
            .read()
            .await
            .collections
            .get(collection_path)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| {
                        Document::new(child_path(collection_path, id), fields.clone())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fields of a single document
    pub async fn document(&self, document_path: &str) -> Option<Fields> {
        let state = self.state.read().await;
        let (collection, index) = state.find(document_path)?;
        state
            .collections
            .get(collection)
            .and_then(|docs| docs.get(index))
            .map(|(_, fields)| fields.clone())
    }
}

fn resolve_server_timestamps(fields: &Fields) -> Fields {
    let now = Utc::now();
    fields
        .iter()
        .map(|(name, value)| {
            let value = match value {
                FieldValue::ServerTimestamp => FieldValue::Timestamp(now),
                other => other.clone(),
            };
            (name.clone(), value)
        })
        .collect()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn add_document(&self, collection_path: &str, fields: &Fields) -> AppResult<String> {
        validate_collection_path(collection_path)?;
        let mut state = self.state.write().await;

        if let Some(limit) = self.fail_after_adds {
            if state.add_calls.len() >= limit {
                return Err(AppError::external_service(
                    "memory",
                    format!("simulated insert failure after {limit} documents"),
                ));
            }
        }

        let document_id = auto_id();
        let fields = resolve_server_timestamps(fields);
        state
            .collections
            .entry(collection_path.to_owned())
            .or_default()
            .push((document_id.clone(), fields.clone()));
        state.add_calls.push(AddCall {
            collection_path: collection_path.to_owned(),
            document_id: document_id.clone(),
            fields,
        });

        debug!(collection = %collection_path, id = %document_id, "memory: added document");
        Ok(document_id)
    }

    async fn set_document(&self, document_path: &str, fields: &Fields) -> AppResult<()> {
        validate_document_path(document_path)?;
        self.state
            .write()
            .await
            .upsert(document_path, resolve_server_timestamps(fields));
        Ok(())
    }

    async fn update_fields(&self, document_path: &str, fields: &Fields) -> AppResult<()> {
        validate_document_path(document_path)?;
        let mut state = self.state.write().await;
        let Some((collection, index)) = state.find(document_path) else {
            return Err(AppError::not_found(document_path));
        };
        let collection = collection.to_owned();

        if let Some((_, existing)) = state
            .collections
            .get_mut(&collection)
            .and_then(|docs| docs.get_mut(index))
        {
            for (name, value) in &resolve_server_timestamps(fields) {
                existing.insert(name.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn delete_document(&self, document_path: &str) -> AppResult<()> {
        validate_document_path(document_path)?;
        let mut state = self.state.write().await;
        if let Some((collection, id)) = document_path.rsplit_once('/') {
            if let Some(docs) = state.collections.get_mut(collection) {
                docs.retain(|(doc_id, _)| doc_id != id);
                if docs.is_empty() {
                    state.collections.remove(collection);
                }
            }
        }
        Ok(())
    }

    async fn list_documents(
        &self,
        collection_path: &str,
        include_missing: bool,
    ) -> AppResult<Vec<Document>> {
        validate_collection_path(collection_path)?;
        let mut documents = self.documents(collection_path).await;

        if include_missing {
            let prefix = format!("{collection_path}/");
            let state = self.state.read().await;
            for (key, docs) in &state.collections {
                if docs.is_empty() {
                    continue;
                }
                let Some(rest) = key.strip_prefix(&prefix) else {
                    continue;
                };
                let Some(parent_id) = rest.split('/').next() else {
                    continue;
                };
                if !documents.iter().any(|doc| doc.id == parent_id) {
                    documents.push(Document::missing(child_path(collection_path, parent_id)));
                }
            }
        }

        Ok(documents)
    }

    async fn query_equal(
        &self,
        collection_path: &str,
        field: &str,
        value: &FieldValue,
    ) -> AppResult<Vec<Document>> {
        Ok(self
            .list_documents(collection_path, false)
            .await?
            .into_iter()
            .filter(|doc| doc.fields.get(field) == Some(value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_parents_are_listed_on_request() {
        let store = MemoryStore::new();
        store
            .add_document("users/u1/daily_records", &Fields::new().with("dateKey", "2025-12-09"))
            .await
            .unwrap();
        store
            .set_document("users/u2", &Fields::new().with("email", "u2@example.com"))
            .await
            .unwrap();

        let existing = store.list_documents("users", false).await.unwrap();
        assert_eq!(existing.len(), 1);
        assert_eq!(existing[0].id, "u2");

        let all = store.list_documents("users", true).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|doc| doc.id.as_str()).collect();
        assert_eq!(ids, vec!["u2", "u1"]);
        assert!(!all[1].exists);
    }

    #[tokio::test]
    async fn test_parent_without_descendants_is_not_listed() {
        let store = MemoryStore::new();
        let record_id = store
            .add_document("users/ghost/daily_records", &Fields::new().with("dateKey", "2025-12-09"))
            .await
            .unwrap();
        let activity_id = store
            .add_document(
                &format!("users/ghost/daily_records/{record_id}/activities"),
                &Fields::new().with("litersUsed", 8.0),
            )
            .await
            .unwrap();

        store
            .delete_document(&format!("users/ghost/daily_records/{record_id}"))
            .await
            .unwrap();
        let ids: Vec<String> = store
            .list_documents("users", true)
            .await
            .unwrap()
            .into_iter()
            .map(|doc| doc.id)
            .collect();
        assert_eq!(ids, vec!["ghost"]);

        store
            .delete_document(&format!(
                "users/ghost/daily_records/{record_id}/activities/{activity_id}"
            ))
            .await
            .unwrap();
        assert!(store.list_documents("users", true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_requires_existing_document() {
        let store = MemoryStore::new();
        let err = store
            .update_fields("global_stats/nope", &Fields::new().with("totalLiters", 1.0))
            .await
            .unwrap_err();
        assert_eq!(err.code, agua_core::errors::ErrorCode::ResourceNotFound);

        store
            .set_document("global_stats/x", &Fields::new().with("totalLiters", 1.0).with("dateKey", "k"))
            .await
            .unwrap();
        store
            .update_fields("global_stats/x", &Fields::new().with("totalLiters", 5.0))
            .await
            .unwrap();
        let fields = store.document("global_stats/x").await.unwrap();
        assert!((fields.number_or_zero("totalLiters") - 5.0).abs() < f64::EPSILON);
        assert_eq!(fields.string("dateKey"), Some("k"));
    }

    #[tokio::test]
    async fn test_server_timestamps_are_resolved() {
        let store = MemoryStore::new();
        store
            .set_document(
                "global_stats/water_consumption",
                &Fields::new().with("lastUpdate", FieldValue::ServerTimestamp),
            )
            .await
            .unwrap();
        let fields = store.document("global_stats/water_consumption").await.unwrap();
        assert!(fields.timestamp("lastUpdate").is_some());
    }

    #[tokio::test]
    async fn test_failing_store_stops_after_limit() {
        let store = MemoryStore::failing_after(1);
        assert!(store.add_document("activity_types", &Fields::new()).await.is_ok());
        assert!(store.add_document("activity_types", &Fields::new()).await.is_err());
        assert_eq!(store.add_calls().await.len(), 1);
    }
}
