//! In-memory document store for testing and local development

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, Document};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use studycamp_core::CoreError;

use crate::backend::{parse_object_id, DocumentStore, InsertResult, StoreStatus};
use crate::error::Result;

/// In-memory document store.
///
/// Each collection is a vector in insertion order, which doubles as the
/// natural scan order for [`DocumentStore::list_limited`].
#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently stored in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, Vec::len)
    }

    /// Whether `collection` holds no documents.
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn insert_document(&self, collection: &str, document: Document) -> Result<InsertResult> {
        let (inserted_id, stored) = match document.get("_id") {
            Some(id) => (id.clone(), document),
            None => {
                let oid = ObjectId::new();
                let mut stored = doc! { "_id": oid };
                for (key, value) in document {
                    stored.insert(key, value);
                }
                (Bson::ObjectId(oid), stored)
            }
        };

        let mut collections = self.collections.write();
        let documents = collections.entry(collection.to_string()).or_default();

        if documents.iter().any(|d| d.get("_id") == Some(&inserted_id)) {
            return Err(CoreError::Storage(format!(
                "duplicate key error collection: {collection} index: _id_ dup key: {inserted_id}"
            )));
        }

        documents.push(stored);
        debug!("Inserted document into '{}' ({} total)", collection, documents.len());

        Ok(InsertResult {
            acknowledged: true,
            inserted_id,
        })
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn status(&self) -> Result<StoreStatus> {
        Ok(StoreStatus::Healthy)
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<Document>> {
        Ok(self
            .collections
            .read()
            .get(collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_limited(&self, collection: &str, limit: usize) -> Result<Vec<Document>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Document> {
        let oid = Bson::ObjectId(parse_object_id(id)?);

        let collections = self.collections.read();
        collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.get("_id") == Some(&oid)))
            .cloned()
            .ok_or_else(|| CoreError::not_found("document", id))
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertResult> {
        self.insert_document(collection, document)
    }

    async fn find_by_filter(&self, collection: &str, filter: Document) -> Result<Vec<Document>> {
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| filter.iter().all(|(key, value)| d.get(key) == Some(value)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
