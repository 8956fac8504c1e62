use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use studycamp_core::CoreError;

use crate::error::Result;

/// Number of documents `GET /best-colleges` returns when no limit is given.
pub const DEFAULT_LIST_LIMIT: usize = 3;

/// High level status reported by the document store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Healthy,
    Unavailable,
}

/// Acknowledgement returned by [`DocumentStore::insert_one`].
#[derive(Debug, Clone, PartialEq)]
pub struct InsertResult {
    pub acknowledged: bool,
    /// `_id` of the stored document, assigned by the store when absent.
    pub inserted_id: Bson,
}

/// Abstraction over the document database (MongoDB, in-memory).
///
/// Collections are addressed by name and hold schema-less documents. No
/// operation retries, times out, or spans more than one collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Ping the store.
    async fn status(&self) -> Result<StoreStatus>;

    /// Every document in `collection`, in no particular order.
    async fn list_all(&self, collection: &str) -> Result<Vec<Document>>;

    /// At most `limit` documents in the store's natural scan order.
    ///
    /// A limit of zero yields no documents.
    async fn list_limited(&self, collection: &str, limit: usize) -> Result<Vec<Document>>;

    /// Fetch one document by its hex ObjectId.
    ///
    /// Fails with `NotFound` when nothing matches and `InvalidId` when `id`
    /// is not a well-formed ObjectId.
    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Document>;

    /// Insert `document` as-is, assigning an ObjectId `_id` when it has none.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertResult>;

    /// Documents whose top-level fields equal every entry of `filter`.
    ///
    /// An empty filter matches everything.
    async fn find_by_filter(&self, collection: &str, filter: Document) -> Result<Vec<Document>>;
}

/// Parse a hex ObjectId, mapping failures to `CoreError::InvalidId`.
pub fn parse_object_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|e| CoreError::invalid_id(id, e))
}
