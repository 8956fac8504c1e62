//! MongoDB-backed document store
//!
//! One [`Client`] is created at startup and shared for the process lifetime;
//! connection pooling is left to the driver. Calls carry no timeout of their
//! own, so a hung server hangs the request that issued the call.

use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::options::{ClientOptions, FindOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection, Database};
use tracing::{debug, info, warn};

use studycamp_core::CoreError;

use crate::backend::{parse_object_id, DocumentStore, InsertResult, StoreStatus};
use crate::error::Result;

/// Document store backed by a MongoDB deployment.
#[derive(Clone)]
pub struct MongoDocumentStore {
    client: Client,
    database: Database,
}

impl MongoDocumentStore {
    /// Parse `uri` and build a client pinned to Stable API v1.
    ///
    /// The driver connects lazily; use [`DocumentStore::status`] to confirm
    /// the deployment is reachable.
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let mut options = ClientOptions::parse(uri).await.map_err(storage_error)?;
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );
        options.app_name = Some("studycamp-api".to_string());

        let client = Client::with_options(options).map_err(storage_error)?;
        info!("MongoDB client created for database '{}'", database);

        Ok(Self::from_client(client, database))
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client, database: &str) -> Self {
        let database = client.database(database);
        Self { client, database }
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        options: Option<FindOptions>,
    ) -> Result<Vec<Document>> {
        let cursor = self
            .collection(collection)
            .find(filter, options)
            .await
            .map_err(storage_error)?;
        let documents: Vec<Document> = cursor.try_collect().await.map_err(storage_error)?;

        debug!("Read {} document(s) from '{}'", documents.len(), collection);
        Ok(documents)
    }
}

fn storage_error(err: mongodb::error::Error) -> CoreError {
    CoreError::Storage(err.to_string())
}

#[async_trait]
impl DocumentStore for MongoDocumentStore {
    async fn status(&self) -> Result<StoreStatus> {
        match self
            .client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
        {
            Ok(_) => Ok(StoreStatus::Healthy),
            Err(e) => {
                warn!("MongoDB ping failed: {}", e);
                Ok(StoreStatus::Unavailable)
            }
        }
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<Document>> {
        self.find(collection, Document::new(), None).await
    }

    async fn list_limited(&self, collection: &str, limit: usize) -> Result<Vec<Document>> {
        // The server treats limit(0) as "no limit".
        if limit == 0 {
            return Ok(Vec::new());
        }

        let options = FindOptions::builder()
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();
        self.find(collection, Document::new(), Some(options)).await
    }

    async fn get_by_id(&self, collection: &str, id: &str) -> Result<Document> {
        let oid = parse_object_id(id)?;

        self.collection(collection)
            .find_one(doc! { "_id": oid }, None)
            .await
            .map_err(storage_error)?
            .ok_or_else(|| CoreError::not_found("document", id))
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<InsertResult> {
        let result = self
            .collection(collection)
            .insert_one(document, None)
            .await
            .map_err(storage_error)?;

        Ok(InsertResult {
            acknowledged: true,
            inserted_id: result.inserted_id,
        })
    }

    async fn find_by_filter(&self, collection: &str, filter: Document) -> Result<Vec<Document>> {
        self.find(collection, filter, None).await
    }
}
