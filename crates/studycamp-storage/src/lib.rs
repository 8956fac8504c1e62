//! Storage gateway for the StudyCamp API.
//!
//! Every route performs at most one call against a [`DocumentStore`]. The
//! production implementation talks to MongoDB; the in-memory one backs tests
//! and local development.

pub mod backend;
pub mod error;
pub mod memory;
pub mod mongo;

pub use backend::{DocumentStore, InsertResult, StoreStatus, DEFAULT_LIST_LIMIT};
pub use error::{Error, Result};
pub use memory::MemoryDocumentStore;
pub use mongo::MongoDocumentStore;
