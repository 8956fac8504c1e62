//! Core domain types for the StudyCamp API.
//!
//! Stored documents are schema-less BSON; the two entities the API reasons
//! about ([`College`] and [`CandidateSubmission`]) get typed records that are
//! converted at the storage boundary.

pub mod candidate;
pub mod collection;
pub mod college;
pub mod config;
pub mod error;
pub mod json;

pub use bson::{doc, oid::ObjectId, Bson, Document};
pub use candidate::CandidateSubmission;
pub use collection::{CANDIDATE_COLLECTION, COLLEGES, MY_COLLEGE};
pub use college::College;
pub use config::{AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig, StoreBackend, StudyCampConfig};
pub use error::{CoreError, CoreResult};
pub use json::{bson_to_json, document_to_json, json_object_to_document};
