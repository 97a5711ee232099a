//! Document store layer.
//!
//! Two collections, `jobs` and `users`, behind the [`JobStore`] and
//! [`UserStore`] traits. The MongoDB implementations are the production
//! path; the in-memory ones back integration tests. The connection handle
//! is injected explicitly — there is no process-global client.

pub mod client;
pub mod error;
pub mod jobs;
pub mod memory;
pub mod users;

pub use client::{StoreClient, StoreConfig};
pub use error::StoreError;
pub use jobs::{JobDocument, JobStore, MongoJobStore};
pub use memory::{MemoryJobStore, MemoryUserStore};
pub use users::{MongoUserStore, UserDocument, UserStore};

use error::Result;

pub use mongodb::bson::oid::ObjectId;

/// Parse a client-supplied identifier, surfacing malformed input as its own
/// error kind instead of a generic failure.
pub fn parse_object_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}
