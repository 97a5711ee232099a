//! Store error taxonomy.
//!
//! Specific kinds per failure mode so the request layer can map each to its
//! own response shape instead of one generic message.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The supplied identifier is not a valid document id.
    #[error("malformed identifier: {0}")]
    InvalidId(String),

    /// No document matched the identifier.
    #[error("document not found")]
    NotFound,

    /// The store could not be reached or the operation failed inside it.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A document failed to serialize into the store's representation.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
