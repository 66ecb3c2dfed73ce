//! Error and result types for the lifecycle layer.
//!
//! The plugins introduce no failure modes of their own for store operations:
//! backend errors are carried through unchanged as [`LifecycleError::Backend`].
//! Use [`LifecycleResult<T>`] as the return type for fallible operations.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors surfaced by the lifecycle layer.
///
/// Serialization failures, document lifecycle issues, collection management,
/// and backend-specific errors all land here.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Serialization/deserialization error when converting between document formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during store initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// A document with the given ID already exists in the collection.
    /// The first argument is the document ID, the second is the collection name.
    #[error("Document {0} already exists in collection {1}")]
    DocumentAlreadyExists(String, String),
    /// The requested document was not found in the collection.
    /// The first argument is the document ID, the second is the collection name.
    #[error("Document not found {0} in collection {1}")]
    DocumentNotFound(String, String),
    /// The requested collection does not exist in the store.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),
    /// The document has an invalid structure for the requested operation.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// An operation requires a plugin that was disabled on the store builder.
    #[error("Plugin not enabled: {0}")]
    PluginDisabled(&'static str),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
    /// An unknown error occurred.
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// A specialized `Result` type for lifecycle layer operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

impl From<BsonError> for LifecycleError {
    fn from(err: BsonError) -> Self {
        LifecycleError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for LifecycleError {
    fn from(err: SerdeJsonError) -> Self {
        LifecycleError::Serialization(err.to_string())
    }
}
