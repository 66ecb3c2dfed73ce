//! Core traits for document representation and serialization.
//!
//! Every stored type implements [`Document`]; types that participate in the
//! soft-delete plugin additionally implement [`SoftDeletable`] to expose their
//! deletion marker. [`DocumentExt`] supplies BSON/JSON conversion helpers.

use bson::{Bson, Uuid, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Deserialize, Serialize};
use serde_json::{Value, from_value, to_value};

use crate::error::LifecycleResult;

/// Core trait that all documents handled by the lifecycle layer must implement.
///
/// Every document has a unique identifier (UUID) and names the collection it
/// belongs to. The two `stamp_*` hooks are the write-interception points used
/// by the timestamp plugin: they default to no-ops, so types that do not carry
/// timestamp fields pass through writes untouched.
///
/// # Example
///
/// ```ignore
/// use doclife::document::Document;
/// use bson::Uuid;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Article {
///     pub id: Uuid,
///     pub title: String,
///     #[serde(rename = "createdAt")]
///     pub created_at: Option<i64>,
///     #[serde(rename = "updatedAt")]
///     pub updated_at: Option<i64>,
/// }
///
/// impl Document for Article {
///     fn id(&self) -> &Uuid {
///         &self.id
///     }
///
///     fn collection_name() -> &'static str {
///         "articles"
///     }
///
///     fn stamp_created(&mut self, at: i64) {
///         self.created_at = Some(at);
///     }
///
///     fn stamp_updated(&mut self, at: i64) {
///         self.updated_at = Some(at);
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns a reference to this document's unique identifier.
    fn id(&self) -> &Uuid;

    /// Returns the name of the collection this document belongs to.
    ///
    /// This should be a static, lowercase identifier (e.g., "users", "notes").
    fn collection_name() -> &'static str;

    /// Records the creation time (Unix seconds). Default: no-op.
    ///
    /// Driven once by the timestamp plugin when the document is first inserted.
    fn stamp_created(&mut self, _at: i64) {}

    /// Records the last-write time (Unix seconds). Default: no-op.
    ///
    /// Driven by the timestamp plugin on every insert and save.
    fn stamp_updated(&mut self, _at: i64) {}
}

/// Marker-field accessor for documents participating in soft deletion.
///
/// The deletion marker fully determines liveness: `None` (serialized as an
/// explicit null) or an absent field means the document is live; a numeric
/// value is the Unix second at which it was soft-deleted. The soft-delete
/// plugin never removes a document physically.
///
/// Restored documents carry `None`, which serializes as a present-but-null
/// field; the default read filter matches both null and absent markers, so a
/// restored document is visible again.
///
/// Stored markers holding a non-numeric value would fail a strict
/// `Option<i64>` deserialization and abort whole typed reads; annotate the
/// marker field with
/// [`soft_delete::lenient_marker`](crate::soft_delete::lenient_marker) to
/// read such documents as unset instead.
pub trait SoftDeletable: Document {
    /// Returns the deletion marker, if set.
    fn deleted_at(&self) -> Option<i64>;

    /// Sets or clears the deletion marker.
    fn set_deleted_at(&mut self, at: Option<i64>);

    /// Whether this document is currently soft-deleted.
    fn is_soft_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }
}

/// Extension trait providing serialization/deserialization utilities for documents.
///
/// Automatically implemented for all [`Document`] types.
pub trait DocumentExt: Document {
    /// Converts this document to a BSON value for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_bson(&self) -> LifecycleResult<Bson>;

    /// Creates a document from a BSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_bson(bson: Bson) -> LifecycleResult<Self>;

    /// Converts this document to a JSON value for serialization.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_json(&self) -> LifecycleResult<Value>;

    /// Creates a document from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_json(value: Value) -> LifecycleResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_bson(&self) -> LifecycleResult<Bson> {
        Ok(serialize_to_bson(self)?)
    }

    fn from_bson(bson: Bson) -> LifecycleResult<Self> {
        Ok(deserialize_from_bson(bson)?)
    }

    fn to_json(&self) -> LifecycleResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> LifecycleResult<Self> {
        Ok(from_value(value)?)
    }
}
