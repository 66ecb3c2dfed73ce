//! Storage backend abstraction.
//!
//! The [`StoreBackend`] trait is the collaborator contract the lifecycle
//! plugins decorate: a unified async interface over concrete stores
//! (in-memory, MongoDB, ...). The plugins run strictly before dispatch — a
//! backend receives queries and pipelines with any deletion predicate already
//! merged in, and documents already stamped.
//!
//! Implementations must be thread-safe (`Send + Sync`) and support concurrent
//! access; the exact concurrency model is implementation-specific. All
//! failures are reported through [`LifecycleResult`] and propagate to the
//! caller unchanged — no retry, backoff, or timeout logic exists above this
//! trait.

use async_trait::async_trait;
use bson::{Bson, Uuid};
use std::fmt::Debug;

use crate::{error::LifecycleResult, pipeline::Pipeline, query::{Expr, Query}, update::Update};

/// Abstract interface for document storage backends.
///
/// Apart from [`shutdown`](StoreBackend::shutdown) the trait is object-safe,
/// so backends can be used both as generic parameters and behind `dyn`.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Inserts new documents into a collection.
    ///
    /// # Arguments
    ///
    /// * `documents` - A vector of (UUID, BSON document) pairs to insert
    /// * `collection` - The collection name; created automatically if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`](crate::error::LifecycleError) if a document
    /// with the same ID already exists or the operation fails.
    async fn insert_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> LifecycleResult<()>;

    /// Replaces existing documents in a collection by ID.
    ///
    /// This is the single-record persistence call the instance-level
    /// soft-delete and restore mutators go through.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError`](crate::error::LifecycleError) if a document
    /// does not exist or the operation fails.
    async fn update_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> LifecycleResult<()>;

    /// Physically deletes documents from a collection by their IDs.
    ///
    /// The soft-delete plugin never calls this on its own; it is the
    /// hard-delete escape used by `find_one_and_delete`.
    async fn delete_documents(&self, ids: Vec<Uuid>, collection: &str) -> LifecycleResult<()>;

    /// Retrieves documents by their IDs. Missing IDs are omitted from the result.
    async fn get_documents(
        &self,
        ids: Vec<Uuid>,
        collection: &str,
    ) -> LifecycleResult<Vec<Bson>>;

    /// Executes a structured query (filter, sort, limit, offset).
    async fn query_documents(
        &self,
        query: Query,
        collection: &str,
    ) -> LifecycleResult<Vec<Bson>>;

    /// Counts documents matching a filter. `None` counts the whole collection.
    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> LifecycleResult<u64>;

    /// Collects the distinct values of a field across documents matching a filter.
    async fn distinct_values(
        &self,
        field: &str,
        filter: Option<Expr>,
        collection: &str,
    ) -> LifecycleResult<Vec<Bson>>;

    /// Applies a field-set update to documents matching a filter.
    ///
    /// `None` matches every document. When `multi` is false at most one
    /// matching document is modified.
    ///
    /// # Returns
    ///
    /// The number of documents modified.
    async fn update_where(
        &self,
        filter: Option<Expr>,
        update: Update,
        multi: bool,
        collection: &str,
    ) -> LifecycleResult<u64>;

    /// Executes an aggregation pipeline, stages in order.
    async fn aggregate_documents(
        &self,
        pipeline: Pipeline,
        collection: &str,
    ) -> LifecycleResult<Vec<Bson>>;

    /// Creates a new, empty collection.
    async fn create_collection(&self, name: &str) -> LifecycleResult<()>;

    /// Drops a collection and all its documents. Irreversible.
    async fn drop_collection(&self, name: &str) -> LifecycleResult<()>;

    /// Lists the names of all collections in the store.
    async fn list_collections(&self) -> LifecycleResult<Vec<String>>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op; backends with external
    /// connections should override it.
    async fn shutdown(self) -> LifecycleResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> LifecycleResult<Self::Backend>;
}
