//! In-memory storage implementation for document stores.
//!
//! This module provides a simple but complete in-memory backend that stores
//! documents as BSON values in HashMaps with async-safe read-write locks.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use async_trait::async_trait;
use bson::{Bson, Uuid};
use mea::rwlock::RwLock;

use doclife_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    error::{LifecycleError, LifecycleResult},
    pipeline::{Pipeline, Stage},
    query::{Expr, Query, Sort, SortDirection},
    update::Update,
};

use crate::evaluator::{Comparable, DocumentEvaluator};

type CollectionMap = HashMap<String, Bson>;
type StoreMap = HashMap<String, CollectionMap>;

/// Thread-safe in-memory document storage backend.
///
/// This struct implements the [`StoreBackend`] trait to provide a fully
/// functional document store that operates entirely in memory using
/// async-aware read-write locks. All documents are stored as BSON values
/// indexed by their UUID.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state,
/// allowing it to be safely shared across async tasks. Multiple clones of the
/// same instance share the same underlying data.
///
/// # Performance
///
/// Queries scan all documents in a collection (no indexing). For small to
/// medium datasets this is typically acceptable; for larger datasets use a
/// persistent backend like MongoDB.
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// The main storage map: collection_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory document store.
    pub fn new() -> Self {
        Self { store: Arc::new(RwLock::new(StoreMap::new())) }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

fn sort_documents(documents: &mut [Bson], sort: &Sort) {
    documents.sort_by(|a, b| {
        let left = a
            .as_document()
            .and_then(|doc| doc.get(&sort.field))
            .map(Comparable::from)
            .unwrap_or(Comparable::Null);
        let right = b
            .as_document()
            .and_then(|doc| doc.get(&sort.field))
            .map(Comparable::from)
            .unwrap_or(Comparable::Null);

        match sort.direction {
            SortDirection::Asc => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
            SortDirection::Desc => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
        }
    });
}

fn matches(document: &Bson, filter: Option<&Expr>) -> bool {
    match filter {
        Some(expr) if !expr.is_empty() => DocumentEvaluator::new(document)
            .evaluate(expr)
            .unwrap_or(false),
        _ => true,
    }
}

#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> LifecycleResult<()> {
        let mut store = self.store.write().await;
        let collection_map = store
            .entry(collection.to_string())
            .or_default();

        for (id, doc) in documents {
            let key = id.to_string();

            if collection_map.contains_key(&key) {
                return Err(LifecycleError::DocumentAlreadyExists(
                    key,
                    collection.to_string(),
                ));
            }

            collection_map.insert(key, doc);
        }

        Ok(())
    }

    async fn update_documents(
        &self,
        documents: Vec<(Uuid, Bson)>,
        collection: &str,
    ) -> LifecycleResult<()> {
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Err(LifecycleError::CollectionNotFound(collection.to_string())),
        };

        for (id, doc) in documents {
            let key = id.to_string();

            if !collection_map.contains_key(&key) {
                return Err(LifecycleError::DocumentNotFound(key, collection.to_string()));
            }

            collection_map.insert(key, doc);
        }

        Ok(())
    }

    async fn delete_documents(&self, ids: Vec<Uuid>, collection: &str) -> LifecycleResult<()> {
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Err(LifecycleError::CollectionNotFound(collection.to_string())),
        };

        for id in ids {
            let key = id.to_string();

            if collection_map.remove(&key).is_none() {
                return Err(LifecycleError::DocumentNotFound(key, collection.to_string()));
            }
        }

        Ok(())
    }

    async fn get_documents(&self, ids: Vec<Uuid>, collection: &str) -> LifecycleResult<Vec<Bson>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let mut documents = Vec::with_capacity(ids.len());

        for id in ids {
            let key = id.to_string();

            if let Some(doc) = collection_map.get(&key) {
                documents.push(doc.clone());
            }
        }

        Ok(documents)
    }

    async fn query_documents(&self, query: Query, collection: &str) -> LifecycleResult<Vec<Bson>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let mut documents = match query.effective_filter() {
            Some(filter) => {
                DocumentEvaluator::filter_documents(collection_map.values(), filter)?
            }
            None => collection_map
                .values()
                .cloned()
                .collect::<Vec<_>>(),
        };

        if let Some(sort) = &query.sort {
            sort_documents(&mut documents, sort);
        }

        Ok(documents
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .collect())
    }

    async fn count_documents(
        &self,
        filter: Option<Expr>,
        collection: &str,
    ) -> LifecycleResult<u64> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(0),
        };

        Ok(collection_map
            .values()
            .filter(|doc| matches(doc, filter.as_ref()))
            .count() as u64)
    }

    async fn distinct_values(
        &self,
        field: &str,
        filter: Option<Expr>,
        collection: &str,
    ) -> LifecycleResult<Vec<Bson>> {
        let store = self.store.read().await;
        let collection_map = match store.get(collection) {
            Some(col) => col,
            None => return Ok(vec![]),
        };

        let mut values: Vec<Bson> = Vec::new();

        for doc in collection_map.values() {
            if !matches(doc, filter.as_ref()) {
                continue;
            }

            let Some(value) = doc.as_document().and_then(|body| body.get(field)) else {
                continue;
            };

            if !values.contains(value) {
                values.push(value.clone());
            }
        }

        Ok(values)
    }

    async fn update_where(
        &self,
        filter: Option<Expr>,
        update: Update,
        multi: bool,
        collection: &str,
    ) -> LifecycleResult<u64> {
        let mut store = self.store.write().await;
        let collection_map = match store.get_mut(collection) {
            Some(col) => col,
            None => return Ok(0),
        };

        let mut modified = 0u64;

        for doc in collection_map.values_mut() {
            if !matches(doc, filter.as_ref()) {
                continue;
            }

            if let Some(body) = doc.as_document_mut() {
                update.apply_to(body);
                modified += 1;
            }

            if !multi {
                break;
            }
        }

        Ok(modified)
    }

    async fn aggregate_documents(
        &self,
        pipeline: Pipeline,
        collection: &str,
    ) -> LifecycleResult<Vec<Bson>> {
        let store = self.store.read().await;
        let mut documents = match store.get(collection) {
            Some(col) => col.values().cloned().collect::<Vec<_>>(),
            None => return Ok(vec![]),
        };

        for stage in &pipeline.stages {
            match stage {
                Stage::Match(expr) => {
                    documents.retain(|doc| matches(doc, Some(expr)));
                }
                Stage::Sort(sort) => sort_documents(&mut documents, sort),
                Stage::Skip(count) => {
                    documents = documents
                        .into_iter()
                        .skip(*count)
                        .collect();
                }
                Stage::Limit(count) => documents.truncate(*count),
            }
        }

        Ok(documents)
    }

    async fn create_collection(&self, name: &str) -> LifecycleResult<()> {
        self.store
            .write()
            .await
            .entry(name.to_string())
            .or_insert_with(HashMap::new);

        Ok(())
    }

    async fn drop_collection(&self, name: &str) -> LifecycleResult<()> {
        let mut store = self.store.write().await;

        if store.remove(name).is_none() {
            return Err(LifecycleError::CollectionNotFound(name.to_string()));
        }

        Ok(())
    }

    async fn list_collections(&self) -> LifecycleResult<Vec<String>> {
        Ok(self
            .store
            .read()
            .await
            .keys()
            .cloned()
            .collect())
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// Currently a no-op builder, kept so callers construct every backend the
/// same way.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> LifecycleResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
