//! The decorated per-type operation surface.
//!
//! A [`Collection`] wraps a storage backend for one document type and applies
//! the configured plugins at the pre-dispatch boundary of every operation
//! kind it supports: `find`, `find_one`, `count`, `distinct`, `exists`,
//! `update_one`, `update_many`, `find_one_and_update`, `find_one_and_delete`,
//! and `aggregate`. Each operation has a `*_with` form taking an explicit
//! [`ReadIntent`]; the plain form uses the default intent (soft-deleted
//! documents excluded).
//!
//! The operation kinds are enumerated as methods rather than dispatched
//! through a shared code path, so adding a kind without wiring the filter
//! policy is a compile error, not a silent gap.

use bson::{Bson, Uuid};
use serde_json::Value;
use std::marker::PhantomData;
use tracing::debug;

use crate::{
    backend::StoreBackend,
    document::{Document, DocumentExt, SoftDeletable},
    error::{LifecycleError, LifecycleResult},
    pipeline::Pipeline,
    query::{Expr, Query},
    soft_delete::{ReadIntent, SoftDeleteConfig},
    store::Plugins,
    timestamps::{stamp_insert, stamp_save, unix_now},
    update::Update,
};

/// A plugin-decorated, typed collection bound to a storage backend.
///
/// Obtained from [`LifecycleStore::collection`](crate::store::LifecycleStore::collection);
/// the plugin set is fixed by the store and read-only here, so concurrent
/// operations share nothing mutable.
#[derive(Debug)]
pub struct Collection<'a, B: StoreBackend, D: Document> {
    name: String,
    backend: &'a B,
    plugins: Plugins,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> Collection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B, plugins: Plugins) -> Self {
        Self { name, backend, plugins, _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn guard(&self) -> Option<&SoftDeleteConfig> {
        self.plugins.soft_delete.as_ref()
    }

    /// Merges the deletion predicate into a filter, when the plugin is enabled.
    fn guarded_filter(&self, filter: Option<Expr>, intent: &ReadIntent) -> Option<Expr> {
        match self.guard() {
            Some(config) => {
                debug!(
                    collection = %self.name,
                    visibility = ?config.resolve(intent),
                    "applying deletion-status filter"
                );
                config.apply_to_filter(filter, intent)
            }
            None => filter,
        }
    }

    fn guarded_query(&self, mut query: Query, intent: &ReadIntent) -> Query {
        query.filter = self.guarded_filter(query.filter, intent);
        query
    }

    /// Inserts new documents, stamping creation/update times when the
    /// timestamp plugin is enabled.
    ///
    /// # Errors
    ///
    /// Returns a [`LifecycleError`] if serialization or insertion fails.
    pub async fn insert(&self, mut documents: Vec<D>) -> LifecycleResult<()> {
        if self.plugins.timestamps {
            let now = unix_now();
            for document in &mut documents {
                stamp_insert(document, now);
            }
        }

        let mut pairs: Vec<(Uuid, Bson)> = Vec::with_capacity(documents.len());
        for document in &documents {
            pairs.push((*document.id(), document.to_bson()?));
        }

        self.backend
            .insert_documents(pairs, &self.name)
            .await
    }

    /// Persists one modified document, replacing the stored copy.
    ///
    /// Stamps the update time when the timestamp plugin is enabled and
    /// returns the document as written.
    pub async fn save(&self, mut document: D) -> LifecycleResult<D> {
        if self.plugins.timestamps {
            stamp_save(&mut document, unix_now());
        }

        self.backend
            .update_documents(
                vec![(*document.id(), document.to_bson()?)],
                &self.name,
            )
            .await?;

        Ok(document)
    }

    /// Retrieves documents by their IDs. No deletion filter applies to
    /// point lookups by identifier.
    pub async fn get<U>(&self, ids: Vec<U>) -> LifecycleResult<Vec<D>>
    where
        U: Into<Uuid>,
    {
        Ok(self
            .backend
            .get_documents(
                ids.into_iter()
                    .map(Into::into)
                    .collect(),
                &self.name,
            )
            .await?
            .into_iter()
            .map(D::from_bson)
            .collect::<Result<Vec<D>, _>>()?)
    }

    /// Queries documents under the default read intent.
    pub async fn find(&self, query: Query) -> LifecycleResult<Vec<D>> {
        self.find_with(query, ReadIntent::new()).await
    }

    /// Queries documents under an explicit read intent.
    pub async fn find_with(&self, query: Query, intent: ReadIntent) -> LifecycleResult<Vec<D>> {
        Ok(self
            .backend
            .query_documents(self.guarded_query(query, &intent), &self.name)
            .await?
            .into_iter()
            .map(D::from_bson)
            .collect::<Result<Vec<D>, _>>()?)
    }

    /// Returns the first document matching a filter, under the default intent.
    pub async fn find_one(&self, filter: Option<Expr>) -> LifecycleResult<Option<D>> {
        self.find_one_with(filter, ReadIntent::new()).await
    }

    /// Returns the first document matching a filter, under an explicit intent.
    pub async fn find_one_with(
        &self,
        filter: Option<Expr>,
        intent: ReadIntent,
    ) -> LifecycleResult<Option<D>> {
        let query = Query {
            filter: self.guarded_filter(filter, &intent),
            limit: Some(1),
            ..Query::default()
        };

        Ok(self
            .backend
            .query_documents(query, &self.name)
            .await?
            .into_iter()
            .next()
            .map(D::from_bson)
            .transpose()?)
    }

    /// Counts documents matching a filter, under the default intent.
    pub async fn count(&self, filter: Option<Expr>) -> LifecycleResult<u64> {
        self.count_with(filter, ReadIntent::new()).await
    }

    /// Counts documents matching a filter, under an explicit intent.
    pub async fn count_with(
        &self,
        filter: Option<Expr>,
        intent: ReadIntent,
    ) -> LifecycleResult<u64> {
        self.backend
            .count_documents(self.guarded_filter(filter, &intent), &self.name)
            .await
    }

    /// Collects the distinct values of a field, under the default intent.
    pub async fn distinct(&self, field: &str, filter: Option<Expr>) -> LifecycleResult<Vec<Bson>> {
        self.distinct_with(field, filter, ReadIntent::new())
            .await
    }

    /// Collects the distinct values of a field, under an explicit intent.
    pub async fn distinct_with(
        &self,
        field: &str,
        filter: Option<Expr>,
        intent: ReadIntent,
    ) -> LifecycleResult<Vec<Bson>> {
        self.backend
            .distinct_values(field, self.guarded_filter(filter, &intent), &self.name)
            .await
    }

    /// Whether any document matches a filter, under the default intent.
    pub async fn exists(&self, filter: Option<Expr>) -> LifecycleResult<bool> {
        self.exists_with(filter, ReadIntent::new()).await
    }

    /// Whether any document matches a filter, under an explicit intent.
    pub async fn exists_with(
        &self,
        filter: Option<Expr>,
        intent: ReadIntent,
    ) -> LifecycleResult<bool> {
        let query = Query {
            filter: self.guarded_filter(filter, &intent),
            limit: Some(1),
            ..Query::default()
        };

        Ok(!self
            .backend
            .query_documents(query, &self.name)
            .await?
            .is_empty())
    }

    /// Applies a field-set update to the first matching document, under the
    /// default intent. Returns the number of documents modified.
    pub async fn update_one(
        &self,
        filter: Option<Expr>,
        update: Update,
    ) -> LifecycleResult<u64> {
        self.update_one_with(filter, update, ReadIntent::new())
            .await
    }

    /// Applies a field-set update to the first matching document, under an
    /// explicit intent.
    pub async fn update_one_with(
        &self,
        filter: Option<Expr>,
        update: Update,
        intent: ReadIntent,
    ) -> LifecycleResult<u64> {
        self.backend
            .update_where(
                self.guarded_filter(filter, &intent),
                update,
                false,
                &self.name,
            )
            .await
    }

    /// Applies a field-set update to every matching document, under the
    /// default intent. Returns the number of documents modified.
    pub async fn update_many(
        &self,
        filter: Option<Expr>,
        update: Update,
    ) -> LifecycleResult<u64> {
        self.update_many_with(filter, update, ReadIntent::new())
            .await
    }

    /// Applies a field-set update to every matching document, under an
    /// explicit intent.
    pub async fn update_many_with(
        &self,
        filter: Option<Expr>,
        update: Update,
        intent: ReadIntent,
    ) -> LifecycleResult<u64> {
        self.backend
            .update_where(
                self.guarded_filter(filter, &intent),
                update,
                true,
                &self.name,
            )
            .await
    }

    /// Finds one matching document, applies a field-set update to it, and
    /// returns its pre-update state. Default intent.
    pub async fn find_one_and_update(
        &self,
        filter: Option<Expr>,
        update: Update,
    ) -> LifecycleResult<Option<D>> {
        self.find_one_and_update_with(filter, update, ReadIntent::new())
            .await
    }

    /// Finds one matching document, applies a field-set update to it, and
    /// returns its pre-update state. Explicit intent.
    pub async fn find_one_and_update_with(
        &self,
        filter: Option<Expr>,
        update: Update,
        intent: ReadIntent,
    ) -> LifecycleResult<Option<D>> {
        let Some(document) = self.find_one_with(filter, intent).await? else {
            return Ok(None);
        };

        let mut raw = document.to_bson()?;
        let body = raw
            .as_document_mut()
            .ok_or_else(|| LifecycleError::InvalidDocument("expected a document body".into()))?;
        update.apply_to(body);

        self.backend
            .update_documents(vec![(*document.id(), raw)], &self.name)
            .await?;

        Ok(Some(document))
    }

    /// Finds one matching document, physically removes it, and returns it.
    /// Default intent.
    pub async fn find_one_and_delete(&self, filter: Option<Expr>) -> LifecycleResult<Option<D>> {
        self.find_one_and_delete_with(filter, ReadIntent::new())
            .await
    }

    /// Finds one matching document, physically removes it, and returns it.
    /// Explicit intent.
    pub async fn find_one_and_delete_with(
        &self,
        filter: Option<Expr>,
        intent: ReadIntent,
    ) -> LifecycleResult<Option<D>> {
        let Some(document) = self.find_one_with(filter, intent).await? else {
            return Ok(None);
        };

        self.backend
            .delete_documents(vec![*document.id()], &self.name)
            .await?;

        Ok(Some(document))
    }

    /// Runs an aggregation pipeline under the default intent.
    ///
    /// The deletion predicate, when required, is prepended as the first
    /// stage; output documents are projected when the projection plugin is
    /// enabled.
    pub async fn aggregate(&self, pipeline: Pipeline) -> LifecycleResult<Vec<Bson>> {
        self.aggregate_with(pipeline, ReadIntent::new())
            .await
    }

    /// Runs an aggregation pipeline under an explicit intent.
    pub async fn aggregate_with(
        &self,
        mut pipeline: Pipeline,
        intent: ReadIntent,
    ) -> LifecycleResult<Vec<Bson>> {
        if let Some(config) = self.guard() {
            debug!(
                collection = %self.name,
                visibility = ?config.resolve(&intent),
                "guarding aggregation pipeline"
            );
            config.apply_to_pipeline(&mut pipeline, &intent);
        }

        let results = self
            .backend
            .aggregate_documents(pipeline, &self.name)
            .await?;

        Ok(match &self.plugins.projection {
            Some(projection) => results
                .into_iter()
                .map(|doc| projection.project_bson(doc))
                .collect(),
            None => results,
        })
    }

    /// Serializes a document for output, applying the identity projection
    /// when the plugin is enabled.
    pub fn output(&self, document: &D) -> LifecycleResult<Value> {
        let value = document.to_json()?;

        Ok(match &self.plugins.projection {
            Some(projection) => projection.project_json(value),
            None => value,
        })
    }

    /// Marks every document matching `filter` as deleted, stamping the marker
    /// field with the current Unix time.
    ///
    /// No deletion-status guard applies to the target selection: the caller
    /// explicitly chooses which documents (already-deleted or not) to stamp,
    /// so repeating the call re-stamps to the later time. `None` matches
    /// every document.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::PluginDisabled`] if the soft-delete plugin
    /// was disabled on the store.
    pub async fn soft_delete_where(&self, filter: Option<Expr>) -> LifecycleResult<u64> {
        let config = self
            .guard()
            .ok_or(LifecycleError::PluginDisabled("soft_delete"))?;

        self.backend
            .update_where(
                filter,
                Update::new().set(config.field.clone(), unix_now()),
                true,
                &self.name,
            )
            .await
    }

    /// Clears the deletion marker (sets it to explicit null) on every
    /// document matching `filter`. `None` matches every document.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::PluginDisabled`] if the soft-delete plugin
    /// was disabled on the store.
    pub async fn restore_where(&self, filter: Option<Expr>) -> LifecycleResult<u64> {
        let config = self
            .guard()
            .ok_or(LifecycleError::PluginDisabled("soft_delete"))?;

        self.backend
            .update_where(
                filter,
                Update::new().set(config.field.clone(), Bson::Null),
                true,
                &self.name,
            )
            .await
    }
}

impl<'a, B: StoreBackend, D: SoftDeletable> Collection<'a, B, D> {
    /// Marks one document as deleted and persists it.
    ///
    /// Sets the deletion marker to the current Unix time; any persistence
    /// failure propagates unchanged (no retry or rollback).
    pub async fn soft_delete(&self, document: &mut D) -> LifecycleResult<()> {
        document.set_deleted_at(Some(unix_now()));

        self.backend
            .update_documents(
                vec![(*document.id(), document.to_bson()?)],
                &self.name,
            )
            .await
    }

    /// Clears one document's deletion marker (explicit null) and persists it.
    ///
    /// The restored marker is present-but-null rather than absent; the
    /// default read filter matches both, so the document is visible again.
    pub async fn restore(&self, document: &mut D) -> LifecycleResult<()> {
        document.set_deleted_at(None);

        self.backend
            .update_documents(
                vec![(*document.id(), document.to_bson()?)],
                &self.name,
            )
            .await
    }
}
