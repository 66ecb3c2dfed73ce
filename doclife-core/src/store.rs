//! Store wiring: one backend, one plugin set, typed collections on demand.
//!
//! A [`LifecycleStore`] pairs a storage backend with an explicit [`Plugins`]
//! value and hands out [`Collection`] handles that apply those plugins to
//! every operation. All configuration lives in the store instance; two stores
//! with different plugin settings coexist in one process without interfering.

use tracing::debug;

use crate::{
    backend::StoreBackend,
    collection::Collection,
    document::Document,
    error::LifecycleResult,
    projection::Projection,
    soft_delete::SoftDeleteConfig,
};

/// The plugin set a store applies to its collections.
///
/// Every plugin is enabled by default; use the store builder to switch
/// individual plugins off or reconfigure them.
#[derive(Debug, Clone)]
pub struct Plugins {
    /// Soft-delete filter injection, or `None` to disable.
    pub soft_delete: Option<SoftDeleteConfig>,
    /// Creation/update timestamping on insert and save.
    pub timestamps: bool,
    /// Identity projection applied to output documents, or `None` to disable.
    pub projection: Option<Projection>,
}

impl Default for Plugins {
    fn default() -> Self {
        Self {
            soft_delete: Some(SoftDeleteConfig::default()),
            timestamps: true,
            projection: Some(Projection::default()),
        }
    }
}

/// A plugin-decorated document store.
#[derive(Debug)]
pub struct LifecycleStore<B: StoreBackend> {
    backend: B,
    plugins: Plugins,
}

impl<B: StoreBackend> LifecycleStore<B> {
    /// Creates a store with the default plugin set (everything enabled).
    pub fn new(backend: B) -> Self {
        Self { backend, plugins: Plugins::default() }
    }

    /// Starts building a store with a customized plugin set.
    pub fn builder(backend: B) -> LifecycleStoreBuilder<B> {
        LifecycleStoreBuilder { backend, plugins: Plugins::default() }
    }

    /// The plugin set applied to every collection of this store.
    pub fn plugins(&self) -> &Plugins {
        &self.plugins
    }

    /// Direct access to the underlying backend, bypassing all plugins.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the typed, plugin-decorated collection for a document type.
    pub fn collection<D: Document>(&self) -> Collection<'_, B, D> {
        Collection::new(
            D::collection_name().to_string(),
            &self.backend,
            self.plugins.clone(),
        )
    }

    /// Creates an empty collection with the given name.
    pub async fn create_collection(&self, name: &str) -> LifecycleResult<()> {
        debug!(collection = name, "creating collection");
        self.backend.create_collection(name).await
    }

    /// Drops a collection and all its documents. Irreversible.
    pub async fn drop_collection(&self, name: &str) -> LifecycleResult<()> {
        debug!(collection = name, "dropping collection");
        self.backend.drop_collection(name).await
    }

    /// Lists the names of all collections in the store.
    pub async fn list_collections(&self) -> LifecycleResult<Vec<String>> {
        self.backend.list_collections().await
    }

    /// Shuts down the store, releasing backend resources.
    pub async fn shutdown(self) -> LifecycleResult<()> {
        self.backend.shutdown().await
    }
}

/// Builder for a [`LifecycleStore`] with a non-default plugin set.
///
/// # Example
///
/// ```ignore
/// let store = LifecycleStore::builder(backend)
///     .soft_delete(SoftDeleteConfig::with_field("removedAt"))
///     .without_timestamps()
///     .build();
/// ```
#[derive(Debug)]
pub struct LifecycleStoreBuilder<B: StoreBackend> {
    backend: B,
    plugins: Plugins,
}

impl<B: StoreBackend> LifecycleStoreBuilder<B> {
    /// Enables soft delete with the given configuration.
    pub fn soft_delete(mut self, config: SoftDeleteConfig) -> Self {
        self.plugins.soft_delete = Some(config);
        self
    }

    /// Disables soft delete; no deletion predicate is ever injected and the
    /// bulk delete/restore mutators refuse to run.
    pub fn without_soft_delete(mut self) -> Self {
        self.plugins.soft_delete = None;
        self
    }

    /// Disables creation/update timestamping.
    pub fn without_timestamps(mut self) -> Self {
        self.plugins.timestamps = false;
        self
    }

    /// Enables the identity projection with the given configuration.
    pub fn projection(mut self, projection: Projection) -> Self {
        self.plugins.projection = Some(projection);
        self
    }

    /// Disables the identity projection; output keeps the stored key names.
    pub fn without_projection(mut self) -> Self {
        self.plugins.projection = None;
        self
    }

    pub fn build(self) -> LifecycleStore<B> {
        LifecycleStore { backend: self.backend, plugins: self.plugins }
    }
}
