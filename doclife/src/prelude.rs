//! Convenient re-exports of commonly used types from doclife.
//!
//! Import this prelude module to quickly access the most frequently used
//! types and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use doclife::prelude::*;
//! ```
//!
//! This provides access to:
//! - Document traits and serialization helpers
//! - Store wiring, plugins, and collection interfaces
//! - Soft-delete configuration and read intents
//! - Query construction, pipelines, and updates
//! - Error types

pub use doclife_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    collection::Collection,
    document::{Document, DocumentExt, SoftDeletable},
    error::{LifecycleError, LifecycleResult},
    pipeline::{Pipeline, Stage},
    projection::Projection,
    query::{Expr, FieldOp, Filter, Query, QueryBuilder, QueryVisitor, Sort, SortDirection, ValueKind},
    soft_delete::{DeletedVisibility, ReadIntent, SoftDeleteConfig},
    store::{LifecycleStore, LifecycleStoreBuilder, Plugins},
    timestamps::unix_now,
    update::Update,
};
