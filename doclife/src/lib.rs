//! Main doclife crate providing a plugin-decorated document storage layer.
//!
//! This crate is the primary entry point for users of the doclife framework.
//! It re-exports the core types and functionality from the sub-crates and
//! provides convenient access to the storage backends.
//!
//! # Features
//!
//! - **Type-safe document storage** - Define your data structures with Serde and store them safely
//! - **Soft deletion** - Deletion markers instead of physical removal, with
//!   automatic query-time filtering and per-call opt-ins
//! - **Timestamping** - Creation and last-write times stamped on insert and save
//! - **Output projection** - Internal keys renamed or stripped from outgoing documents
//! - **Multiple backends** - In-memory and MongoDB storage behind one trait
//!
//! # Quick Start
//!
//! ```ignore
//! use doclife::{prelude::*, memory::InMemoryStore};
//! use bson::Uuid;
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Note {
//!     pub id: Uuid,
//!     pub body: String,
//!     #[serde(rename = "deletedAt")]
//!     pub deleted_at: Option<i64>,
//! }
//!
//! impl Document for Note {
//!     fn id(&self) -> &Uuid { &self.id }
//!     fn collection_name() -> &'static str { "notes" }
//! }
//!
//! impl SoftDeletable for Note {
//!     fn deleted_at(&self) -> Option<i64> { self.deleted_at }
//!     fn set_deleted_at(&mut self, at: Option<i64>) { self.deleted_at = at; }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = LifecycleStore::new(InMemoryStore::new());
//!     let notes = store.collection::<Note>();
//!
//!     let mut note = Note {
//!         id: Uuid::new(),
//!         body: "hello".to_string(),
//!         deleted_at: None,
//!     };
//!
//!     notes.insert(vec![note.clone()]).await.unwrap();
//!
//!     // Soft-delete: the note stays stored but drops out of default reads.
//!     notes.soft_delete(&mut note).await.unwrap();
//!     assert!(notes.find(Query::new()).await.unwrap().is_empty());
//!
//!     // Opt in to see it again.
//!     let everything = notes
//!         .find_with(Query::new(), ReadIntent::new().with_deleted())
//!         .await
//!         .unwrap();
//!     assert_eq!(everything.len(), 1);
//!
//!     store.shutdown().await.unwrap();
//! }
//! ```
//!
//! # Configuration
//!
//! Every plugin is enabled by default. The store builder switches individual
//! plugins off or reconfigures them; configuration is per store instance, so
//! differently configured stores coexist in one process:
//!
//! ```ignore
//! use doclife::{prelude::*, memory::InMemoryStore, soft_delete::SoftDeleteConfig};
//!
//! let archive = LifecycleStore::builder(InMemoryStore::new())
//!     .soft_delete(SoftDeleteConfig::with_field("removedAt"))
//!     .without_timestamps()
//!     .build();
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires `mongodb` feature)

pub mod prelude;

pub use doclife_core::{
    backend, collection, document, error, pipeline, projection, query, soft_delete, store,
    timestamps, update,
};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use doclife_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use doclife_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
