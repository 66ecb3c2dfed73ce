//! Lifecycle plugins for a thin JSON document store layer.
//!
//! This crate is the core of the doclife project. It decorates a document
//! store with three behavioral plugins and the wiring to apply them to every
//! document type vended by a store:
//!
//! - **Soft delete** ([`soft_delete`]) - deletion-marker semantics with
//!   query-time filter injection and per-call visibility opt-ins
//! - **Timestamps** ([`timestamps`]) - creation/update stamping as integer
//!   seconds since epoch
//! - **Output projection** ([`projection`]) - renames the internal identifier
//!   key and strips the internal version key from outgoing representations
//!
//! Supporting surface, in the same shape as the underlying layer:
//!
//! - **Document traits** ([`document`]) - traits for defining and serializing
//!   documents, plus the soft-delete marker accessor
//! - **Backend abstraction** ([`backend`]) - the storage collaborator contract
//! - **Query and filtering** ([`query`]) - filter expression AST and queries
//! - **Aggregation** ([`pipeline`]) - match/sort/skip/limit pipelines
//! - **Updates** ([`update`]) - explicit field-set specifications
//! - **Collections** ([`collection`]) - the decorated per-type operation surface
//! - **Store** ([`store`]) - plugin wiring and collection access
//! - **Errors** ([`error`]) - error and result types
//!
//! # Example
//!
//! ```ignore
//! use doclife::prelude::*;
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
//! ```

#[allow(unused_extern_crates)]
extern crate self as doclife_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod projection;
pub mod query;
pub mod soft_delete;
pub mod store;
pub mod timestamps;
pub mod update;
