//! MongoDB backend implementation for doclife.
//!
//! This crate provides a MongoDB-based implementation of the `StoreBackend`
//! trait, enabling persistent document storage with full query support using
//! MongoDB's querying capabilities.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! doclife = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Features
//!
//! - **Persistent storage** - Data is persisted to MongoDB Atlas or self-hosted MongoDB
//! - **Full query support** - Filtering, type checks, sorting, and pagination
//!   execute inside MongoDB's query engine
//! - **Server-side bulk updates and aggregation** - Filter-scoped `$set`
//!   updates and match/sort/skip/limit pipelines
//! - **Async/await** - Fully asynchronous API built on MongoDB's async driver
//!
//! # Example
//!
//! ```ignore
//! use doclife::{backend::StoreBackendBuilder, mongodb::MongoDbStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "my_database")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as doclife_mongodb;

pub mod query;
pub mod sanitize;
pub mod store;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
