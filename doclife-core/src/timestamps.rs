//! Creation/update timestamping.
//!
//! When the plugin is enabled on a store, every insert stamps a document with
//! its creation and last-write times, and every save re-stamps the last-write
//! time. Values are integer seconds since the Unix epoch. Documents opt in by
//! overriding the [`Document`](crate::document::Document) stamp hooks; the
//! default hooks are no-ops, so untimestamped types pass through writes
//! untouched.

use chrono::Utc;

use crate::document::Document;

/// Current Unix time in whole seconds.
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Stamps a document for first insertion: creation and last-write markers.
pub fn stamp_insert<D: Document>(document: &mut D, at: i64) {
    document.stamp_created(at);
    document.stamp_updated(at);
}

/// Stamps a document for a save: last-write marker only.
pub fn stamp_save<D: Document>(document: &mut D, at: i64) {
    document.stamp_updated(at);
}
