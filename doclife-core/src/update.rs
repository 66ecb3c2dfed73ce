//! Field-set update specifications.
//!
//! An [`Update`] is an explicit list of field assignments applied to every
//! document matching a filter (a `$set`-style bulk update), or client-side to
//! a single BSON document. It never replaces a document wholesale and never
//! removes fields.

use bson::Bson;

/// An ordered set of field assignments.
///
/// # Example
///
/// ```ignore
/// use doclife::update::Update;
///
/// let update = Update::new()
///     .set("status", "archived")
///     .set("archivedBy", "ops");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Update {
    sets: Vec<(String, Bson)>,
}

impl Update {
    /// Creates an empty update.
    pub fn new() -> Self {
        Update::default()
    }

    /// Adds a field assignment. Later assignments to the same field win.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.sets.push((field.into(), value.into()));
        self
    }

    /// The field assignments, in insertion order.
    pub fn sets(&self) -> &[(String, Bson)] {
        &self.sets
    }

    /// Whether this update assigns no fields.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Applies the assignments to a BSON document in place.
    ///
    /// Fields are inserted or overwritten; nothing else in the document is
    /// touched.
    pub fn apply_to(&self, document: &mut bson::Document) {
        for (field, value) in &self.sets {
            document.insert(field.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn apply_inserts_and_overwrites() {
        let mut document = doc! { "name": "a", "status": "active" };

        Update::new()
            .set("status", "archived")
            .set("flag", true)
            .apply_to(&mut document);

        assert_eq!(document.get_str("status").unwrap(), "archived");
        assert_eq!(document.get_bool("flag").unwrap(), true);
        assert_eq!(document.get_str("name").unwrap(), "a");
    }

    #[test]
    fn later_assignment_wins() {
        let mut document = doc! {};

        Update::new()
            .set("n", 1)
            .set("n", 2)
            .apply_to(&mut document);

        assert_eq!(document.get_i32("n").unwrap(), 2);
    }
}
