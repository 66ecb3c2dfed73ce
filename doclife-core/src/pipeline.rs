//! Aggregation pipelines.
//!
//! A [`Pipeline`] is an ordered list of [`Stage`]s executed by the backend.
//! The soft-delete plugin injects its deletion predicate as a `Match` stage
//! at position zero, so that no later stage ever observes an excluded
//! document.

use crate::query::{Expr, Sort, SortDirection};

/// A single aggregation stage.
#[derive(Debug, Clone)]
pub enum Stage {
    /// Keep only documents matching the expression.
    Match(Expr),
    /// Order documents by a field.
    Sort(Sort),
    /// Skip the first N documents.
    Skip(usize),
    /// Keep at most N documents.
    Limit(usize),
}

/// An ordered aggregation pipeline.
///
/// # Example
///
/// ```ignore
/// use doclife::pipeline::Pipeline;
/// use doclife::query::{Filter, SortDirection};
///
/// let pipeline = Pipeline::new()
///     .match_stage(Filter::eq("status", "active"))
///     .sort("createdAt", SortDirection::Desc)
///     .limit(10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    /// The stages, executed in order.
    pub stages: Vec<Stage>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Pipeline::default()
    }

    /// Appends a match stage.
    pub fn match_stage(mut self, expr: Expr) -> Self {
        self.stages.push(Stage::Match(expr));
        self
    }

    /// Appends a sort stage.
    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.stages
            .push(Stage::Sort(Sort { field: field.into(), direction }));
        self
    }

    /// Appends a skip stage.
    pub fn skip(mut self, count: usize) -> Self {
        self.stages.push(Stage::Skip(count));
        self
    }

    /// Appends a limit stage.
    pub fn limit(mut self, count: usize) -> Self {
        self.stages.push(Stage::Limit(count));
        self
    }

    /// Inserts a match stage at the front of the pipeline.
    ///
    /// First-position insertion guarantees every subsequent stage operates on
    /// the already-filtered document set.
    pub fn prepend_match(&mut self, expr: Expr) {
        self.stages.insert(0, Stage::Match(expr));
    }
}
