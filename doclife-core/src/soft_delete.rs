//! The soft-delete filter engine.
//!
//! Given an outgoing read/write operation, the engine decides whether and how
//! to inject a deletion-status predicate before the operation executes, and
//! exposes the per-call escape hatches ([`ReadIntent`]) that let a caller
//! include or restrict to soft-deleted documents.
//!
//! Liveness is determined entirely by the deletion-marker field: absent or
//! null means live, a numeric value means deleted. A marker holding any other
//! value matches neither predicate and is therefore visible in no view; that
//! gap is deliberate and must not be "fixed" silently, since changing it
//! would alter which documents default reads return.

use serde::{Deserialize, Deserializer};

use crate::{
    pipeline::Pipeline,
    query::{Expr, Filter, Query, ValueKind},
};

/// Default name of the deletion-marker field.
pub const DEFAULT_DELETED_FIELD: &str = "deletedAt";

/// Deserializes a deletion marker, treating any non-numeric stored value as
/// unset.
///
/// Stored documents are not guaranteed to hold a well-formed marker; a strict
/// `Option<i64>` field would make one corrupt document fail an entire typed
/// read, so include-all views could never surface it. Annotate the marker
/// field with this helper to read such documents anyway:
///
/// ```ignore
/// #[serde(rename = "deletedAt", deserialize_with = "lenient_marker", default)]
/// pub deleted_at: Option<i64>,
/// ```
///
/// Integer and floating-point markers map to `Some` (floats truncated);
/// null, absence, and anything else map to `None`. Pair it with the `default`
/// attribute so an absent field also reads as `None`.
pub fn lenient_marker<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match bson::Bson::deserialize(deserializer)? {
        bson::Bson::Int32(at) => Some(at as i64),
        bson::Bson::Int64(at) => Some(at),
        bson::Bson::Double(at) => Some(at as i64),
        _ => None,
    })
}

/// What a read operation does with soft-deleted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletedVisibility {
    /// Filter soft-deleted documents out (the default).
    #[default]
    Exclude,
    /// Apply no deletion predicate at all.
    Include,
    /// Return only soft-deleted documents.
    Only,
}

/// Per-call visibility opt-ins, attached to exactly one operation.
///
/// Both facets default to false; the intent is constructed at the call site,
/// consumed once by the filter-injection step, and never shared between
/// operations. Requesting both facets resolves to "only deleted" — the
/// stricter mode wins.
///
/// # Example
///
/// ```ignore
/// use doclife::soft_delete::ReadIntent;
///
/// let everything = ReadIntent::new().with_deleted();
/// let trash_only = ReadIntent::new().only_deleted();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadIntent {
    /// Include soft-deleted documents alongside live ones.
    pub include_deleted: bool,
    /// Restrict results to soft-deleted documents.
    pub only_deleted: bool,
}

impl ReadIntent {
    /// Creates a default intent (soft-deleted documents excluded).
    pub fn new() -> Self {
        ReadIntent::default()
    }

    /// Requests that soft-deleted documents be included.
    pub fn with_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    /// Requests that only soft-deleted documents be returned.
    pub fn only_deleted(mut self) -> Self {
        self.only_deleted = true;
        self
    }
}

/// Configuration of one soft-delete engine.
///
/// An explicit value captured by the collections of a store; multiple stores
/// with differently configured engines can coexist in one process. Read-only
/// after setup.
#[derive(Debug, Clone)]
pub struct SoftDeleteConfig {
    /// Name of the deletion-marker field.
    pub field: String,
    /// Visibility applied when the caller expresses no intent.
    pub default_visibility: DeletedVisibility,
}

impl Default for SoftDeleteConfig {
    fn default() -> Self {
        Self {
            field: DEFAULT_DELETED_FIELD.to_string(),
            default_visibility: DeletedVisibility::Exclude,
        }
    }
}

impl SoftDeleteConfig {
    /// Creates a configuration with a custom marker field name.
    pub fn with_field(field: impl Into<String>) -> Self {
        Self { field: field.into(), ..Self::default() }
    }

    /// Sets the visibility applied when the caller expresses no intent.
    pub fn default_visibility(mut self, visibility: DeletedVisibility) -> Self {
        self.default_visibility = visibility;
        self
    }

    /// Predicate matching live documents: marker absent or null.
    ///
    /// A marker explicitly reset to null by a restore still matches, as does
    /// a document that never carried the field.
    pub fn not_deleted(&self) -> Expr {
        Filter::not_exists(&self.field).or(Filter::eq(&self.field, bson::Bson::Null))
    }

    /// Predicate matching soft-deleted documents: marker present and numeric.
    ///
    /// The type check guards against stray non-numeric values being treated
    /// as deletion markers.
    pub fn is_deleted(&self) -> Expr {
        Filter::of_type(&self.field, ValueKind::Number)
    }

    /// Resolves the effective visibility for one operation.
    ///
    /// "Only" wins over "include" when both are requested, whether through
    /// the intent or through the configured default.
    pub fn resolve(&self, intent: &ReadIntent) -> DeletedVisibility {
        let only = intent.only_deleted || self.default_visibility == DeletedVisibility::Only;
        let include =
            intent.include_deleted || self.default_visibility == DeletedVisibility::Include;

        if only {
            DeletedVisibility::Only
        } else if include {
            DeletedVisibility::Include
        } else {
            DeletedVisibility::Exclude
        }
    }

    /// The deletion predicate to inject for one operation, if any.
    pub fn predicate(&self, intent: &ReadIntent) -> Option<Expr> {
        match self.resolve(intent) {
            DeletedVisibility::Only => Some(self.is_deleted()),
            DeletedVisibility::Include => None,
            DeletedVisibility::Exclude => Some(self.not_deleted()),
        }
    }

    /// Merges the deletion predicate into a caller-supplied filter.
    ///
    /// An empty caller filter (absent, or carrying zero conditions) is
    /// replaced by the predicate outright; otherwise the result is a logical
    /// AND of both sides. The two are never merged key-wise, so a caller
    /// already filtering on the marker field cannot overwrite the predicate
    /// (nor vice versa).
    pub fn apply_to_filter(&self, current: Option<Expr>, intent: &ReadIntent) -> Option<Expr> {
        let Some(condition) = self.predicate(intent) else {
            return current;
        };

        match current {
            Some(expr) if !expr.is_empty() => Some(expr.and(condition)),
            _ => Some(condition),
        }
    }

    /// Applies the injection policy to a full query.
    pub fn apply_to_query(&self, mut query: Query, intent: &ReadIntent) -> Query {
        query.filter = self.apply_to_filter(query.filter, intent);
        query
    }

    /// Applies the injection policy to an aggregation pipeline.
    ///
    /// When a predicate is required it becomes the first stage, so later
    /// stages never see excluded documents.
    pub fn apply_to_pipeline(&self, pipeline: &mut Pipeline, intent: &ReadIntent) {
        if let Some(condition) = self.predicate(intent) {
            pipeline.prepend_match(condition);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Stage;
    use crate::query::{FieldOp, SortDirection};

    fn config() -> SoftDeleteConfig {
        SoftDeleteConfig::default()
    }

    #[test]
    fn default_intent_excludes_deleted() {
        assert_eq!(
            config().resolve(&ReadIntent::new()),
            DeletedVisibility::Exclude
        );
    }

    #[test]
    fn with_deleted_passes_through_unfiltered() {
        let intent = ReadIntent::new().with_deleted();
        assert_eq!(config().resolve(&intent), DeletedVisibility::Include);
        assert!(config().predicate(&intent).is_none());
    }

    #[test]
    fn only_wins_over_include() {
        let intent = ReadIntent::new().with_deleted().only_deleted();
        assert_eq!(config().resolve(&intent), DeletedVisibility::Only);
    }

    #[test]
    fn default_visibility_feeds_resolution() {
        let cfg = config().default_visibility(DeletedVisibility::Include);
        assert_eq!(
            cfg.resolve(&ReadIntent::new()),
            DeletedVisibility::Include
        );

        // Only still wins even when the default says include.
        let cfg = config().default_visibility(DeletedVisibility::Include);
        assert_eq!(
            cfg.resolve(&ReadIntent::new().only_deleted()),
            DeletedVisibility::Only
        );

        let cfg = config().default_visibility(DeletedVisibility::Only);
        assert_eq!(cfg.resolve(&ReadIntent::new()), DeletedVisibility::Only);
    }

    #[test]
    fn not_deleted_matches_absent_or_null_only() {
        match config().not_deleted() {
            Expr::Or(arms) => {
                assert_eq!(arms.len(), 2);
                assert!(matches!(&arms[0], Expr::Exists(field, false) if field == "deletedAt"));
                assert!(matches!(
                    &arms[1],
                    Expr::Field { field, op: FieldOp::Eq, value: bson::Bson::Null }
                        if field == "deletedAt"
                ));
            }
            other => panic!("expected Or, got {:?}", other),
        }
    }

    #[test]
    fn is_deleted_is_a_numeric_type_check() {
        assert!(matches!(
            config().is_deleted(),
            Expr::Type { field, kind: ValueKind::Number } if field == "deletedAt"
        ));
    }

    #[test]
    fn empty_filter_becomes_the_predicate_exactly() {
        let cfg = config();
        let intent = ReadIntent::new();

        let injected = cfg.apply_to_filter(None, &intent).unwrap();
        assert!(matches!(injected, Expr::Or(_)));

        // Zero conditions counts as no filter, by condition count not identity.
        let injected = cfg
            .apply_to_filter(Some(Expr::And(vec![])), &intent)
            .unwrap();
        assert!(matches!(injected, Expr::Or(_)));
    }

    #[test]
    fn caller_filter_is_and_composed_never_overwritten() {
        let cfg = config();
        let current = Filter::eq("status", "active");

        let merged = cfg
            .apply_to_filter(Some(current), &ReadIntent::new())
            .unwrap();

        match merged {
            Expr::And(parts) => {
                assert_eq!(parts.len(), 2);
                assert!(matches!(&parts[0], Expr::Field { field, .. } if field == "status"));
                assert!(matches!(&parts[1], Expr::Or(_)));
            }
            other => panic!("expected And, got {:?}", other),
        }
    }

    #[test]
    fn caller_filter_on_the_marker_field_keeps_both_sides() {
        let cfg = config();
        let current = Filter::eq("deletedAt", 42);

        let merged = cfg
            .apply_to_filter(Some(current), &ReadIntent::new())
            .unwrap();

        // Both the caller's condition and the injected predicate survive.
        match merged {
            Expr::And(parts) => assert_eq!(parts.len(), 2),
            other => panic!("expected And, got {:?}", other),
        }
    }

    #[test]
    fn pipeline_predicate_is_inserted_first() {
        let cfg = config();
        let mut pipeline = Pipeline::new()
            .sort("createdAt", SortDirection::Desc)
            .limit(3);

        cfg.apply_to_pipeline(&mut pipeline, &ReadIntent::new());

        assert!(matches!(&pipeline.stages[0], Stage::Match(Expr::Or(_))));
        assert_eq!(pipeline.stages.len(), 3);
    }

    #[test]
    fn pipeline_untouched_when_including_deleted() {
        let cfg = config();
        let mut pipeline = Pipeline::new().limit(3);

        cfg.apply_to_pipeline(&mut pipeline, &ReadIntent::new().with_deleted());

        assert_eq!(pipeline.stages.len(), 1);
    }

    #[test]
    fn lenient_marker_reads_corrupt_values_as_unset() {
        #[derive(Debug, serde::Deserialize)]
        struct Flagged {
            #[serde(rename = "deletedAt", deserialize_with = "lenient_marker", default)]
            deleted_at: Option<i64>,
        }

        let cases = [
            (bson::doc! { "deletedAt": 1_700_000_000i64 }, Some(1_700_000_000)),
            (bson::doc! { "deletedAt": bson::Bson::Null }, None),
            (bson::doc! { "deletedAt": "oops" }, None),
            (bson::doc! { "deletedAt": [1, 2] }, None),
            (bson::doc! {}, None),
        ];

        for (raw, expected) in cases {
            let flagged: Flagged =
                bson::de::deserialize_from_bson(bson::Bson::Document(raw)).unwrap();
            assert_eq!(flagged.deleted_at, expected);
        }
    }

    #[test]
    fn custom_field_name_flows_into_predicates() {
        let cfg = SoftDeleteConfig::with_field("removedAt");
        assert!(matches!(
            cfg.is_deleted(),
            Expr::Type { field, .. } if field == "removedAt"
        ));
    }
}
