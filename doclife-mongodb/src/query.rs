//! Query translation from the doclife AST to MongoDB query syntax.
//!
//! This module translates doclife's abstract query expressions and
//! aggregation stages into MongoDB BSON documents for execution by the
//! MongoDB query engine.

use bson::{Bson, Document, doc};

use doclife_core::{
    error::LifecycleError,
    pipeline::{Pipeline, Stage},
    query::{Expr, FieldOp, QueryVisitor, SortDirection, ValueKind},
};

/// Translates doclife query expressions into MongoDB query documents.
///
/// This struct implements the [`QueryVisitor`] trait to convert abstract
/// query expressions into MongoDB's native BSON query syntax.
pub(crate) struct MongoQueryTranslator;

impl MongoQueryTranslator {
    /// Translates an optional filter; `None` or a filter with zero conditions
    /// becomes the match-everything document.
    pub(crate) fn filter_document(
        &mut self,
        filter: Option<&Expr>,
    ) -> Result<Document, LifecycleError> {
        match filter {
            Some(expr) if !expr.is_empty() => self.visit_expr(expr),
            _ => Ok(doc! {}),
        }
    }

    /// Translates an aggregation pipeline, stage by stage, in order.
    pub(crate) fn pipeline_documents(
        &mut self,
        pipeline: &Pipeline,
    ) -> Result<Vec<Document>, LifecycleError> {
        pipeline
            .stages
            .iter()
            .map(|stage| {
                Ok(match stage {
                    Stage::Match(expr) => doc! { "$match": self.visit_expr(expr)? },
                    Stage::Sort(sort) => doc! {
                        "$sort": {
                            sort.field.clone(): match sort.direction {
                                SortDirection::Asc => 1,
                                SortDirection::Desc => -1,
                            }
                        }
                    },
                    Stage::Skip(count) => doc! { "$skip": *count as i64 },
                    Stage::Limit(count) => doc! { "$limit": *count as i64 },
                })
            })
            .collect()
    }
}

impl QueryVisitor for MongoQueryTranslator {
    type Output = Document;
    type Error = LifecycleError;

    fn visit_and(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$and": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_or(&mut self, exprs: &[Expr]) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$or": exprs
                .iter()
                .map(|expr| self.visit_expr(expr))
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    fn visit_not(&mut self, expr: &Expr) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            "$not": self.visit_expr(expr)?,
        })
    }

    fn visit_exists(
        &mut self,
        field: &str,
        should_exist: bool,
    ) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: { "$exists": should_exist },
        })
    }

    fn visit_type(&mut self, field: &str, kind: &ValueKind) -> Result<Self::Output, Self::Error> {
        // "number" is the server-side alias covering every numeric BSON type.
        Ok(doc! {
            field: {
                "$type": match kind {
                    ValueKind::Number => "number",
                    ValueKind::String => "string",
                    ValueKind::Boolean => "bool",
                }
            }
        })
    }

    fn visit_field(
        &mut self,
        field: &str,
        op: &FieldOp,
        value: &Bson,
    ) -> Result<Self::Output, Self::Error> {
        Ok(doc! {
            field: match op {
                FieldOp::Eq => doc! { "$eq": value },
                FieldOp::Ne => doc! { "$ne": value },
                FieldOp::Gt => doc! { "$gt": value },
                FieldOp::Gte => doc! { "$gte": value },
                FieldOp::Lt => doc! { "$lt": value },
                FieldOp::Lte => doc! { "$lte": value },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doclife_core::query::Filter;

    #[test]
    fn deletion_guard_translates_to_exists_or_null() {
        let expr = Filter::not_exists("deletedAt").or(Filter::eq("deletedAt", Bson::Null));

        let translated = MongoQueryTranslator.visit_expr(&expr).unwrap();

        assert_eq!(
            translated,
            doc! {
                "$or": [
                    { "deletedAt": { "$exists": false } },
                    { "deletedAt": { "$eq": Bson::Null } },
                ]
            }
        );
    }

    #[test]
    fn numeric_type_check_uses_the_number_alias() {
        let expr = Filter::of_type("deletedAt", ValueKind::Number);

        let translated = MongoQueryTranslator.visit_expr(&expr).unwrap();

        assert_eq!(translated, doc! { "deletedAt": { "$type": "number" } });
    }

    #[test]
    fn empty_filter_translates_to_match_everything() {
        let translated = MongoQueryTranslator
            .filter_document(Some(&Expr::And(vec![])))
            .unwrap();
        assert_eq!(translated, doc! {});

        let translated = MongoQueryTranslator.filter_document(None).unwrap();
        assert_eq!(translated, doc! {});
    }

    #[test]
    fn pipeline_stages_keep_their_order() {
        let pipeline = Pipeline::new()
            .match_stage(Filter::eq("status", "active"))
            .sort("createdAt", SortDirection::Desc)
            .skip(5)
            .limit(10);

        let stages = MongoQueryTranslator
            .pipeline_documents(&pipeline)
            .unwrap();

        assert_eq!(stages.len(), 4);
        assert!(stages[0].contains_key("$match"));
        assert_eq!(stages[1], doc! { "$sort": { "createdAt": -1 } });
        assert_eq!(stages[2], doc! { "$skip": 5i64 });
        assert_eq!(stages[3], doc! { "$limit": 10i64 });
    }
}
