//! End-to-end behavior of the soft-delete plugin over the in-memory backend.

mod common;

use bson::{Bson, Uuid, doc};
use common::{Note, bodies, note, raw_get, raw_insert, seed_scenario, store};
use doclife::prelude::*;

#[tokio::test]
async fn absent_and_null_markers_are_live_numeric_is_deleted() {
    let store = store();
    seed_scenario(&store).await;
    let notes = store.collection::<Note>();

    // Default read: absent + null, never numeric.
    let live = notes.find(Query::new()).await.unwrap();
    assert_eq!(bodies(&live), vec!["absent", "null"]);

    // Only-deleted: exactly the numeric marker.
    let deleted = notes
        .find_with(Query::new(), ReadIntent::new().only_deleted())
        .await
        .unwrap();
    assert_eq!(bodies(&deleted), vec!["numeric"]);

    // With-deleted: everything, no predicate at all.
    let all = notes
        .find_with(Query::new(), ReadIntent::new().with_deleted())
        .await
        .unwrap();
    assert_eq!(bodies(&all), vec!["absent", "null", "numeric"]);
}

#[tokio::test]
async fn soft_deleted_documents_drop_out_of_every_default_read() {
    let store = store();
    let notes = store.collection::<Note>();

    let mut target = note("gone");
    notes
        .insert(vec![target.clone(), note("kept")])
        .await
        .unwrap();
    notes.soft_delete(&mut target).await.unwrap();

    assert_eq!(notes.count(None).await.unwrap(), 1);
    assert!(
        notes
            .find_one(Some(Filter::eq("body", "gone")))
            .await
            .unwrap()
            .is_none()
    );
    assert!(!notes.exists(Some(Filter::eq("body", "gone"))).await.unwrap());

    let distinct = notes.distinct("body", None).await.unwrap();
    assert_eq!(distinct, vec![Bson::String("kept".to_string())]);
}

#[tokio::test]
async fn restore_makes_the_document_visible_again() {
    let store = store();
    let notes = store.collection::<Note>();

    let mut target = note("back");
    notes.insert(vec![target.clone()]).await.unwrap();

    notes.soft_delete(&mut target).await.unwrap();
    assert_eq!(notes.count(None).await.unwrap(), 0);

    notes.restore(&mut target).await.unwrap();
    assert_eq!(notes.count(None).await.unwrap(), 1);

    // The marker is present-but-null after a restore, not absent.
    let raw = raw_get(&store, target.id).await;
    assert!(raw.contains_key("deletedAt"));
    assert_eq!(raw.get("deletedAt"), Some(&Bson::Null));
}

#[tokio::test]
async fn only_deleted_wins_when_both_intents_are_requested() {
    let store = store();
    seed_scenario(&store).await;
    let notes = store.collection::<Note>();

    let both = notes
        .find_with(
            Query::new(),
            ReadIntent::new().with_deleted().only_deleted(),
        )
        .await
        .unwrap();
    let only = notes
        .find_with(Query::new(), ReadIntent::new().only_deleted())
        .await
        .unwrap();

    assert_eq!(bodies(&both), bodies(&only));
}

#[tokio::test]
async fn caller_filter_composes_with_the_deletion_guard() {
    let store = store();
    let notes = store.collection::<Note>();

    let mut deleted_active = note("deleted-active");
    notes
        .insert(vec![note("live-active"), deleted_active.clone()])
        .await
        .unwrap();
    raw_insert(&store, Uuid::new(), doc! { "body": "live-other" }).await;
    notes.soft_delete(&mut deleted_active).await.unwrap();

    // Both sides of the AND must hold: the caller's filter and liveness.
    let results = notes
        .find(
            Query::builder()
                .filter(Filter::eq("body", "live-active"))
                .build(),
        )
        .await
        .unwrap();
    assert_eq!(bodies(&results), vec!["live-active"]);

    let results = notes
        .find(
            Query::builder()
                .filter(Filter::eq("body", "deleted-active"))
                .build(),
        )
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn caller_filter_on_the_marker_field_does_not_displace_the_guard() {
    let store = store();
    seed_scenario(&store).await;
    let notes = store.collection::<Note>();

    // The caller asks for a numeric marker while the default guard demands
    // liveness; AND-composition makes that unsatisfiable rather than letting
    // either side win.
    let results = notes
        .find(
            Query::builder()
                .filter(Filter::eq("deletedAt", 1_700_000_000i64))
                .build(),
        )
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn aggregation_matches_find_under_the_default_intent() {
    let store = store();
    seed_scenario(&store).await;
    let notes = store.collection::<Note>();

    let found = notes.find(Query::new()).await.unwrap();
    let aggregated = notes.aggregate(Pipeline::new()).await.unwrap();

    let mut aggregated_bodies = aggregated
        .iter()
        .map(|doc| {
            doc.as_document()
                .unwrap()
                .get_str("body")
                .unwrap()
                .to_string()
        })
        .collect::<Vec<_>>();
    aggregated_bodies.sort();

    assert_eq!(aggregated_bodies, bodies(&found));
}

#[tokio::test]
async fn aggregation_guard_runs_before_later_stages() {
    let store = store();
    seed_scenario(&store).await;
    let notes = store.collection::<Note>();

    // Limit(2) after the injected guard: both results must be live. If the
    // guard ran after the limit, the numeric-marker document could consume a
    // slot and then vanish.
    let results = notes
        .aggregate(Pipeline::new().sort("body", SortDirection::Asc).limit(2))
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    for doc in &results {
        let marker = doc.as_document().unwrap().get("deletedAt");
        assert!(matches!(marker, None | Some(Bson::Null)));
    }
}

#[tokio::test]
async fn bulk_soft_delete_is_unguarded_and_idempotent() {
    let store = store();
    let notes = store.collection::<Note>();
    notes
        .insert(vec![note("x"), note("y"), note("z")])
        .await
        .unwrap();

    let first = notes.soft_delete_where(None).await.unwrap();
    assert_eq!(first, 3);

    let markers_after_first = marker_values(&notes).await;
    assert_eq!(markers_after_first.len(), 3);

    // Second pass re-stamps the already-deleted documents: no guard filters
    // them out of the target selection.
    let second = notes.soft_delete_where(None).await.unwrap();
    assert_eq!(second, 3);

    let markers_after_second = marker_values(&notes).await;
    let stamp = markers_after_second[0];
    assert!(markers_after_second.iter().all(|m| *m == stamp));
    assert!(stamp >= markers_after_first[0]);

    assert_eq!(notes.count(None).await.unwrap(), 0);
}

#[tokio::test]
async fn bulk_restore_revives_by_filter() {
    let store = store();
    let notes = store.collection::<Note>();
    notes.insert(vec![note("a"), note("b")]).await.unwrap();

    notes.soft_delete_where(None).await.unwrap();
    assert_eq!(notes.count(None).await.unwrap(), 0);

    let restored = notes
        .restore_where(Some(Filter::eq("body", "a")))
        .await
        .unwrap();
    assert_eq!(restored, 1);

    let live = notes.find(Query::new()).await.unwrap();
    assert_eq!(bodies(&live), vec!["a"]);
}

#[tokio::test]
async fn corrupt_marker_is_visible_in_neither_view() {
    let store = store();
    let notes = store.collection::<Note>();

    raw_insert(&store, Uuid::new(), doc! { "body": "fine" }).await;
    // Non-numeric markers satisfy neither "absent or null" nor "numeric".
    raw_insert(
        &store,
        Uuid::new(),
        doc! { "body": "corrupt", "deletedAt": "oops" },
    )
    .await;
    raw_insert(
        &store,
        Uuid::new(),
        doc! { "body": "listy", "deletedAt": [1] },
    )
    .await;

    let live = notes.find(Query::new()).await.unwrap();
    assert_eq!(bodies(&live), vec!["fine"]);

    let deleted = notes
        .find_with(Query::new(), ReadIntent::new().only_deleted())
        .await
        .unwrap();
    assert!(deleted.is_empty());

    // Only the unfiltered view reaches them; the corrupt markers read as
    // unset rather than failing the typed decode.
    let all = notes
        .find_with(Query::new(), ReadIntent::new().with_deleted())
        .await
        .unwrap();
    assert_eq!(bodies(&all), vec!["corrupt", "fine", "listy"]);
    let recovered = all.iter().find(|note| note.body == "corrupt").unwrap();
    assert!(recovered.deleted_at.is_none());
}

#[tokio::test]
async fn guarded_updates_skip_deleted_documents_by_default() {
    let store = store();
    let notes = store.collection::<Note>();

    let mut deleted = note("deleted");
    notes
        .insert(vec![note("live"), deleted.clone()])
        .await
        .unwrap();
    notes.soft_delete(&mut deleted).await.unwrap();

    let touched = notes
        .update_many(None, Update::new().set("body", "renamed"))
        .await
        .unwrap();
    assert_eq!(touched, 1);

    // The deleted document keeps its body unless the caller opts in.
    let touched = notes
        .update_many_with(
            None,
            Update::new().set("body", "renamed"),
            ReadIntent::new().only_deleted(),
        )
        .await
        .unwrap();
    assert_eq!(touched, 1);
}

#[tokio::test]
async fn find_one_and_update_returns_the_pre_image() {
    let store = store();
    let notes = store.collection::<Note>();
    notes.insert(vec![note("before")]).await.unwrap();

    let previous = notes
        .find_one_and_update(
            Some(Filter::eq("body", "before")),
            Update::new().set("body", "after"),
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(previous.body, "before");

    let current = notes.find_one(None).await.unwrap().unwrap();
    assert_eq!(current.body, "after");
}

#[tokio::test]
async fn find_one_and_delete_removes_physically() {
    let store = store();
    let notes = store.collection::<Note>();
    notes.insert(vec![note("doomed")]).await.unwrap();

    let removed = notes
        .find_one_and_delete(Some(Filter::eq("body", "doomed")))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(removed.body, "doomed");

    // Gone from every view, including the unfiltered one.
    let all = notes
        .find_with(Query::new(), ReadIntent::new().with_deleted())
        .await
        .unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn custom_marker_field_and_default_visibility() {
    let store = LifecycleStore::builder(doclife::memory::InMemoryStore::new())
        .soft_delete(
            SoftDeleteConfig::with_field("deletedAt")
                .default_visibility(DeletedVisibility::Include),
        )
        .build();
    seed_scenario(&store).await;
    let notes = store.collection::<Note>();

    // Include-by-default: no predicate without an explicit intent.
    let all = notes.find(Query::new()).await.unwrap();
    assert_eq!(all.len(), 3);

    // An explicit only-intent still wins over the configured default.
    let deleted = notes
        .find_with(Query::new(), ReadIntent::new().only_deleted())
        .await
        .unwrap();
    assert_eq!(bodies(&deleted), vec!["numeric"]);
}

#[tokio::test]
async fn disabled_plugin_refuses_bulk_mutation_and_stops_filtering() {
    let store = LifecycleStore::builder(doclife::memory::InMemoryStore::new())
        .without_soft_delete()
        .build();
    seed_scenario(&store).await;
    let notes = store.collection::<Note>();

    // No guard: the numeric-marker document is an ordinary document now.
    assert_eq!(notes.count(None).await.unwrap(), 3);

    let result = notes.soft_delete_where(None).await;
    assert!(matches!(result, Err(LifecycleError::PluginDisabled(_))));
    let result = notes.restore_where(None).await;
    assert!(matches!(result, Err(LifecycleError::PluginDisabled(_))));
}

async fn marker_values(
    notes: &Collection<'_, doclife::memory::InMemoryStore, Note>,
) -> Vec<i64> {
    notes
        .find_with(Query::new(), ReadIntent::new().only_deleted())
        .await
        .unwrap()
        .iter()
        .map(|note| note.deleted_at.unwrap())
        .collect()
}
