#![allow(dead_code)]

use bson::{Bson, Uuid, doc};
use serde::{Deserialize, Serialize};

use doclife::memory::InMemoryStore;
use doclife::prelude::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub body: String,
    // A stored marker is not guaranteed to be well-formed; reading leniently
    // lets the include-all view surface documents with a corrupt marker.
    #[serde(
        rename = "deletedAt",
        deserialize_with = "doclife::soft_delete::lenient_marker",
        default
    )]
    pub deleted_at: Option<i64>,
}

impl Document for Note {
    fn id(&self) -> &Uuid {
        &self.id
    }

    fn collection_name() -> &'static str {
        "notes"
    }
}

impl SoftDeletable for Note {
    fn deleted_at(&self) -> Option<i64> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, at: Option<i64>) {
        self.deleted_at = at;
    }
}

pub fn note(body: &str) -> Note {
    Note {
        id: Uuid::new(),
        body: body.to_string(),
        deleted_at: None,
    }
}

pub fn store() -> LifecycleStore<InMemoryStore> {
    LifecycleStore::new(InMemoryStore::new())
}

/// Inserts a raw document body, bypassing every plugin.
///
/// Used to seed documents whose marker field is genuinely absent, which a
/// typed insert cannot produce (a `None` marker serializes as explicit null).
pub async fn raw_insert(store: &LifecycleStore<InMemoryStore>, id: Uuid, body: bson::Document) {
    let mut body = body;
    body.insert("id", id);

    store
        .backend()
        .insert_documents(vec![(id, Bson::Document(body))], Note::collection_name())
        .await
        .unwrap();
}

/// Reads the raw stored body of one document, bypassing every plugin.
pub async fn raw_get(store: &LifecycleStore<InMemoryStore>, id: Uuid) -> bson::Document {
    store
        .backend()
        .get_documents(vec![id], Note::collection_name())
        .await
        .unwrap()
        .remove(0)
        .as_document()
        .unwrap()
        .clone()
}

pub fn bodies(notes: &[Note]) -> Vec<String> {
    let mut bodies = notes
        .iter()
        .map(|note| note.body.clone())
        .collect::<Vec<_>>();
    bodies.sort();
    bodies
}

/// Seeds the A/B/C scenario: marker absent, numeric, and explicit null.
pub async fn seed_scenario(store: &LifecycleStore<InMemoryStore>) {
    raw_insert(store, Uuid::new(), doc! { "body": "absent" }).await;
    raw_insert(
        store,
        Uuid::new(),
        doc! { "body": "numeric", "deletedAt": 1_700_000_000i64 },
    )
    .await;
    raw_insert(
        store,
        Uuid::new(),
        doc! { "body": "null", "deletedAt": Bson::Null },
    )
    .await;
}
