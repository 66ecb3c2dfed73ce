//! Output projection for serialized documents.
//!
//! Rewrites one outgoing representation of a document: the internal
//! identifier key is renamed to its public name and the internal version
//! counter key is removed. The projection never touches nested documents and
//! never clobbers an already-present public key.

use bson::Bson;
use serde_json::Value;

/// Configuration of the identity projection.
#[derive(Debug, Clone)]
pub struct Projection {
    /// Key the store uses for the document identifier.
    pub internal_id: String,
    /// Key the identifier is exposed under.
    pub public_id: String,
    /// Internal version-counter key, stripped from output.
    pub version_field: String,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            internal_id: "_id".to_string(),
            public_id: "id".to_string(),
            version_field: "__v".to_string(),
        }
    }
}

impl Projection {
    /// Projects a JSON object in place; non-objects are returned unchanged.
    pub fn project_json(&self, mut value: Value) -> Value {
        if let Value::Object(map) = &mut value {
            map.remove(&self.version_field);

            if let Some(id) = map.remove(&self.internal_id) {
                map.entry(self.public_id.clone()).or_insert(id);
            }
        }

        value
    }

    /// Projects a BSON document in place; non-documents are returned unchanged.
    pub fn project_bson(&self, mut value: Bson) -> Bson {
        if let Some(document) = value.as_document_mut() {
            document.remove(&self.version_field);

            if let Some(id) = document.remove(&self.internal_id) {
                if !document.contains_key(&self.public_id) {
                    document.insert(self.public_id.clone(), id);
                }
            }
        }

        value
    }
}
