//! BSON key escaping for MongoDB compatibility.
//!
//! MongoDB restricts document keys from containing dots, dollar signs, and
//! null bytes, all of which are meaningful in its query syntax. Stored
//! documents get those characters escaped on the way in and unescaped on the
//! way out; the escaping is reversible and applies to keys and string values
//! recursively.

use bson::Bson;

const REPLACEMENTS: [(&str, &str); 3] = [
    (".", "__dot__"),
    ("$", "__dollar__"),
    ("\0", "__null__"),
];

/// Escapes problematic characters in a key or string value.
pub(crate) fn escape(input: &str) -> String {
    let mut escaped = input.to_string();
    for (target, replacement) in REPLACEMENTS.iter() {
        escaped = escaped.replace(*target, *replacement);
    }
    escaped
}

/// Reverts [`escape`].
pub(crate) fn unescape(input: &str) -> String {
    let mut restored = input.to_string();
    for (target, replacement) in REPLACEMENTS.iter().rev() {
        restored = restored.replace(*replacement, *target);
    }
    restored
}

/// Recursively escapes keys and string values of a BSON value.
pub(crate) fn escape_value(value: &Bson) -> Bson {
    match value {
        Bson::String(s) => Bson::String(escape(s)),
        Bson::Array(arr) => Bson::Array(arr.iter().map(escape_value).collect()),
        Bson::Document(doc) => Bson::Document(
            doc.iter()
                .map(|(k, v)| (escape(k), escape_value(v)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

/// Recursively reverts [`escape_value`] on a value read back from MongoDB.
pub(crate) fn unescape_value(value: &Bson) -> Bson {
    match value {
        Bson::String(s) => Bson::String(unescape(s)),
        Bson::Array(arr) => Bson::Array(arr.iter().map(unescape_value).collect()),
        Bson::Document(doc) => Bson::Document(
            doc.iter()
                .map(|(k, v)| (unescape(k), unescape_value(v)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn escaping_round_trips() {
        let original = Bson::Document(doc! {
            "a.b": "c$d",
            "nested": { "$set": ["x.y", 1] },
        });

        let escaped = escape_value(&original);
        let document = escaped.as_document().unwrap();
        assert!(document.contains_key("a__dot__b"));
        assert!(!document.contains_key("a.b"));

        assert_eq!(unescape_value(&escaped), original);
    }
}
