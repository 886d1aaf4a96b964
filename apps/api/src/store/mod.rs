//! Document store: keyed JSON documents grouped into collections.
//!
//! Documents that belong to a user carry a top-level `userId` field; every
//! owner check in the handlers goes through `StoredDocument::is_owned_by`.
//! Two backends:
//! - `InMemoryStore` (default; used by tests)
//! - `PgDocumentStore` (JSONB rows, selected when `DATABASE_URL` is set)

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::errors::AppError;

pub use memory::InMemoryStore;
pub use postgres::PgDocumentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Interviews,
    Attempts,
    ResumeAnalyses,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Interviews => "interviews",
            Collection::Attempts => "attempts",
            Collection::ResumeAnalyses => "resume_analyses",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: Value,
}

impl StoredDocument {
    pub fn owner(&self) -> Option<&str> {
        self.data.get("userId").and_then(Value::as_str)
    }

    pub fn is_owned_by(&self, uid: &str) -> bool {
        self.owner() == Some(uid)
    }

    /// The document body with its key added as `id`.
    pub fn into_json_with_id(self) -> Value {
        let mut data = self.data;
        if let Value::Object(map) = &mut data {
            map.insert("id".to_string(), Value::String(self.id));
        }
        data
    }
}

/// Storage backend trait. Carried in `AppState` as `Arc<dyn DocumentStore>`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: Collection, id: &str)
        -> Result<Option<StoredDocument>, AppError>;

    /// Creates or fully replaces a document.
    async fn put(&self, collection: Collection, id: &str, data: Value) -> Result<(), AppError>;

    /// Overwrites the top-level keys present in `patch`, creating the
    /// document when it does not exist.
    async fn merge(&self, collection: Collection, id: &str, patch: Value)
        -> Result<(), AppError>;

    /// Pushes one element onto each named array field (created when missing)
    /// as a single atomic update. Returns the updated document, or `None`
    /// when it does not exist.
    async fn append(
        &self,
        collection: Collection,
        id: &str,
        items: &[(&str, Value)],
    ) -> Result<Option<StoredDocument>, AppError>;

    /// Documents whose `userId` equals `owner`, newest `createdAt` first.
    async fn list_by_owner(
        &self,
        collection: Collection,
        owner: &str,
    ) -> Result<Vec<StoredDocument>, AppError>;
}

/// `createdAt` value for stored documents. Fixed precision keeps the strings
/// ordered the same way as the instants they encode.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Shallow merge used by backends that merge in process.
pub(crate) fn merge_top_level(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(existing), Value::Object(patch)) => {
            for (key, value) in patch {
                existing.insert(key, value);
            }
        }
        (target, patch) => *target = patch,
    }
}

/// In-process form of `DocumentStore::append`.
pub(crate) fn append_to_arrays(target: &mut Value, items: &[(&str, Value)]) {
    let Value::Object(map) = target else {
        return;
    };
    for (key, item) in items {
        let slot = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        match slot {
            Value::Array(values) => values.push(item.clone()),
            other => *other = Value::Array(vec![item.clone()]),
        }
    }
}

/// Drops null-valued top-level keys.
pub fn non_null_fields(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_json_with_id_adds_key() {
        let doc = StoredDocument {
            id: "abc".into(),
            data: json!({ "userId": "u1", "role": "dev" }),
        };
        assert!(doc.is_owned_by("u1"));
        assert!(!doc.is_owned_by("u2"));
        assert_eq!(
            doc.into_json_with_id(),
            json!({ "userId": "u1", "role": "dev", "id": "abc" })
        );
    }

    #[test]
    fn test_timestamps_sort_chronologically() {
        use chrono::TimeZone;
        let whole = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let later = whole + chrono::Duration::milliseconds(500);
        assert_eq!(timestamp(whole), "2024-01-01T00:00:00.000000Z");
        assert!(timestamp(later) > timestamp(whole));
    }

    #[test]
    fn test_merge_top_level_overwrites_only_present_keys() {
        let mut target = json!({ "name": "Ada", "role": "dev" });
        merge_top_level(&mut target, json!({ "role": "lead", "about": "hi" }));
        assert_eq!(target, json!({ "name": "Ada", "role": "lead", "about": "hi" }));
    }

    #[test]
    fn test_append_to_arrays_creates_and_extends() {
        let mut doc = json!({ "scores": [70], "role": "dev" });
        append_to_arrays(&mut doc, &[("scores", json!(72)), ("questionsAsked", json!("Q"))]);
        assert_eq!(
            doc,
            json!({ "scores": [70, 72], "role": "dev", "questionsAsked": ["Q"] })
        );
    }

    #[test]
    fn test_non_null_fields_drops_nulls() {
        let cleaned = non_null_fields(json!({ "name": "Ada", "role": null }));
        assert_eq!(cleaned, json!({ "name": "Ada" }));
    }
}
