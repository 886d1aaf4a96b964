use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::store::{
    append_to_arrays, merge_top_level, Collection, DocumentStore, StoredDocument,
};

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryStore {
    documents: RwLock<HashMap<(Collection, String), Value>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn created_at(doc: &StoredDocument) -> &str {
    doc.data
        .get("createdAt")
        .and_then(Value::as_str)
        .unwrap_or_default()
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<StoredDocument>, AppError> {
        let documents = self.documents.read().await;
        Ok(documents
            .get(&(collection, id.to_string()))
            .map(|data| StoredDocument {
                id: id.to_string(),
                data: data.clone(),
            }))
    }

    async fn put(&self, collection: Collection, id: &str, data: Value) -> Result<(), AppError> {
        self.documents
            .write()
            .await
            .insert((collection, id.to_string()), data);
        Ok(())
    }

    async fn merge(
        &self,
        collection: Collection,
        id: &str,
        patch: Value,
    ) -> Result<(), AppError> {
        let mut documents = self.documents.write().await;
        let entry = documents
            .entry((collection, id.to_string()))
            .or_insert_with(|| Value::Object(Default::default()));
        merge_top_level(entry, patch);
        Ok(())
    }

    async fn append(
        &self,
        collection: Collection,
        id: &str,
        items: &[(&str, Value)],
    ) -> Result<Option<StoredDocument>, AppError> {
        // Read and write under one write guard.
        let mut documents = self.documents.write().await;
        Ok(documents
            .get_mut(&(collection, id.to_string()))
            .map(|data| {
                append_to_arrays(data, items);
                StoredDocument {
                    id: id.to_string(),
                    data: data.clone(),
                }
            }))
    }

    async fn list_by_owner(
        &self,
        collection: Collection,
        owner: &str,
    ) -> Result<Vec<StoredDocument>, AppError> {
        let documents = self.documents.read().await;
        let mut owned: Vec<StoredDocument> = documents
            .iter()
            .filter(|((c, _), _)| *c == collection)
            .map(|((_, id), data)| StoredDocument {
                id: id.clone(),
                data: data.clone(),
            })
            .filter(|doc| doc.is_owned_by(owner))
            .collect();
        owned.sort_by(|a, b| created_at(b).cmp(created_at(a)));
        Ok(owned)
    }
}
