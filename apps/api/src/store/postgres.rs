use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::store::{Collection, DocumentStore, StoredDocument};

/// JSONB-backed store. One row per `(collection, id)` in the `documents` table
/// created by `db::ensure_schema`.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<StoredDocument>, AppError> {
        let row: Option<(String, Value)> =
            sqlx::query_as("SELECT id, data FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection.as_str())
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(id, data)| StoredDocument { id, data }))
    }

    async fn put(&self, collection: Collection, id: &str, data: Value) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE SET data = EXCLUDED.data
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn merge(
        &self,
        collection: Collection,
        id: &str,
        patch: Value,
    ) -> Result<(), AppError> {
        // `||` on jsonb replaces top-level keys only
        sqlx::query(
            r#"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (collection, id) DO UPDATE SET data = documents.data || EXCLUDED.data
            "#,
        )
        .bind(collection.as_str())
        .bind(id)
        .bind(patch)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn append(
        &self,
        collection: Collection,
        id: &str,
        items: &[(&str, Value)],
    ) -> Result<Option<StoredDocument>, AppError> {
        // The first UPDATE takes the row lock; concurrent appends queue behind it.
        let mut tx = self.pool.begin().await?;
        for (key, item) in items {
            sqlx::query(
                r#"
                UPDATE documents
                SET data = jsonb_set(data, ARRAY[$3], COALESCE(data->$3, '[]'::jsonb) || $4)
                WHERE collection = $1 AND id = $2
                "#,
            )
            .bind(collection.as_str())
            .bind(id)
            .bind(*key)
            .bind(Value::Array(vec![item.clone()]))
            .execute(&mut *tx)
            .await?;
        }

        let row: Option<(String, Value)> =
            sqlx::query_as("SELECT id, data FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection.as_str())
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        tx.commit().await?;

        Ok(row.map(|(id, data)| StoredDocument { id, data }))
    }

    async fn list_by_owner(
        &self,
        collection: Collection,
        owner: &str,
    ) -> Result<Vec<StoredDocument>, AppError> {
        let rows: Vec<(String, Value)> = sqlx::query_as(
            r#"
            SELECT id, data FROM documents
            WHERE collection = $1 AND data->>'userId' = $2
            ORDER BY data->>'createdAt' DESC
            "#,
        )
        .bind(collection.as_str())
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, data)| StoredDocument { id, data })
            .collect())
    }
}
