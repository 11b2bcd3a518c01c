// src/store/postgres.rs

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, types::Json};

use super::{Document, DocumentStore, Fields, Filter, StoreError, new_document_id};

/// Document store on a single Postgres JSONB table (see `migrations/`).
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Helper struct for reading a document row.
#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Value>,
}

impl DocumentRow {
    fn into_document(self, collection: &str) -> Result<Document, StoreError> {
        match self.data.0 {
            Value::Object(data) => Ok(Document { id: self.id, data }),
            other => Err(StoreError::Decode {
                collection: collection.to_string(),
                id: self.id,
                reason: format!("expected an object, found {}", other),
            }),
        }
    }
}

fn into_documents(rows: Vec<DocumentRow>, collection: &str) -> Result<Vec<Document>, StoreError> {
    rows.into_iter().map(|r| r.into_document(collection)).collect()
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data
            FROM documents
            WHERE collection = $1
            ORDER BY seq
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        into_documents(rows, collection)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, data FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_document(collection)).transpose()
    }

    async fn add(&self, collection: &str, data: Fields) -> Result<String, StoreError> {
        let id = new_document_id();

        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Json(Value::Object(data)))
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, partial: Fields) -> Result<(), StoreError> {
        // `||` merges top-level keys, right side wins.
        let result = sqlx::query(
            "UPDATE documents SET data = data || $3 WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(Value::Object(partial)))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, data
            FROM documents
            WHERE collection = $1 AND data -> $2 = $3
            ORDER BY seq
            "#,
        )
        .bind(collection)
        .bind(&filter.field)
        .bind(Json(filter.value.clone()))
        .fetch_all(&self.pool)
        .await?;

        into_documents(rows, collection)
    }
}
