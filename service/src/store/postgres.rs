//! `PostgreSQL` document store.
//!
//! All collections share one table:
//!
//! ```sql
//! documents(collection TEXT, id TEXT, body JSONB, updated_at TIMESTAMPTZ)
//! ```
//!
//! Field filters compile to `body #> path = value` comparisons so nested
//! paths such as `external_ids.govtrack` work without per-field columns.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{postgres::PgRow, types::Json, PgPool, Postgres, QueryBuilder, Row};

use super::{DocumentStore, FieldFilter, StoreError, StoredDocument};

pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_document(row: &PgRow) -> Result<StoredDocument, StoreError> {
    let Json(body): Json<Value> = row.try_get("body")?;
    Ok(StoredDocument {
        id: row.try_get("id")?,
        body,
    })
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &[FieldFilter]) {
    for filter in filters {
        builder.push(" AND body #> ");
        builder.push_bind(filter.path().to_vec());
        builder.push(" = ");
        builder.push_bind(Json(filter.value().clone()));
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        let row = sqlx::query(
            r"
            SELECT id, body
            FROM documents
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(to_document).transpose()
    }

    async fn put(&self, collection: &str, id: &str, body: &Value) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO documents (collection, id, body, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (collection, id)
            DO UPDATE SET body = EXCLUDED.body, updated_at = now()
            ",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(body))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn merge(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r"
            UPDATE documents
            SET body = body || $3, updated_at = now()
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(fields))
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

    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT id, body FROM documents WHERE collection = ");
        builder.push_bind(collection);
        push_filters(&mut builder, filters);
        builder.push(" ORDER BY id");

        let rows = builder.build().fetch_all(&self.pool).await?;

        rows.iter().map(to_document).collect()
    }

    async fn delete_where(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<u64, StoreError> {
        let mut builder = QueryBuilder::<Postgres>::new("DELETE FROM documents WHERE collection = ");
        builder.push_bind(collection);
        push_filters(&mut builder, filters);

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
