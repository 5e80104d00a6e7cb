//! PostgreSQL-backed record collection.
//!
//! Each record is one row of `records`: the id in its own column and the rest
//! of the document as JSONB. Partial updates merge with the `||` operator, so
//! keys outside the patch are left alone.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use store::{
    Collection, DeleteResult, Document, InsertOneResult, NewRecord, Record, RecordId,
    RecordPatch, StoreError, UpdateResult,
};
use uuid::Uuid;

/// Records stored in a PostgreSQL table.
#[derive(Clone, Debug)]
pub struct PgCollection {
    pool: PgPool,
}

impl PgCollection {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Collection for PgCollection {
    async fn find_all(&self) -> Result<Vec<Record>, StoreError> {
        let rows: Vec<(Uuid, Json<Document>)> =
            sqlx::query_as("SELECT id, document FROM records ORDER BY created_at")
                .fetch_all(&self.pool)
                .await
                .map_err(StoreError::backend)?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(document))| Record {
                id: id.into(),
                document,
            })
            .collect())
    }

    async fn insert_one(&self, record: NewRecord) -> Result<InsertOneResult, StoreError> {
        let id = RecordId::new();

        sqlx::query("INSERT INTO records (id, document) VALUES ($1, $2)")
            .bind(id.as_uuid())
            .bind(Json(record.into_document()))
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn delete_one(&self, id: RecordId) -> Result<DeleteResult, StoreError> {
        let result = sqlx::query("DELETE FROM records WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StoreError::backend)?;

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count: result.rows_affected(),
        })
    }

    async fn update_one(&self, id: RecordId, patch: RecordPatch) -> Result<UpdateResult, StoreError> {
        let patch = patch.into_document()?;

        // The merge always runs on a matched row; it counts as modified only
        // when the merged document differs from the one it replaced.
        let (matched, modified): (i64, i64) = sqlx::query_as(
            r#"
            WITH target AS (
                SELECT id, document FROM records WHERE id = $1 FOR UPDATE
            ),
            updated AS (
                UPDATE records r
                SET document = r.document || $2
                FROM target t
                WHERE r.id = t.id
                RETURNING t.document IS DISTINCT FROM r.document AS changed
            )
            SELECT
                (SELECT COUNT(*) FROM target),
                (SELECT COUNT(*) FROM updated WHERE changed)
            "#,
        )
        .bind(id.as_uuid())
        .bind(Json(patch))
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::backend)?;

        Ok(UpdateResult::new(matched as u64, modified as u64))
    }
}
