//! The persistence gateway: one collection of watch-progress records.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{DeleteResult, InsertOneResult, NewRecord, Record, RecordId, RecordPatch, UpdateResult};

/// Async interface over a single document collection.
///
/// Each call is a single-document operation with the atomicity the backend
/// gives it; there are no multi-document transactions, so concurrent writers
/// to one record race and the last write wins.
#[async_trait]
pub trait Collection: Send + Sync {
    /// Every record, in no particular order.
    async fn find_all(&self) -> Result<Vec<Record>, StoreError>;

    /// Store a new record under a freshly assigned id.
    async fn insert_one(&self, record: NewRecord) -> Result<InsertOneResult, StoreError>;

    /// Remove the record with `id`. Deleting nothing is not an error.
    async fn delete_one(&self, id: RecordId) -> Result<DeleteResult, StoreError>;

    /// Apply `patch` to the record with `id`, leaving other fields untouched.
    async fn update_one(&self, id: RecordId, patch: RecordPatch) -> Result<UpdateResult, StoreError>;
}
