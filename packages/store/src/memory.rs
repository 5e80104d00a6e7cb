use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::collection::Collection;
use crate::error::StoreError;
use crate::models::{
    merge_document, DeleteResult, Document, InsertOneResult, NewRecord, Record, RecordId,
    RecordPatch, UpdateResult,
};

/// In-memory Collection for testing and local runs without a database.
#[derive(Clone, Debug, Default)]
pub struct MemoryCollection {
    records: Arc<Mutex<Vec<(RecordId, Document)>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Collection for MemoryCollection {
    async fn find_all(&self) -> Result<Vec<Record>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .map(|(id, document)| Record {
                id: *id,
                document: document.clone(),
            })
            .collect())
    }

    async fn insert_one(&self, record: NewRecord) -> Result<InsertOneResult, StoreError> {
        let id = RecordId::new();
        self.records
            .lock()
            .unwrap()
            .push((id, record.into_document()));

        Ok(InsertOneResult {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn delete_one(&self, id: RecordId) -> Result<DeleteResult, StoreError> {
        let mut records = self.records.lock().unwrap();
        let deleted_count = match records.iter().position(|(existing, _)| *existing == id) {
            Some(index) => {
                records.remove(index);
                1
            }
            None => 0,
        };

        Ok(DeleteResult {
            acknowledged: true,
            deleted_count,
        })
    }

    async fn update_one(&self, id: RecordId, patch: RecordPatch) -> Result<UpdateResult, StoreError> {
        let patch = patch.into_document()?;
        let mut records = self.records.lock().unwrap();

        let Some((_, document)) = records.iter_mut().find(|(existing, _)| *existing == id) else {
            return Ok(UpdateResult::new(0, 0));
        };

        let modified = merge_document(document, patch);
        Ok(UpdateResult::new(1, u64::from(modified)))
    }
}
