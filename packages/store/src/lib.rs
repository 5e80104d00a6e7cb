pub mod collection;
pub mod error;
pub mod models;
pub mod progress;

mod memory;
pub use memory::MemoryCollection;

pub use collection::Collection;
pub use error::{InvalidRecordId, StoreError};
pub use models::{
    DeleteResult, Document, InsertOneResult, NewRecord, Record, RecordId, RecordPatch,
    UpdateResult,
};
pub use progress::calculate_progress;
