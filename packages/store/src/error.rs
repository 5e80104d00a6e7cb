//! Errors raised by the persistence gateway.

use thiserror::Error;

/// Boxed error from whatever backend sits behind a [`Collection`](crate::Collection).
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The caller tried to overwrite the record identifier.
    #[error("field `{0}` is immutable")]
    ImmutableField(String),

    /// A stored document could not be (de)serialized.
    #[error("document encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The backing database failed.
    #[error("backend failure: {0}")]
    Backend(#[source] BackendError),
}

impl StoreError {
    pub fn backend(err: impl Into<BackendError>) -> Self {
        Self::Backend(err.into())
    }
}

/// A caller-supplied identifier that does not name a record.
#[derive(Debug, Error)]
#[error("invalid record id `{0}`")]
pub struct InvalidRecordId(pub String);
