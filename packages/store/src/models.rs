//! # Record model for the watch-progress collection
//!
//! A record is an open JSON document. Three keys are owned by the server:
//!
//! - `_id` — assigned by the collection on insert ([`RecordId`]).
//! - `watched` / `episodes` — integer counts, accepted as JSON integers or
//!   numeric strings (HTML forms post strings).
//! - `progress` — always recomputed from the two counts with
//!   [`calculate_progress`]; whatever the caller sends is overwritten.
//!
//! Every other key is stored verbatim.
//!
//! Writes come in two shapes: [`NewRecord`] for inserts and [`RecordPatch`] for
//! the single-field partial update. Both turn into a plain [`Document`] that a
//! [`Collection`](crate::Collection) merges into storage. The result types
//! mirror what document-database drivers report, so the JSON the front end
//! sees is `{"acknowledged": true, "insertedId": ...}` and friends.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{InvalidRecordId, StoreError};
use crate::progress::calculate_progress;

/// Field name carrying the record identifier.
pub const ID_FIELD: &str = "_id";
pub const WATCHED_FIELD: &str = "watched";
pub const EPISODES_FIELD: &str = "episodes";
pub const PROGRESS_FIELD: &str = "progress";

/// Stored body of a record, without its identifier.
pub type Document = Map<String, Value>;

/// Identifier assigned to a record by the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for RecordId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RecordId {
    type Err = InvalidRecordId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| InvalidRecordId(s.to_string()))
    }
}

/// A stored record as returned by a full scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(flatten)]
    pub document: Document,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.document.get(field)
    }

    pub fn progress(&self) -> Option<&str> {
        self.get(PROGRESS_FIELD).and_then(Value::as_str)
    }
}

/// Body of an insert.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewRecord {
    #[serde(deserialize_with = "deserialize_count")]
    pub watched: i64,
    #[serde(deserialize_with = "deserialize_count")]
    pub episodes: i64,
    /// Caller-supplied extras, stored as-is.
    #[serde(flatten)]
    pub fields: Document,
}

impl NewRecord {
    pub fn new(watched: i64, episodes: i64) -> Self {
        Self {
            watched,
            episodes,
            fields: Document::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Document to store. Drops any caller `_id` and recomputes `progress`.
    pub fn into_document(self) -> Document {
        let mut document = self.fields;
        document.remove(ID_FIELD);
        set_counts(&mut document, self.watched, self.episodes);
        document
    }
}

/// Body of a single-field partial update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordPatch {
    /// Name of the field to replace.
    pub field: String,
    /// Its new value.
    #[serde(rename = "newInfo", default)]
    pub new_info: Value,
    #[serde(deserialize_with = "deserialize_count")]
    pub watched: i64,
    #[serde(deserialize_with = "deserialize_count")]
    pub episodes: i64,
}

impl RecordPatch {
    pub fn new(field: impl Into<String>, new_info: impl Into<Value>, watched: i64, episodes: i64) -> Self {
        Self {
            field: field.into(),
            new_info: new_info.into(),
            watched,
            episodes,
        }
    }

    /// The `$set`-style document for this patch.
    ///
    /// The counts and `progress` are applied after the named field, so they win
    /// when the named field is one of them.
    pub fn into_document(self) -> Result<Document, StoreError> {
        if self.field == ID_FIELD {
            return Err(StoreError::ImmutableField(self.field));
        }

        let mut document = Document::new();
        document.insert(self.field, self.new_info);
        set_counts(&mut document, self.watched, self.episodes);
        Ok(document)
    }
}

fn set_counts(document: &mut Document, watched: i64, episodes: i64) {
    document.insert(WATCHED_FIELD.to_string(), watched.into());
    document.insert(EPISODES_FIELD.to_string(), episodes.into());
    document.insert(
        PROGRESS_FIELD.to_string(),
        calculate_progress(watched, episodes).into(),
    );
}

/// Copy every key of `patch` into `target`. Returns whether any value changed.
pub fn merge_document(target: &mut Document, patch: Document) -> bool {
    let mut modified = false;
    for (key, value) in patch {
        if target.get(&key) != Some(&value) {
            target.insert(key, value);
            modified = true;
        }
    }
    modified
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountRepr {
    Int(i64),
    Text(String),
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match CountRepr::deserialize(deserializer)? {
        CountRepr::Int(n) => Ok(n),
        CountRepr::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("`{s}` is not a whole number"))),
    }
}

/// Outcome of [`Collection::insert_one`](crate::Collection::insert_one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: RecordId,
}

/// Outcome of [`Collection::delete_one`](crate::Collection::delete_one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Outcome of [`Collection::update_one`](crate::Collection::update_one).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<RecordId>,
}

impl UpdateResult {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}
