//! Watch-progress record routes

use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use serde_json::Value;
use store::models::ID_FIELD;
use store::{DeleteResult, InsertOneResult, NewRecord, Record, RecordId, RecordPatch, UpdateResult};

use super::Records;
use crate::error::{ApiError, Result};

/// List every record
pub(super) async fn results(Extension(Records(collection)): Extension<Records>) -> Result<Json<Vec<Record>>> {
    let records = collection.find_all().await?;
    Ok(Json(records))
}

/// Insert a record; `progress` is computed here, never taken from the body
pub(super) async fn submit(
    Extension(Records(collection)): Extension<Records>,
    payload: std::result::Result<Json<NewRecord>, JsonRejection>,
) -> Result<Json<InsertOneResult>> {
    let Json(record) = payload?;
    let result = collection.insert_one(record).await?;
    tracing::info!(id = %result.inserted_id, "record inserted");
    Ok(Json(result))
}

/// Delete the record named by `_id`
pub(super) async fn delete(
    Extension(Records(collection)): Extension<Records>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<DeleteResult>> {
    let id = record_id(body(payload)?.as_ref())?;
    let result = collection.delete_one(id).await?;
    Ok(Json(result))
}

/// Replace one named field plus the counts of the record named by `_id`
pub(super) async fn update(
    Extension(Records(collection)): Extension<Records>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateResult>> {
    let body = body(payload)?;
    let id = record_id(body.as_ref())?;

    let patch: RecordPatch = serde_json::from_value(body.unwrap_or_default())
        .map_err(ApiError::InvalidBody)?;
    let result = collection.update_one(id, patch).await?;
    Ok(Json(result))
}

/// The JSON body of an id-addressed request.
///
/// Broken JSON is rejected with the extractor's status. A request with no
/// JSON body at all reads as `None`, which [`record_id`] turns into
/// [`ApiError::MissingId`].
fn body(payload: std::result::Result<Json<Value>, JsonRejection>) -> Result<Option<Value>> {
    match payload {
        Ok(Json(body)) => Ok(Some(body)),
        Err(rejection @ JsonRejection::JsonSyntaxError(_)) => Err(rejection.into()),
        Err(_) => Ok(None),
    }
}

/// Pull `_id` out of a request body.
///
/// A missing, empty or non-string id, or no body, is
/// [`ApiError::MissingId`]; a string that is not an id is
/// [`ApiError::InvalidId`].
fn record_id(body: Option<&Value>) -> Result<RecordId> {
    let id = body
        .and_then(|body| body.get(ID_FIELD))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingId)?;

    Ok(id.parse()?)
}
