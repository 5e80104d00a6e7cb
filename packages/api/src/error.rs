//! Error type for the HTTP handlers.
//!
//! Every failure is answered with a bare status code and an empty body; the
//! detail only goes to the log.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use store::{InvalidRecordId, StoreError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("record collection is not connected")]
    NotReady,

    #[error("record id missing from request")]
    MissingId,

    #[error(transparent)]
    InvalidId(#[from] InvalidRecordId),

    #[error("malformed request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Body(rejection) => rejection.status(),
            ApiError::InvalidBody(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MissingId
            | ApiError::InvalidId(_)
            | ApiError::Store(_)
            | ApiError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::NotReady => tracing::debug!("rejecting request: {}", self),
            ApiError::MissingId => tracing::warn!("{}", self),
            ApiError::InvalidId(_) | ApiError::Body(_) | ApiError::InvalidBody(_) => {
                tracing::warn!("bad request: {}", self)
            }
            ApiError::Store(_) | ApiError::Session(_) => tracing::error!("{}", self),
        }

        self.status().into_response()
    }
}
