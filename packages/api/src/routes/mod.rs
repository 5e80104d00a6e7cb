//! HTTP routes.
//!
//! Every route sits behind the readiness gate. `/results`, `/submit`,
//! `/delete`, `/update` and `/logout` additionally sit behind
//! [`require_auth`](crate::auth::require_auth).

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use store::Collection;

use crate::auth::require_auth;
use crate::error::ApiError;
use crate::state::{AppState, Readiness};

mod auth;
mod records;

/// The connected collection, handed to handlers by the readiness gate.
#[derive(Clone)]
pub struct Records(pub Arc<dyn Collection>);

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/results", get(records::results))
        .route("/submit", post(records::submit))
        .route("/delete", post(records::delete))
        .route("/update", post(records::update))
        .route("/logout", post(auth::logout))
        .route_layer(middleware::from_fn(require_auth));

    Router::new()
        .route("/auth/github", get(auth::login))
        .route("/auth/github/callback", get(auth::callback))
        .route("/user", get(auth::current_user))
        .merge(protected)
        .layer(middleware::from_fn_with_state(state.clone(), require_ready))
        .with_state(state)
}

/// Answer 503 until the collection is connected.
async fn require_ready(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match state.readiness() {
        Readiness::Ready(collection) => {
            request.extensions_mut().insert(Records(collection));
            Ok(next.run(request).await)
        }
        Readiness::Pending => Err(ApiError::NotReady),
    }
}

/// A `302 Found` redirect.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
