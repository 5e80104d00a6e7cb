//! Login, logout and the current-user route

use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use super::found;
use crate::auth::{session_user, PendingLogin, SessionUser, PENDING_LOGIN_KEY, SESSION_USER_KEY};
use crate::error::Result;
use crate::state::AppState;

/// Query string GitHub sends back to the callback.
#[derive(Debug, Deserialize)]
pub(super) struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Body of `GET /user`.
#[derive(Debug, Serialize)]
pub(super) struct UserStatus {
    authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<SessionUser>,
}

/// Start the OAuth handshake
pub(super) async fn login(State(state): State<AppState>, session: Session) -> Result<Response> {
    let request = state.identity().authorization_request();

    session
        .insert(
            PENDING_LOGIN_KEY,
            PendingLogin {
                csrf_state: request.csrf_state,
                pkce_verifier: request.pkce_verifier,
            },
        )
        .await?;

    Ok(found(&request.url))
}

/// Finish the OAuth handshake. Any failure lands back on `/`.
pub(super) async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Response> {
    let pending: Option<PendingLogin> = session.remove(PENDING_LOGIN_KEY).await?;

    if let Some(error) = params.error {
        tracing::warn!("GitHub denied the login: {}", error);
        return Ok(found("/"));
    }
    let (Some(code), Some(returned_state)) = (params.code, params.state) else {
        tracing::error!("GitHub callback missing code or state");
        return Ok(found("/"));
    };
    let Some(pending) = pending else {
        tracing::error!("GitHub callback without a pending login");
        return Ok(found("/"));
    };
    if pending.csrf_state != returned_state {
        tracing::error!("GitHub callback state mismatch");
        return Ok(found("/"));
    }

    let profile = match state
        .identity()
        .exchange_code(&code, &pending.pkce_verifier)
        .await
    {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!("GitHub OAuth error: {}", e);
            return Ok(found("/"));
        }
    };

    let user = SessionUser::from(profile);
    tracing::info!(username = %user.username, "user logged in");

    session.cycle_id().await?;
    session.insert(SESSION_USER_KEY, user).await?;

    Ok(found("/"))
}

/// Who is logged in on this session
pub(super) async fn current_user(session: Session) -> Result<Json<UserStatus>> {
    let user = session_user(&session).await?;
    Ok(Json(UserStatus {
        authenticated: user.is_some(),
        user,
    }))
}

/// Drop the session and go home
pub(super) async fn logout(session: Session) -> Result<Response> {
    session.flush().await?;
    Ok(found("/"))
}
