use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tower_sessions::Session;

use super::session::session_user;
use crate::error::ApiError;
use crate::routes::found;

/// Where anonymous requests to protected routes are sent.
pub const LOGIN_PATH: &str = "/auth/github";

/// Lets the request through when the session has a user, otherwise
/// redirects to the login route. Anonymous requests never see a 401.
pub async fn require_auth(
    session: Session,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if session_user(&session).await?.is_some() {
        return Ok(next.run(request).await);
    }

    tracing::debug!(path = %request.uri().path(), "anonymous request, redirecting to login");
    Ok(found(LOGIN_PATH))
}
