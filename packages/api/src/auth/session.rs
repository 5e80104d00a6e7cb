//! Session data types.

use serde::{Deserialize, Serialize};
use tower_sessions::session::Error as SessionError;
use tower_sessions::Session;

use super::provider::ProviderProfile;

/// Key for the logged-in user.
pub const SESSION_USER_KEY: &str = "user";

/// Key for an OAuth handshake that has started but not returned yet.
pub const PENDING_LOGIN_KEY: &str = "oauth.pending";

/// The user attached to a browser session after a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
}

impl From<ProviderProfile> for SessionUser {
    fn from(profile: ProviderProfile) -> Self {
        Self {
            id: profile.id,
            username: profile.username,
            display_name: profile.display_name,
        }
    }
}

/// CSRF state and PKCE verifier for an in-flight OAuth handshake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingLogin {
    pub csrf_state: String,
    pub pkce_verifier: String,
}

/// The session's user, if any.
///
/// An entry that no longer deserializes counts as logged out.
pub async fn session_user(session: &Session) -> Result<Option<SessionUser>, SessionError> {
    match session.get::<SessionUser>(SESSION_USER_KEY).await {
        Ok(user) => Ok(user),
        Err(SessionError::SerdeJson(e)) => {
            tracing::warn!("discarding unreadable session user: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
