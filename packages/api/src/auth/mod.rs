//! Authentication: GitHub OAuth, the session user, and the route gate.

mod config;
mod gate;
mod github;
mod provider;
mod session;

pub use config::OAuthConfig;
pub use gate::{require_auth, LOGIN_PATH};
pub use github::GitHubOAuth;
pub use provider::{AuthError, AuthorizationRequest, IdentityProvider, ProviderProfile};
pub use session::{session_user, PendingLogin, SessionUser, PENDING_LOGIN_KEY, SESSION_USER_KEY};
