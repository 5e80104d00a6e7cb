//! OAuth configuration from settings.

use oauth2::{AuthUrl, ClientId, ClientSecret, RedirectUrl, TokenUrl};

use super::provider::AuthError;
use crate::settings::Settings;

const GITHUB_AUTH_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";

/// OAuth provider configuration.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub auth_url: AuthUrl,
    pub token_url: TokenUrl,
    pub redirect_url: RedirectUrl,
}

impl OAuthConfig {
    /// GitHub endpoints with the client credentials from `settings`.
    pub fn github(settings: &Settings) -> Result<Self, AuthError> {
        Ok(Self {
            client_id: ClientId::new(settings.github_client_id.clone()),
            client_secret: ClientSecret::new(settings.github_client_secret.clone()),
            auth_url: AuthUrl::new(GITHUB_AUTH_URL.to_string())
                .map_err(|e| AuthError::Config(e.to_string()))?,
            token_url: TokenUrl::new(GITHUB_TOKEN_URL.to_string())
                .map_err(|e| AuthError::Config(e.to_string()))?,
            redirect_url: RedirectUrl::new(settings.oauth_callback_url.clone())
                .map_err(|e| AuthError::Config(format!("oauth_callback_url: {e}")))?,
        })
    }
}
