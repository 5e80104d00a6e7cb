//! The seam between the HTTP routes and an external identity provider.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid OAuth configuration: {0}")]
    Config(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("HTTP request to provider failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Where to send the browser, plus the secrets needed to finish the login.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub csrf_state: String,
    pub pkce_verifier: String,
}

/// The part of the provider's profile we keep.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderProfile {
    pub id: String,
    pub username: String,
    pub display_name: Option<String>,
}

/// An OAuth 2.0 authorization-code provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Build a fresh authorization URL with its CSRF state and PKCE verifier.
    fn authorization_request(&self) -> AuthorizationRequest;

    /// Trade the callback's `code` for an access token and fetch the profile.
    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<ProviderProfile, AuthError>;
}
