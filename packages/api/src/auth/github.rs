//! # GitHub OAuth 2.0 implementation
//!
//! Implements the GitHub Authorization Code flow with PKCE.
//!
//! ## Flow
//!
//! 1. **[`authorization_request`](GitHubOAuth::authorization_request)** builds an
//!    authorization URL requesting the `read:user` scope with a random CSRF state
//!    and PKCE challenge. The caller keeps the state and verifier in the browser
//!    session until the callback arrives.
//!
//! 2. **[`exchange_code`](GitHubOAuth::exchange_code)** is called by the
//!    `/auth/github/callback` route once the state has been checked. It swaps the
//!    code + PKCE verifier for an access token and fetches the profile from
//!    `api.github.com/user`.

use async_trait::async_trait;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthorizationCode, CsrfToken, EndpointNotSet, EndpointSet, PkceCodeChallenge,
    PkceCodeVerifier, Scope, TokenResponse,
};
use serde::Deserialize;

use super::config::OAuthConfig;
use super::provider::{AuthError, AuthorizationRequest, IdentityProvider, ProviderProfile};
use crate::settings::Settings;

const GITHUB_USER_URL: &str = "https://api.github.com/user";
const USER_AGENT: &str = "watchlist";

/// GitHub user info from API.
#[derive(Debug, Deserialize)]
struct GitHubUser {
    id: i64,
    login: String,
    name: Option<String>,
}

impl From<GitHubUser> for ProviderProfile {
    fn from(user: GitHubUser) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.login,
            display_name: user.name,
        }
    }
}

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// GitHub OAuth handler.
pub struct GitHubOAuth {
    client: ConfiguredClient,
    http: reqwest::Client,
}

impl GitHubOAuth {
    /// Create a new GitHub OAuth handler.
    pub fn new(settings: &Settings) -> Result<Self, AuthError> {
        let config = OAuthConfig::github(settings)?;

        let client = BasicClient::new(config.client_id)
            .set_client_secret(config.client_secret)
            .set_auth_uri(config.auth_url)
            .set_token_uri(config.token_url)
            .set_redirect_uri(config.redirect_url);

        // Redirects are never followed on token requests.
        let http = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, http })
    }
}

#[async_trait]
impl IdentityProvider for GitHubOAuth {
    fn authorization_request(&self) -> AuthorizationRequest {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_state) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("read:user".to_string()))
            .set_pkce_challenge(pkce_challenge)
            .url();

        AuthorizationRequest {
            url: auth_url.to_string(),
            csrf_state: csrf_state.secret().clone(),
            pkce_verifier: pkce_verifier.secret().clone(),
        }
    }

    async fn exchange_code(
        &self,
        code: &str,
        pkce_verifier: &str,
    ) -> Result<ProviderProfile, AuthError> {
        let token = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier.to_string()))
            .request_async(&self.http)
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        let user: GitHubUser = self
            .http
            .get(GITHUB_USER_URL)
            .bearer_auth(token.access_token().secret())
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::debug!(login = %user.login, "fetched GitHub profile");
        Ok(user.into())
    }
}
