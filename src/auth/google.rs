//! Google OAuth flow
//!
//! Implements the OAuth 2.0 authorization code flow with PKCE against
//! Google's endpoints. CSRF state and the PKCE verifier travel in
//! short-lived cookies rather than server-side storage; route handlers in
//! the web layer own the cookie round trip.

use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::error::AppError;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";

/// Path Google redirects back to after consent
pub const CALLBACK_PATH: &str = "/auth/google/secrets";

/// Google user info from the userinfo endpoint
#[derive(Debug, Deserialize)]
pub struct GoogleProfile {
    /// Stable subject identifier
    pub sub: String,
    /// Display name from the profile scope
    pub name: Option<String>,
}

/// OAuth client type with auth URL and token URL set
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

/// Google OAuth handler
pub struct GoogleOAuth {
    client_id: ClientId,
    client_secret: ClientSecret,
    auth_url: AuthUrl,
    token_url: TokenUrl,
    redirect_url: RedirectUrl,
}

impl GoogleOAuth {
    /// Build from application configuration
    ///
    /// The redirect URL is derived from the server's public base URL plus
    /// [`CALLBACK_PATH`].
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let redirect = format!("{}{}", config.server.base_url(), CALLBACK_PATH);

        Ok(Self {
            client_id: ClientId::new(config.auth.google.client_id.clone()),
            client_secret: ClientSecret::new(config.auth.google.client_secret.clone()),
            auth_url: AuthUrl::new(GOOGLE_AUTH_URL.to_string())
                .map_err(|e| AppError::Config(format!("invalid Google auth URL: {e}")))?,
            token_url: TokenUrl::new(GOOGLE_TOKEN_URL.to_string())
                .map_err(|e| AppError::Config(format!("invalid Google token URL: {e}")))?,
            redirect_url: RedirectUrl::new(redirect)
                .map_err(|e| AppError::Config(format!("invalid OAuth redirect URL: {e}")))?,
        })
    }

    fn create_client(&self) -> ConfiguredClient {
        BasicClient::new(self.client_id.clone())
            .set_client_secret(self.client_secret.clone())
            .set_auth_uri(self.auth_url.clone())
            .set_token_uri(self.token_url.clone())
            .set_redirect_uri(self.redirect_url.clone())
    }

    /// Build the consent-screen URL, requesting the `profile` scope
    ///
    /// # Returns
    /// The URL to redirect the browser to, plus the CSRF state and PKCE
    /// verifier that must be round-tripped through the client.
    pub fn authorize_url(&self) -> (String, String, String) {
        let client = self.create_client();
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_state) = client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("profile".to_string()))
            .set_pkce_challenge(pkce_challenge)
            .url();

        (
            auth_url.to_string(),
            csrf_state.secret().clone(),
            pkce_verifier.secret().clone(),
        )
    }

    /// Exchange the authorization code for the user's Google profile
    ///
    /// # Arguments
    /// * `http_client` - shared client used for the userinfo fetch
    /// * `code` - authorization code from the callback query
    /// * `pkce_verifier` - verifier stored when the flow started
    pub async fn exchange_code(
        &self,
        http_client: &reqwest::Client,
        code: String,
        pkce_verifier: String,
    ) -> Result<GoogleProfile, AppError> {
        // The token exchange client must not follow redirects.
        let token_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let token = self
            .create_client()
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
            .request_async(&token_client)
            .await
            .map_err(|e| AppError::OAuth(format!("token exchange failed: {e}")))?;

        let profile = http_client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(token.access_token().secret())
            .send()
            .await?
            .error_for_status()?
            .json::<GoogleProfile>()
            .await?;

        Ok(profile)
    }
}
