//! Authentication handlers
//!
//! Routes:
//! - POST /login - Local credential login
//! - POST /register - Create account and auto-login
//! - GET /logout - Clear session
//! - GET /auth/google - Redirect to Google consent screen
//! - GET /auth/google/secrets - OAuth callback

use axum::{
    Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::Deserialize;

use crate::AppState;
use crate::auth::{CALLBACK_PATH, GoogleOAuth, SESSION_COOKIE, Session, create_session_token};
use crate::data::Account;
use crate::error::AppError;
use crate::service::AccountService;

const OAUTH_STATE_COOKIE: &str = "oauth_state";
const OAUTH_PKCE_COOKIE: &str = "oauth_pkce";

/// Create the authentication router
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", get(logout))
        .route("/auth/google", get(google_redirect))
        .route(CALLBACK_PATH, get(google_callback))
}

// =============================================================================
// Cookies
// =============================================================================

fn build_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build((name, "".to_string()))
        .path("/")
        .http_only(true)
        .build();
    cookie.make_removal();
    cookie
}

/// Issue a signed session cookie for an account
fn session_cookie_for(account: &Account, state: &AppState) -> Result<Cookie<'static>, AppError> {
    let session = Session::new(account.id.clone(), state.config.auth.session_max_age);
    let token = create_session_token(&session, &state.config.auth.session_secret)?;
    Ok(build_cookie(
        SESSION_COOKIE,
        token,
        state.config.should_use_secure_cookies(),
    ))
}

// =============================================================================
// Local credentials
// =============================================================================

/// Form fields for local login and registration
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    username: String,
    password: String,
}

/// POST /login
///
/// On success sets the session cookie and redirects to the secrets page.
/// Failures redirect back to the login form without detail.
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    axum::Form(form): axum::Form<CredentialsForm>,
) -> Result<impl IntoResponse, AppError> {
    let service = AccountService::new(state.db.clone());
    let account = service
        .verify_credentials(&form.username, &form.password)
        .await?;

    let jar = jar.add(session_cookie_for(&account, &state)?);
    Ok((jar, Redirect::to("/secrets")))
}

/// POST /register
///
/// Creates the account and logs it straight in. Duplicate usernames
/// redirect back to the registration form.
async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    axum::Form(form): axum::Form<CredentialsForm>,
) -> Result<impl IntoResponse, AppError> {
    let service = AccountService::new(state.db.clone());
    let account = service.register(&form.username, &form.password).await?;

    let jar = jar.add(session_cookie_for(&account, &state)?);
    Ok((jar, Redirect::to("/secrets")))
}

/// GET /logout
///
/// Clears the session cookie and redirects home. The cookie holds the
/// client's only copy of the token, so removal ends the session.
async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.add(removal_cookie(SESSION_COOKIE)), Redirect::to("/"))
}

// =============================================================================
// Google OAuth
// =============================================================================

/// GET /auth/google
///
/// Stores the CSRF state and PKCE verifier in one-shot cookies, then
/// redirects the browser to Google's consent screen.
async fn google_redirect(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let oauth = GoogleOAuth::from_config(&state.config)?;
    let (auth_url, csrf_state, pkce_verifier) = oauth.authorize_url();

    let secure = state.config.should_use_secure_cookies();
    let jar = jar
        .add(build_cookie(OAUTH_STATE_COOKIE, csrf_state, secure))
        .add(build_cookie(OAUTH_PKCE_COOKIE, pkce_verifier, secure));

    Ok((jar, Redirect::to(&auth_url)))
}

/// Query parameters from the Google callback
#[derive(Debug, Deserialize)]
struct GoogleCallbackQuery {
    /// Authorization code
    code: Option<String>,
    /// CSRF state token
    state: Option<String>,
    /// Error code when the user denied consent
    error: Option<String>,
}

/// GET /auth/google/secrets
///
/// Handles the OAuth callback. Any failure redirects to the login page;
/// the cause is logged only.
async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<GoogleCallbackQuery>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let stored_state = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
    let pkce_verifier = jar.get(OAUTH_PKCE_COOKIE).map(|c| c.value().to_string());

    // The state and verifier cookies are one-shot; drop them either way.
    let jar = jar
        .add(removal_cookie(OAUTH_STATE_COOKIE))
        .add(removal_cookie(OAUTH_PKCE_COOKIE));

    match authenticate_google(&state, query, stored_state, pkce_verifier).await {
        Ok(account) => {
            let jar = jar.add(session_cookie_for(&account, &state)?);
            Ok((jar, Redirect::to("/secrets")))
        }
        Err(error) => {
            tracing::warn!(%error, "Google sign-in failed");
            Ok((jar, Redirect::to("/login")))
        }
    }
}

/// Validate the callback and resolve it to an account
async fn authenticate_google(
    state: &AppState,
    query: GoogleCallbackQuery,
    stored_state: Option<String>,
    pkce_verifier: Option<String>,
) -> Result<Account, AppError> {
    if let Some(error) = query.error {
        return Err(AppError::OAuth(format!("consent denied: {error}")));
    }

    let code = query
        .code
        .ok_or_else(|| AppError::OAuth("callback missing authorization code".to_string()))?;
    let returned_state = query
        .state
        .ok_or_else(|| AppError::OAuth("callback missing state".to_string()))?;
    let stored_state =
        stored_state.ok_or_else(|| AppError::OAuth("missing state cookie".to_string()))?;
    let pkce_verifier =
        pkce_verifier.ok_or_else(|| AppError::OAuth("missing PKCE cookie".to_string()))?;

    if returned_state != stored_state {
        return Err(AppError::OAuth("state mismatch".to_string()));
    }

    let oauth = GoogleOAuth::from_config(&state.config)?;
    let profile = oauth
        .exchange_code(&state.http_client, code, pkce_verifier)
        .await?;

    let service = AccountService::new(state.db.clone());
    service.login_google(&profile).await
}
