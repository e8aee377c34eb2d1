//! Secret handlers
//!
//! Routes:
//! - GET /secrets - Aggregate listing of all shared secrets
//! - GET /submit - Submission form (requires authentication)
//! - POST /submit - Overwrite the caller's secret

use axum::{
    Router,
    extract::State,
    response::{Html, IntoResponse, Redirect},
    routing::get,
};
use serde::Deserialize;

use super::page;
use crate::AppState;
use crate::auth::{CurrentUser, MaybeUser};
use crate::data::Account;
use crate::error::AppError;
use crate::service::AccountService;

/// Create the secrets router
pub fn secrets_router() -> Router<AppState> {
    Router::new()
        .route("/secrets", get(secrets_page))
        .route("/submit", get(submit_page).post(submit_secret))
}

fn render_secrets_page(accounts: &[Account], authenticated: bool) -> Html<String> {
    let items: String = accounts
        .iter()
        .filter_map(|account| account.secret.as_deref())
        .map(|secret| format!("  <li>{}</li>\n", html_escape::encode_text(secret)))
        .collect();

    let footer = if authenticated {
        r#"<a href="/submit">Share a secret</a>
<a href="/logout">Log out</a>"#
    } else {
        r#"<a href="/login">Log in to share your own</a>"#
    };

    page(
        "Secrets",
        &format!(
            r#"<h1>You shall never know who...</h1>
<ul>
{items}</ul>
{footer}"#
        ),
    )
}

/// GET /secrets
///
/// The aggregate listing is intentionally public; only submission
/// requires a session.
async fn secrets_page(
    State(state): State<AppState>,
    MaybeUser(session): MaybeUser,
) -> Result<Html<String>, AppError> {
    let service = AccountService::new(state.db.clone());
    let accounts = service.accounts_with_secret().await?;

    Ok(render_secrets_page(&accounts, session.is_some()))
}

/// GET /submit
///
/// Anonymous requests are redirected to the login page by the extractor.
async fn submit_page(CurrentUser(_session): CurrentUser) -> Html<String> {
    page(
        "Share a secret",
        r#"<h1>Share a secret</h1>
<form action="/submit" method="post">
  <label>Your secret <input type="text" name="secret" required /></label>
  <button type="submit">Submit</button>
</form>
<a href="/secrets">Back to secrets</a>"#,
    )
}

/// Form field for secret submission
#[derive(Debug, Deserialize)]
struct SecretForm {
    secret: String,
}

/// POST /submit
///
/// Overwrites the caller's secret; a resubmission replaces the previous
/// value.
async fn submit_secret(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    axum::Form(form): axum::Form<SecretForm>,
) -> Result<impl IntoResponse, AppError> {
    let service = AccountService::new(state.db.clone());
    service.submit_secret(&session.account_id, &form.secret).await?;

    Ok(Redirect::to("/secrets"))
}
