//! Static page handlers
//!
//! Routes:
//! - GET / - Home page
//! - GET /login - Login form
//! - GET /register - Registration form

use axum::{Router, response::Html, routing::get};

use super::page;
use crate::AppState;
use crate::auth::MaybeUser;

/// Create the static pages router
pub fn pages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home_page))
        .route("/login", get(login_page))
        .route("/register", get(register_page))
}

/// GET /
async fn home_page(MaybeUser(session): MaybeUser) -> Html<String> {
    let links = if session.is_some() {
        r#"<a href="/secrets">Browse secrets</a>
<a href="/submit">Share a secret</a>
<a href="/logout">Log out</a>"#
    } else {
        r#"<a href="/secrets">Browse secrets</a>
<a href="/register">Register</a>
<a href="/login">Log in</a>"#
    };

    page(
        "Home",
        &format!(
            r#"<h1>Whisperwall</h1>
<p>Share a secret with the world. Nobody will know it was you.</p>
{links}"#
        ),
    )
}

/// GET /login
async fn login_page() -> Html<String> {
    page(
        "Log in",
        r#"<h1>Log in</h1>
<form action="/login" method="post">
  <label>Username <input type="text" name="username" required /></label>
  <label>Password <input type="password" name="password" required /></label>
  <button type="submit">Log in</button>
</form>
<a href="/auth/google">Sign in with Google</a>
<p>No account yet? <a href="/register">Register</a></p>"#,
    )
}

/// GET /register
async fn register_page() -> Html<String> {
    page(
        "Register",
        r#"<h1>Register</h1>
<form action="/register" method="post">
  <label>Username <input type="text" name="username" required /></label>
  <label>Password <input type="password" name="password" required /></label>
  <button type="submit">Register</button>
</form>
<a href="/auth/google">Sign in with Google</a>
<p>Already registered? <a href="/login">Log in</a></p>"#,
    )
}
