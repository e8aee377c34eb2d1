//! Web layer
//!
//! Browser-facing HTML pages:
//! - Home, login, and registration forms
//! - Google OAuth entry point and callback
//! - Secret listing and submission

mod auth;
mod pages;
mod secrets;

pub use auth::auth_router;
pub use pages::pages_router;
pub use secrets::secrets_router;

use axum::response::Html;

/// Render a full HTML document around a page body
pub(crate) fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{} - Whisperwall</title>
</head>
<body>
{}
</body>
</html>
"#,
        html_escape::encode_text(title),
        body
    ))
}
