//! Error types for Whisperwall
//!
//! All errors in the application are converted to `AppError`,
//! which implements `IntoResponse`. Every page in the app is a
//! browser-facing view, so the response policy is log-and-redirect:
//! failures send the client to a safe page instead of rendering detail.

use axum::response::{IntoResponse, Redirect, Response};
use thiserror::Error;

/// Application-wide error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found (e.g. a session referencing a missing account)
    #[error("Resource not found")]
    NotFound,

    /// Authentication required, or credentials rejected
    #[error("Authentication required")]
    Unauthorized,

    /// Username is already registered
    #[error("Username already taken")]
    DuplicateUsername,

    /// Malformed registration or submission input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// OAuth provider error (denied consent, bad state, failed exchange)
    #[error("OAuth error: {0}")]
    OAuth(String),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Session token encoding/verification error
    #[error("Session error: {0}")]
    Session(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// Authentication failures redirect to the login page, rejected
    /// registration input back to the registration form, and everything
    /// else to the home page. The underlying cause is logged, never
    /// rendered.
    fn into_response(self) -> Response {
        let target = match &self {
            AppError::Unauthorized | AppError::OAuth(_) | AppError::Session(_) => {
                tracing::debug!(error = %self, "Authentication failure");
                "/login"
            }
            AppError::DuplicateUsername | AppError::Validation(_) => {
                tracing::debug!(error = %self, "Rejected form input");
                "/register"
            }
            AppError::NotFound => {
                tracing::debug!("Request referenced a missing account");
                "/"
            }
            AppError::Database(_)
            | AppError::HttpClient(_)
            | AppError::Config(_)
            | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                "/"
            }
        };

        Redirect::to(target).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
