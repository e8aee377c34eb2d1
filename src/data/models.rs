//! Data models
//!
//! Rust structs representing database entities.
//! All models use ULID for IDs and chrono for timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Create from existing string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Account
// =============================================================================

/// A registered user
///
/// Local and Google identities share one table; an account is always
/// reachable by at least one of `username` or `google_id`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Account {
    pub id: String,
    /// Unique name for local login; None for Google-only accounts
    pub username: Option<String>,
    /// Argon2id PHC string; None for Google-only accounts
    pub password_hash: Option<String>,
    /// Google subject identifier; None for local-only accounts
    pub google_id: Option<String>,
    /// Human-readable name, populated from the Google profile when available
    pub display_name: Option<String>,
    /// The one secret this account may share; overwritten on resubmission
    pub secret: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How an account can authenticate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// Username + password only
    Local,
    /// Google identity only
    Google,
    /// Both credentials present
    Hybrid,
}

impl Account {
    /// Derive the authentication method from the populated identity fields
    pub fn auth_method(&self) -> AuthMethod {
        match (self.username.is_some(), self.google_id.is_some()) {
            (true, true) => AuthMethod::Hybrid,
            (false, true) => AuthMethod::Google,
            _ => AuthMethod::Local,
        }
    }
}
