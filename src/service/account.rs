//! Account service
//!
//! Registration, credential checks, and secret handling.

use std::sync::Arc;

use crate::auth::{GoogleProfile, hash_password, verify_password};
use crate::data::{Account, Database, EntityId};
use crate::error::AppError;

/// Account service
pub struct AccountService {
    db: Arc<Database>,
}

impl AccountService {
    /// Create new account service
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Register a new local account
    ///
    /// Hashes the password and inserts the account. The plaintext is
    /// dropped here and never stored.
    ///
    /// # Errors
    /// `DuplicateUsername` if the username is taken; the existing account
    /// and its credential are left unchanged.
    pub async fn register(&self, username: &str, password: &str) -> Result<Account, AppError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::Validation("username cannot be empty".to_string()));
        }
        if password.is_empty() {
            return Err(AppError::Validation("password cannot be empty".to_string()));
        }

        let password_hash = hash_password(password)?;
        let now = chrono::Utc::now();
        let account = Account {
            id: EntityId::new().0,
            username: Some(username.to_string()),
            password_hash: Some(password_hash),
            google_id: None,
            display_name: None,
            secret: None,
            created_at: now,
            updated_at: now,
        };

        self.db.create_account(&account).await?;

        tracing::info!(username = %username, "Account registered");
        Ok(account)
    }

    /// Check a username/password pair
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the
    /// caller; the precise cause is logged at debug level only.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Account, AppError> {
        let Some(account) = self.db.get_account_by_username(username.trim()).await? else {
            tracing::debug!(username = %username, "Login failed: unknown username");
            return Err(AppError::Unauthorized);
        };

        let Some(stored_hash) = account.password_hash.as_deref() else {
            tracing::debug!(username = %username, "Login failed: no local credential");
            return Err(AppError::Unauthorized);
        };

        if !verify_password(password, stored_hash)? {
            tracing::debug!(username = %username, "Login failed: password mismatch");
            return Err(AppError::Unauthorized);
        }

        Ok(account)
    }

    /// Log in a Google identity, creating the account on first sight
    pub async fn login_google(&self, profile: &GoogleProfile) -> Result<Account, AppError> {
        let account = self
            .db
            .find_or_create_by_google_id(&profile.sub, profile.name.as_deref())
            .await?;

        tracing::info!(account_id = %account.id, "Google sign-in");
        Ok(account)
    }

    /// Overwrite the caller's secret
    pub async fn submit_secret(&self, account_id: &str, secret: &str) -> Result<(), AppError> {
        self.db.set_secret(account_id, secret).await
    }

    /// All accounts that have shared a secret
    pub async fn accounts_with_secret(&self) -> Result<Vec<Account>, AppError> {
        self.db.list_accounts_with_secret().await
    }
}
