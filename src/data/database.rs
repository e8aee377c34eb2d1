//! SQLite database operations
//!
//! All database access goes through this module.

use chrono::Utc;
use sqlx::{Pool, Sqlite, SqlitePool};
use std::path::Path;

use super::models::{Account, EntityId};
use crate::error::AppError;

/// Database connection pool wrapper
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    // =========================================================================
    // Connection
    // =========================================================================

    /// Connect to SQLite database
    ///
    /// Creates the database file if it doesn't exist.
    /// Runs pending migrations automatically.
    ///
    /// # Arguments
    /// * `path` - Path to SQLite database file
    ///
    /// # Errors
    /// Returns error if connection or migration fails
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let connection_string = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&connection_string).await?;

        sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
            tracing::error!("Migration failed: {}", e);
            AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
        })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Insert a new account
    ///
    /// # Errors
    /// Returns `DuplicateUsername` if the username is already registered;
    /// the existing row is left untouched.
    pub async fn create_account(&self, account: &Account) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (
                id, username, password_hash, google_id, display_name, secret,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.id)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(&account.google_id)
        .bind(&account.display_name)
        .bind(&account.secret)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::DuplicateUsername)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get an account by ID
    pub async fn get_account(&self, id: &str) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    /// Get an account by its local username
    pub async fn get_account_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    /// Get an account by its Google subject identifier
    pub async fn get_account_by_google_id(
        &self,
        google_id: &str,
    ) -> Result<Option<Account>, AppError> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE google_id = ?")
            .bind(google_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    /// Find the account for a Google identity, creating it on first sight
    ///
    /// The upsert is keyed on the unique `google_id` index, so concurrent
    /// callbacks for the same subject cannot race into duplicate accounts.
    /// Returning users get their display name refreshed from the profile.
    pub async fn find_or_create_by_google_id(
        &self,
        google_id: &str,
        display_name: Option<&str>,
    ) -> Result<Account, AppError> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, username, password_hash, google_id, display_name, secret,
                created_at, updated_at
            ) VALUES (?, NULL, NULL, ?, ?, NULL, ?, ?)
            ON CONFLICT(google_id) DO UPDATE SET
                display_name = excluded.display_name,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(EntityId::new().0)
        .bind(google_id)
        .bind(display_name)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_account_by_google_id(google_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// All accounts that have shared a secret, order unspecified
    pub async fn list_accounts_with_secret(&self) -> Result<Vec<Account>, AppError> {
        let accounts =
            sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE secret IS NOT NULL")
                .fetch_all(&self.pool)
                .await?;

        Ok(accounts)
    }

    /// Overwrite an account's secret
    ///
    /// # Errors
    /// Returns `NotFound` if no account with that ID exists.
    pub async fn set_secret(&self, id: &str, secret: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE accounts SET secret = ?, updated_at = ? WHERE id = ?")
            .bind(secret)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
