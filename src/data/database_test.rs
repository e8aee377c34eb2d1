//! Database tests

use super::*;
use crate::error::AppError;
use chrono::Utc;
use tempfile::TempDir;

/// Helper to create a test database
async fn create_test_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = Database::connect(&db_path).await.unwrap();
    (db, temp_dir)
}

fn local_account(username: &str) -> Account {
    let now = Utc::now();
    Account {
        id: EntityId::new().0,
        username: Some(username.to_string()),
        password_hash: Some("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string()),
        google_id: None,
        display_name: None,
        secret: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_database_connection() {
    let (_db, _temp_dir) = create_test_db().await;
    // Connection successful if we get here without panicking
}

#[tokio::test]
async fn test_create_and_get_account() {
    let (db, _temp_dir) = create_test_db().await;

    let account = local_account("alice");
    db.create_account(&account).await.unwrap();

    let by_id = db.get_account(&account.id).await.unwrap().unwrap();
    assert_eq!(by_id.username.as_deref(), Some("alice"));
    assert_eq!(by_id.auth_method(), AuthMethod::Local);

    let by_name = db.get_account_by_username("alice").await.unwrap().unwrap();
    assert_eq!(by_name.id, account.id);
}

#[tokio::test]
async fn test_duplicate_username_leaves_existing_account_unchanged() {
    let (db, _temp_dir) = create_test_db().await;

    let first = local_account("alice");
    db.create_account(&first).await.unwrap();

    let mut second = local_account("alice");
    second.password_hash = Some("$argon2id$v=19$m=19456,t=2,p=1$b3RoZXI$b3RoZXI".to_string());
    let error = db.create_account(&second).await.unwrap_err();
    assert!(matches!(error, AppError::DuplicateUsername));

    let stored = db.get_account_by_username("alice").await.unwrap().unwrap();
    assert_eq!(stored.id, first.id);
    assert_eq!(stored.password_hash, first.password_hash);
}

#[tokio::test]
async fn test_find_or_create_by_google_id_is_idempotent() {
    let (db, _temp_dir) = create_test_db().await;

    let created = db
        .find_or_create_by_google_id("google-sub-1", Some("Alice"))
        .await
        .unwrap();
    assert_eq!(created.google_id.as_deref(), Some("google-sub-1"));
    assert_eq!(created.display_name.as_deref(), Some("Alice"));
    assert_eq!(created.auth_method(), AuthMethod::Google);

    // Second callback with the same subject returns the same account
    let found = db
        .find_or_create_by_google_id("google-sub-1", Some("Alice Renamed"))
        .await
        .unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.display_name.as_deref(), Some("Alice Renamed"));

    let listed = db.get_account_by_google_id("google-sub-1").await.unwrap();
    assert!(listed.is_some());
}

#[tokio::test]
async fn test_set_secret_overwrites() {
    let (db, _temp_dir) = create_test_db().await;

    let account = local_account("bob");
    db.create_account(&account).await.unwrap();

    db.set_secret(&account.id, "first secret").await.unwrap();
    db.set_secret(&account.id, "second secret").await.unwrap();

    let stored = db.get_account(&account.id).await.unwrap().unwrap();
    assert_eq!(stored.secret.as_deref(), Some("second secret"));
}

#[tokio::test]
async fn test_set_secret_unknown_account_is_not_found() {
    let (db, _temp_dir) = create_test_db().await;

    let error = db.set_secret("no-such-id", "value").await.unwrap_err();
    assert!(matches!(error, AppError::NotFound));
}

#[tokio::test]
async fn test_list_accounts_with_secret_excludes_null_secrets() {
    let (db, _temp_dir) = create_test_db().await;

    let with_secret = local_account("carol");
    let without_secret = local_account("dave");
    db.create_account(&with_secret).await.unwrap();
    db.create_account(&without_secret).await.unwrap();
    db.set_secret(&with_secret.id, "carol's secret").await.unwrap();

    let listed = db.list_accounts_with_secret().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, with_secret.id);
    assert_eq!(listed[0].secret.as_deref(), Some("carol's secret"));
}
