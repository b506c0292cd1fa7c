//! Integration tests for user registration and credential verification.
//!
//! **IMPORTANT**: These tests require a migrated PostgreSQL database.
//! Run them with `cargo test -p geotrail-db -- --ignored` and a
//! `DATABASE_URL` pointing at a disposable instance.

use chrono::Duration;
use geotrail_db::test_fixtures::{create_test_user, setup_test_db};
use geotrail_db::{Error, TokenRepository, UserRepository};
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_duplicate_username_conflicts() {
    let db = setup_test_db().await;
    let user = create_test_user(&db, "dup").await;

    let err = db
        .users
        .create(&user.username, "other@example.com", "password")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)), "got {err:?}");

    let err = db
        .users
        .create("someone_else", &user.email, "password")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)), "got {err:?}");
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_verify_credentials() {
    let db = setup_test_db().await;
    let user = create_test_user(&db, "login").await;

    let verified = db
        .users
        .verify_credentials(&user.username, "test-password")
        .await
        .unwrap();
    assert_eq!(verified.id, user.id);

    let err = db
        .users
        .verify_credentials(&user.username, "wrong-password")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));

    // Unknown username fails with the same error kind.
    let err = db
        .users
        .verify_credentials("no_such_user_here", "test-password")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_token_roundtrip_and_expiry() {
    let db = setup_test_db().await;
    let user = create_test_user(&db, "token").await;

    let token = db
        .tokens
        .create(user.id, Duration::minutes(30))
        .await
        .unwrap();
    assert!(token.starts_with("gt_at_"));

    let resolved = db.tokens.resolve(&token).await.unwrap();
    assert_eq!(resolved, Some(user.id));

    // An already-expired token resolves to nothing.
    let expired = db
        .tokens
        .create(user.id, Duration::minutes(-1))
        .await
        .unwrap();
    assert_eq!(db.tokens.resolve(&expired).await.unwrap(), None);

    // Garbage tokens resolve to nothing.
    assert_eq!(db.tokens.resolve("gt_at_nonsense").await.unwrap(), None);
    assert_eq!(db.tokens.resolve("Bearer whatever").await.unwrap(), None);
}

#[tokio::test]
#[ignore = "requires a migrated PostgreSQL database"]
async fn test_get_by_username_and_id() {
    let db = setup_test_db().await;
    let user = create_test_user(&db, "lookup").await;

    let by_name = db.users.get_by_username(&user.username).await.unwrap();
    assert_eq!(by_name.map(|u| u.id), Some(user.id));

    let by_id = db.users.get(user.id).await.unwrap();
    assert_eq!(by_id.map(|u| u.username), Some(user.username));

    assert!(db.users.get(Uuid::new_v4()).await.unwrap().is_none());
}
