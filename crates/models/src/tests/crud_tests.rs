use anyhow::Result;
use sea_orm::EntityTrait;

use super::setup_test_db;
use crate::errors::ModelError;
use crate::{app, user};

/// Test user create and lookup by email
#[tokio::test]
async fn test_user_create_and_find() -> Result<()> {
    let db = setup_test_db().await?;

    let created = user::create(&db, "bob@example.com", "$argon2id$fake").await?;
    assert!(created.id > 0);
    assert_eq!(created.email, "bob@example.com");

    let found = user::find_by_email(&db, "bob@example.com").await?.expect("user present");
    assert_eq!(found.id, created.id);
    assert_eq!(found.password_hash, "$argon2id$fake");

    assert!(user::find_by_email(&db, "nobody@example.com").await?.is_none());
    Ok(())
}

/// Ids are assigned by the database in insertion order
#[tokio::test]
async fn test_user_ids_are_sequential() -> Result<()> {
    let db = setup_test_db().await?;
    let first = user::create(&db, "a@x.com", "h1").await?;
    let second = user::create(&db, "b@x.com", "h2").await?;
    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    Ok(())
}

/// Duplicate email surfaces as a conflict and leaves the original row alone
#[tokio::test]
async fn test_user_duplicate_email_conflict() -> Result<()> {
    let db = setup_test_db().await?;
    let original = user::create(&db, "dup@example.com", "first").await?;

    let err = user::create(&db, "dup@example.com", "second").await.unwrap_err();
    assert!(matches!(err, ModelError::Conflict(_)), "got {err:?}");

    let all = user::Entity::find().all(&db).await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, original.id);
    assert_eq!(all[0].password_hash, "first");
    Ok(())
}

#[tokio::test]
async fn test_user_validation() -> Result<()> {
    let db = setup_test_db().await?;
    assert!(matches!(user::create(&db, " ", "h").await, Err(ModelError::Validation(_))));
    assert!(matches!(user::create(&db, "a@x.com", "").await, Err(ModelError::Validation(_))));
    Ok(())
}

/// Test app provisioning and lookup by id
#[tokio::test]
async fn test_app_create_and_find() -> Result<()> {
    let db = setup_test_db().await?;
    let created = app::create(&db, "test", "mySecret").await?;

    let found = app::find(&db, created.id).await?.expect("app present");
    assert_eq!(found.name, "test");
    assert_eq!(found.secret, "mySecret");

    assert!(app::find(&db, created.id + 100).await?.is_none());

    let err = app::create(&db, "test", "other").await.unwrap_err();
    assert!(matches!(err, ModelError::Conflict(_)));
    Ok(())
}

#[tokio::test]
async fn test_app_secret_not_serialized() -> Result<()> {
    let db = setup_test_db().await?;
    let created = app::create(&db, "web", "hidden").await?;
    let json = serde_json::to_string(&created)?;
    assert!(!json.contains("hidden"));
    Ok(())
}
