#![allow(clippy::unwrap_used, clippy::expect_used)]

use accounts::domain::error::DomainError;
use accounts::domain::repo::UsersRepository;
use accounts::infra::storage::sea_orm_repo::SeaOrmUsersRepository;
use accounts::{AccountPatch, AccountsError, Migrator, NewAccount, ProfileUpdate};
use admin_api::PageRequest;
use admin_security::SecurityContext;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

async fn connect() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1);
    let db = Database::connect(opts).await.expect("connect sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

fn new_account(username: &str, email: &str) -> NewAccount {
    NewAccount {
        username: username.to_owned(),
        email: email.to_owned(),
        full_name: None,
        is_admin: false,
    }
}

#[tokio::test]
async fn ensure_admin_then_resolve_by_email() {
    let db = connect().await;
    let (_, client) = accounts::build(db);

    let (admin, created) = client
        .ensure_admin("admin", "admin@example.com")
        .await
        .unwrap();
    assert!(created);
    assert!(admin.is_admin && admin.is_active);

    let (_, created) = client
        .ensure_admin("admin", "admin@example.com")
        .await
        .unwrap();
    assert!(!created);

    let found = client.find_by_email("admin@example.com").await.unwrap();
    assert_eq!(found.map(|a| a.id), Some(admin.id));
    assert!(client.find_by_email("nobody@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn unique_constraint_maps_to_duplicate_key() {
    let repo = SeaOrmUsersRepository::new(connect().await);
    repo.insert(new_account("jane", "jane@example.com"))
        .await
        .unwrap();

    let err = repo
        .insert(new_account("jane", "other@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::DuplicateKey { field: "username", .. }));

    let err = repo
        .insert(new_account("other", "jane@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::DuplicateKey { field: "email", .. }));
}

#[tokio::test]
async fn admin_operations_through_client() {
    let (_, client) = accounts::build(connect().await);
    let (admin, _) = client
        .ensure_admin("admin", "admin@example.com")
        .await
        .unwrap();
    let ctx = SecurityContext::builder()
        .subject_id(admin.id)
        .username(&admin.username)
        .admin(true)
        .build();

    let jane = client
        .create(&ctx, new_account("jane", "jane@example.com"))
        .await
        .unwrap();
    let jane = client
        .update(
            &ctx,
            jane.id,
            AccountPatch {
                full_name: Some("Jane Doe".to_owned()),
                ..AccountPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(jane.full_name.as_deref(), Some("Jane Doe"));

    let jane = client.toggle_active(&ctx, jane.id).await.unwrap();
    assert!(!jane.is_active);

    let stats = client.stats(&ctx).await.unwrap();
    assert_eq!((stats.total_users, stats.active_users), (2, 1));

    let page = client.list(&ctx, PageRequest::new(1, 1)).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].username, "admin");

    let past_end = client
        .list(&ctx, PageRequest::new(u64::MAX, 10))
        .await
        .unwrap();
    assert_eq!(past_end.total, 2);
    assert!(past_end.items.is_empty());

    assert_eq!(
        client.toggle_active(&ctx, admin.id).await.unwrap_err(),
        AccountsError::SelfDeactivation
    );
    assert!(matches!(
        client.get(&SecurityContext::anonymous(), admin.id).await,
        Err(AccountsError::PermissionDenied { .. })
    ));
}

#[tokio::test]
async fn profile_update_upserts_preferences() {
    let (_, client) = accounts::build(connect().await);
    let (admin, _) = client
        .ensure_admin("admin", "admin@example.com")
        .await
        .unwrap();
    let admin_ctx = SecurityContext::builder()
        .subject_id(admin.id)
        .admin(true)
        .build();
    let jane = client
        .create(&admin_ctx, new_account("jane", "jane@example.com"))
        .await
        .unwrap();
    let ctx = SecurityContext::builder()
        .subject_id(jane.id)
        .username("jane")
        .build();

    let profile = client.profile(&ctx).await.unwrap();
    assert_eq!(profile.preferences.theme, "light");

    let profile = client
        .update_profile(
            &ctx,
            ProfileUpdate {
                full_name: Some("Jane Doe".to_owned()),
                theme: Some("dark".to_owned()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.account.full_name.as_deref(), Some("Jane Doe"));

    let profile = client
        .update_profile(
            &ctx,
            ProfileUpdate {
                language: Some("fr".to_owned()),
                notifications_enabled: Some(false),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(profile.preferences.theme, "dark");
    assert_eq!(profile.preferences.language, "fr");
    assert!(!profile.preferences.notifications_enabled);
    assert_eq!(client.profile(&ctx).await.unwrap(), profile);

    let err = client
        .update_profile(
            &ctx,
            ProfileUpdate {
                email: Some("admin@example.com".to_owned()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AccountsError::DuplicateKey { .. }));
}

#[tokio::test]
async fn deleting_own_account_removes_preferences() {
    let db = connect().await;
    let (_, client) = accounts::build(db.clone());
    let (admin, _) = client
        .ensure_admin("admin", "admin@example.com")
        .await
        .unwrap();
    let ctx = SecurityContext::builder()
        .subject_id(admin.id)
        .admin(true)
        .build();
    client
        .update_profile(
            &ctx,
            ProfileUpdate {
                theme: Some("dark".to_owned()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();

    client.delete_own_account(&ctx).await.unwrap();
    assert!(client.find_by_username("admin").await.unwrap().is_none());

    let repo = SeaOrmUsersRepository::new(db);
    assert!(repo.find_preferences(admin.id).await.unwrap().is_none());
    assert!(matches!(
        client.delete_own_account(&ctx).await,
        Err(AccountsError::NotFound { .. })
    ));
}
