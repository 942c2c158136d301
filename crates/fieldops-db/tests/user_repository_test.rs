//! Integration tests for the User repository using in-memory SurrealDB.

use fieldops_core::TenantScope;
use fieldops_core::models::tenant::CreateTenant;
use fieldops_core::models::user::{CreateUser, UpdateUser, UserStatus};
use fieldops_core::repository::{Pagination, TenantRepository, UserRepository};
use fieldops_db::repository::{SurrealTenantRepository, SurrealUserRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

/// Helper: spin up in-memory DB, run migrations, create a tenant scope.
async fn setup() -> (Surreal<Db>, TenantScope) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    fieldops_db::run_migrations(&db).await.unwrap();

    let tenants = SurrealTenantRepository::new(db.clone());
    let tenant = tenants
        .create(CreateTenant {
            name: "Acme Field Services".into(),
            slug: "acme".into(),
            metadata: None,
        })
        .await
        .unwrap();
    let scope = TenantScope::for_tenant(&tenant).unwrap();

    (db, scope)
}

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.into(),
        full_name: "Test User".into(),
        password: "CorrectHorseBattery1!".into(),
        metadata: None,
    }
}

#[tokio::test]
async fn create_and_get_user() {
    let (db, scope) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(&scope, new_user("alice@example.com"))
        .await
        .unwrap();

    assert_eq!(user.tenant_id, Some(scope.tenant_id()));
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.status, UserStatus::Active);

    // Password should be hashed, not stored in plaintext.
    assert_ne!(user.password_hash, "CorrectHorseBattery1!");
    assert!(user.password_hash.starts_with("$argon2id$"));

    let fetched = repo.get_by_id(&scope, user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);
    assert_eq!(fetched.email, "alice@example.com");
}

#[tokio::test]
async fn get_user_by_email() {
    let (db, scope) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(&scope, new_user("bob@example.com"))
        .await
        .unwrap();

    let fetched = repo.get_by_email(&scope, "bob@example.com").await.unwrap();
    assert_eq!(fetched.id, user.id);
}

#[tokio::test]
async fn update_user() {
    let (db, scope) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(&scope, new_user("carol@example.com"))
        .await
        .unwrap();

    let updated = repo
        .update(
            &scope,
            user.id,
            UpdateUser {
                full_name: Some("Carol Jones".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.full_name, "Carol Jones");
    assert_eq!(updated.email, "carol@example.com"); // unchanged
}

#[tokio::test]
async fn soft_delete_user() {
    let (db, scope) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(&scope, new_user("dave@example.com"))
        .await
        .unwrap();

    repo.delete(&scope, user.id).await.unwrap();

    // User should still exist but with Inactive status.
    let fetched = repo.get_by_id(&scope, user.id).await.unwrap();
    assert_eq!(fetched.status, UserStatus::Inactive);
}

#[tokio::test]
async fn list_users_with_pagination() {
    let (db, scope) = setup().await;
    let repo = SurrealUserRepository::new(db);

    for i in 0..5 {
        repo.create(&scope, new_user(&format!("user-{i}@example.com")))
            .await
            .unwrap();
    }

    let page1 = repo
        .list(
            &scope,
            Pagination {
                offset: 0,
                limit: 3,
            },
        )
        .await
        .unwrap();

    assert_eq!(page1.items.len(), 3);
    assert_eq!(page1.total, 5);

    let page2 = repo
        .list(
            &scope,
            Pagination {
                offset: 3,
                limit: 3,
            },
        )
        .await
        .unwrap();

    assert_eq!(page2.items.len(), 2);
}

#[tokio::test]
async fn count_users() {
    let (db, scope) = setup().await;
    let repo = SurrealUserRepository::new(db);

    assert_eq!(repo.count(&scope).await.unwrap(), 0);

    for i in 0..3 {
        repo.create(&scope, new_user(&format!("counted-{i}@example.com")))
            .await
            .unwrap();
    }

    assert_eq!(repo.count(&scope).await.unwrap(), 3);
}

#[tokio::test]
async fn duplicate_email_rejected() {
    let (db, scope) = setup().await;
    let repo = SurrealUserRepository::new(db);

    repo.create(&scope, new_user("same@example.com"))
        .await
        .unwrap();

    let result = repo.create(&scope, new_user("same@example.com")).await;
    assert!(result.is_err(), "duplicate email should be rejected");
}

#[tokio::test]
async fn find_for_identity_ignores_tenant() {
    let (db, scope) = setup().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(&scope, new_user("eve@example.com"))
        .await
        .unwrap();

    let found = repo.find_for_identity(user.id).await.unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.tenant_id, Some(scope.tenant_id()));
}

#[tokio::test]
async fn peppered_hash_differs_from_plain() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    fieldops_db::run_migrations(&db).await.unwrap();

    let tenants = SurrealTenantRepository::new(db.clone());
    let tenant = tenants
        .create(CreateTenant {
            name: "Pepper Co".into(),
            slug: "pepper-co".into(),
            metadata: None,
        })
        .await
        .unwrap();
    let scope = TenantScope::for_tenant(&tenant).unwrap();

    let repo = SurrealUserRepository::with_pepper(db, "server-secret-pepper".into());
    let user = repo
        .create(&scope, new_user("frank@example.com"))
        .await
        .unwrap();

    assert!(user.password_hash.starts_with("$argon2id$"));
}
