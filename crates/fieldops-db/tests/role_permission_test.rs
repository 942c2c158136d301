//! Integration tests for roles, permissions and the seeded catalog
//! using in-memory SurrealDB.

use fieldops_core::TenantScope;
use fieldops_core::error::FieldOpsError;
use fieldops_core::models::role::ADMINISTRATOR_ROLE;
use fieldops_core::models::tenant::CreateTenant;
use fieldops_core::models::user::CreateUser;
use fieldops_core::repository::{
    PermissionRepository, RoleRepository, TenantRepository, UserRepository,
};
use fieldops_db::repository::{
    SurrealPermissionRepository, SurrealRoleRepository, SurrealTenantRepository,
    SurrealUserRepository,
};
use fieldops_db::seed::{self, PERMISSION_CATALOG};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

async fn setup() -> (Surreal<Db>, TenantScope) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    fieldops_db::run_migrations(&db).await.unwrap();
    seed::seed_permissions(&db).await.unwrap();

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

async fn create_user(db: &Surreal<Db>, scope: &TenantScope, email: &str) -> uuid::Uuid {
    let users = SurrealUserRepository::new(db.clone());
    users
        .create(
            scope,
            CreateUser {
                email: email.into(),
                full_name: "Test User".into(),
                password: "CorrectHorseBattery1!".into(),
                metadata: None,
            },
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn permission_seeding_is_idempotent() {
    let (db, _scope) = setup().await;

    // Seed again on top of the setup run.
    seed::seed_permissions(&db).await.unwrap();

    let permissions = SurrealPermissionRepository::new(db);
    let all = permissions.list().await.unwrap();
    assert_eq!(all.len(), PERMISSION_CATALOG.len());
}

#[tokio::test]
async fn stock_roles_carry_expected_grants() {
    let (db, scope) = setup().await;

    let stock = seed::provision_stock_roles(&db, &scope).await.unwrap();
    assert_eq!(stock.admin.name, ADMINISTRATOR_ROLE);
    assert_eq!(stock.manager.slug, "manager");
    assert_eq!(stock.worker.slug, "worker");

    let roles = SurrealRoleRepository::new(db.clone());
    let permissions = SurrealPermissionRepository::new(db.clone());

    // Manager holds the full catalog.
    let manager_id = create_user(&db, &scope, "manager@acme.example").await;
    roles
        .assign_to_user(&scope, manager_id, stock.manager.id)
        .await
        .unwrap();
    let keys = permissions.keys_for_user(manager_id).await.unwrap();
    assert_eq!(keys.len(), PERMISSION_CATALOG.len());
    assert!(keys.iter().any(|k| k == "users.delete"));

    // Worker holds a read-mostly subset.
    let worker_id = create_user(&db, &scope, "worker@acme.example").await;
    roles
        .assign_to_user(&scope, worker_id, stock.worker.id)
        .await
        .unwrap();
    let keys = permissions.keys_for_user(worker_id).await.unwrap();
    assert!(keys.iter().any(|k| k == "jobs.view"));
    assert!(!keys.iter().any(|k| k == "users.create"));

    // Admin role has no explicit grants; the name is the bypass.
    let admin_id = create_user(&db, &scope, "admin@acme.example").await;
    roles
        .assign_to_user(&scope, admin_id, stock.admin.id)
        .await
        .unwrap();
    let keys = permissions.keys_for_user(admin_id).await.unwrap();
    assert!(keys.is_empty());
}

#[tokio::test]
async fn roles_for_user_reflects_assignment() {
    let (db, scope) = setup().await;

    let stock = seed::provision_stock_roles(&db, &scope).await.unwrap();
    let roles = SurrealRoleRepository::new(db.clone());
    let user_id = create_user(&db, &scope, "holder@acme.example").await;

    assert!(roles.roles_for_user(user_id).await.unwrap().is_empty());

    roles
        .assign_to_user(&scope, user_id, stock.worker.id)
        .await
        .unwrap();

    let held = roles.roles_for_user(user_id).await.unwrap();
    assert_eq!(held.len(), 1);
    assert_eq!(held[0].slug, "worker");

    roles
        .unassign_from_user(&scope, user_id, stock.worker.id)
        .await
        .unwrap();
    assert!(roles.roles_for_user(user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn get_role_by_slug() {
    let (db, scope) = setup().await;
    let stock = seed::provision_stock_roles(&db, &scope).await.unwrap();

    let roles = SurrealRoleRepository::new(db);
    let found = roles.get_by_slug(&scope, "manager").await.unwrap();
    assert_eq!(found.id, stock.manager.id);

    let missing = roles.get_by_slug(&scope, "superuser").await;
    assert!(matches!(missing, Err(FieldOpsError::NotFound { .. })));
}

#[tokio::test]
async fn assigning_foreign_tenant_role_fails() {
    let (db, scope_a) = setup().await;

    let tenants = SurrealTenantRepository::new(db.clone());
    let tenant_b = tenants
        .create(CreateTenant {
            name: "Other Co".into(),
            slug: "other-co".into(),
            metadata: None,
        })
        .await
        .unwrap();
    let scope_b = TenantScope::for_tenant(&tenant_b).unwrap();

    let stock_b = seed::provision_stock_roles(&db, &scope_b).await.unwrap();

    let roles = SurrealRoleRepository::new(db.clone());
    let user_a = create_user(&db, &scope_a, "victim@acme.example").await;

    // Role belongs to tenant B, assignment is attempted under scope A.
    let result = roles.assign_to_user(&scope_a, user_a, stock_b.admin.id).await;
    assert!(matches!(result, Err(FieldOpsError::NotFound { .. })));

    // No edge was created.
    assert!(roles.roles_for_user(user_a).await.unwrap().is_empty());
}
