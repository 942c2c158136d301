//! Integration tests for quota rows and the audit log using in-memory
//! SurrealDB.

use fieldops_core::TenantScope;
use fieldops_core::models::audit::{ActorType, AuditOutcome, CreateAuditLogEntry};
use fieldops_core::models::quota::SetTenantQuota;
use fieldops_core::models::tenant::CreateTenant;
use fieldops_core::repository::{
    AuditLogRepository, Pagination, QuotaRepository, TenantRepository,
};
use fieldops_db::repository::{
    SurrealAuditLogRepository, SurrealQuotaRepository, SurrealTenantRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

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

// ---------------------------------------------------------------------------
// Quotas
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_quota_row_means_unlimited() {
    let (db, scope) = setup().await;
    let repo = SurrealQuotaRepository::new(db);

    let quota = repo.get(&scope).await.unwrap();
    assert!(quota.is_none());
}

#[tokio::test]
async fn set_creates_then_replaces_the_single_row() {
    let (db, scope) = setup().await;
    let repo = SurrealQuotaRepository::new(db.clone());

    let created = repo
        .set(
            &scope,
            SetTenantQuota {
                max_users: Some(10),
                max_jobs_per_month: Some(100),
                max_storage_mb: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(created.tenant_id, scope.tenant_id());
    assert_eq!(created.max_users, Some(10));
    assert_eq!(created.max_storage_mb, None);

    // PUT semantics: omitted ceilings become unlimited, not preserved.
    let replaced = repo
        .set(
            &scope,
            SetTenantQuota {
                max_users: None,
                max_jobs_per_month: Some(50),
                max_storage_mb: Some(2048),
            },
        )
        .await
        .unwrap();

    assert_eq!(replaced.id, created.id);
    assert_eq!(replaced.max_users, None);
    assert_eq!(replaced.max_jobs_per_month, Some(50));
    assert_eq!(replaced.max_storage_mb, Some(2048));

    // Still exactly one row.
    let mut result = db.query("SELECT * FROM tenant_quota").await.unwrap();
    let rows: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn quota_rows_are_tenant_scoped() {
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

    let repo = SurrealQuotaRepository::new(db);
    repo.set(
        &scope_a,
        SetTenantQuota {
            max_users: Some(5),
            max_jobs_per_month: None,
            max_storage_mb: None,
        },
    )
    .await
    .unwrap();

    assert!(repo.get(&scope_b).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Audit log
// ---------------------------------------------------------------------------

#[tokio::test]
async fn append_and_list_audit_entries() {
    let (db, scope) = setup().await;
    let repo = SurrealAuditLogRepository::new(db);

    let entry = repo
        .append(CreateAuditLogEntry {
            tenant_id: Some(scope.tenant_id()),
            actor_id: None,
            actor_type: ActorType::System,
            action: "tenant.signup".into(),
            resource: Some("tenant".into()),
            outcome: AuditOutcome::Success,
            ip_address: None,
            metadata: None,
        })
        .await
        .unwrap();

    assert_eq!(entry.action, "tenant.signup");
    assert_eq!(entry.outcome, AuditOutcome::Success);

    let listed = repo.list(&scope, Pagination::default()).await.unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.items[0].id, entry.id);
}

#[tokio::test]
async fn entries_without_tenant_are_recordable_but_unlisted() {
    let (db, scope) = setup().await;
    let repo = SurrealAuditLogRepository::new(db);

    // Denials are recorded before a tenant is resolved.
    repo.append(CreateAuditLogEntry {
        tenant_id: None,
        actor_id: None,
        actor_type: ActorType::System,
        action: "auth.login".into(),
        resource: None,
        outcome: AuditOutcome::Denied,
        ip_address: Some("203.0.113.9".into()),
        metadata: None,
    })
    .await
    .unwrap();

    let listed = repo.list(&scope, Pagination::default()).await.unwrap();
    assert_eq!(listed.total, 0);
}

#[tokio::test]
async fn audit_entries_list_newest_first() {
    let (db, scope) = setup().await;
    let repo = SurrealAuditLogRepository::new(db);

    for action in ["first", "second", "third"] {
        repo.append(CreateAuditLogEntry {
            tenant_id: Some(scope.tenant_id()),
            actor_id: None,
            actor_type: ActorType::User,
            action: action.into(),
            resource: None,
            outcome: AuditOutcome::Success,
            ip_address: None,
            metadata: None,
        })
        .await
        .unwrap();
    }

    let listed = repo.list(&scope, Pagination::default()).await.unwrap();
    assert_eq!(listed.total, 3);
    assert_eq!(listed.items[0].action, "third");
}
