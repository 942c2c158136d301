//! Integration tests for quota gating over an in-memory database.

use fieldops_auth::{QuotaAxis, QuotaGate};
use fieldops_core::TenantScope;
use fieldops_core::error::FieldOpsError;
use fieldops_core::models::job::CreateJob;
use fieldops_core::models::quota::SetTenantQuota;
use fieldops_core::models::tenant::CreateTenant;
use fieldops_core::models::user::CreateUser;
use fieldops_core::repository::{
    JobRepository, QuotaRepository, TenantRepository, UserRepository,
};
use fieldops_db::repository::{
    SurrealJobRepository, SurrealQuotaRepository, SurrealTenantRepository, SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

type Gate = QuotaGate<
    SurrealQuotaRepository<Db>,
    SurrealUserRepository<Db>,
    SurrealJobRepository<Db>,
>;

async fn setup() -> (Surreal<Db>, TenantScope, Gate) {
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

    let gate = QuotaGate::new(
        SurrealQuotaRepository::new(db.clone()),
        SurrealUserRepository::new(db.clone()),
        SurrealJobRepository::new(db.clone()),
    );

    (db, scope, gate)
}

async fn add_user(db: &Surreal<Db>, scope: &TenantScope, email: &str) {
    SurrealUserRepository::new(db.clone())
        .create(
            scope,
            CreateUser {
                email: email.into(),
                full_name: "Quota Subject".into(),
                password: "CorrectHorseBattery1!".into(),
                metadata: None,
            },
        )
        .await
        .unwrap();
}

async fn add_job(db: &Surreal<Db>, scope: &TenantScope, reference: &str) {
    SurrealJobRepository::new(db.clone())
        .create(
            scope,
            CreateJob {
                reference: reference.into(),
                title: "Inspection".into(),
                description: "Routine".into(),
                site_address: None,
                scheduled_for: None,
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn no_quota_row_means_unlimited() {
    let (db, scope, gate) = setup().await;

    for i in 0..3 {
        add_user(&db, &scope, &format!("user-{i}@acme.example")).await;
    }

    gate.ensure_capacity(&scope, QuotaAxis::Users).await.unwrap();
    gate.ensure_capacity(&scope, QuotaAxis::Jobs).await.unwrap();
    gate.ensure_capacity(&scope, QuotaAxis::Storage)
        .await
        .unwrap();
}

#[tokio::test]
async fn null_ceiling_means_unlimited_on_that_axis() {
    let (db, scope, gate) = setup().await;

    // A quota row exists but the users ceiling is unset.
    SurrealQuotaRepository::new(db.clone())
        .set(
            &scope,
            SetTenantQuota {
                max_users: None,
                max_jobs_per_month: Some(100),
                max_storage_mb: None,
            },
        )
        .await
        .unwrap();

    for i in 0..3 {
        add_user(&db, &scope, &format!("user-{i}@acme.example")).await;
    }

    gate.ensure_capacity(&scope, QuotaAxis::Users).await.unwrap();
}

#[tokio::test]
async fn user_ceiling_blocks_at_limit() {
    let (db, scope, gate) = setup().await;

    SurrealQuotaRepository::new(db.clone())
        .set(
            &scope,
            SetTenantQuota {
                max_users: Some(2),
                max_jobs_per_month: None,
                max_storage_mb: None,
            },
        )
        .await
        .unwrap();

    add_user(&db, &scope, "one@acme.example").await;
    gate.ensure_capacity(&scope, QuotaAxis::Users).await.unwrap();

    add_user(&db, &scope, "two@acme.example").await;
    let err = gate
        .ensure_capacity(&scope, QuotaAxis::Users)
        .await
        .unwrap_err();

    match err {
        FieldOpsError::QuotaExceeded {
            quota_type,
            quota_limit,
            current_usage,
        } => {
            assert_eq!(quota_type, "users");
            assert_eq!(quota_limit, 2);
            assert_eq!(current_usage, 2);
        }
        other => panic!("expected QuotaExceeded, got {other:?}"),
    }
}

#[tokio::test]
async fn job_ceiling_counts_the_current_month() {
    let (db, scope, gate) = setup().await;

    SurrealQuotaRepository::new(db.clone())
        .set(
            &scope,
            SetTenantQuota {
                max_users: None,
                max_jobs_per_month: Some(2),
                max_storage_mb: None,
            },
        )
        .await
        .unwrap();

    add_job(&db, &scope, "JOB-0001").await;
    gate.ensure_capacity(&scope, QuotaAxis::Jobs).await.unwrap();

    add_job(&db, &scope, "JOB-0002").await;
    let err = gate
        .ensure_capacity(&scope, QuotaAxis::Jobs)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FieldOpsError::QuotaExceeded { quota_type, .. } if quota_type == "jobs"
    ));
}

#[tokio::test]
async fn storage_axis_is_reported_but_never_blocks() {
    let (db, scope, gate) = setup().await;

    SurrealQuotaRepository::new(db.clone())
        .set(
            &scope,
            SetTenantQuota {
                max_users: None,
                max_jobs_per_month: None,
                max_storage_mb: Some(1),
            },
        )
        .await
        .unwrap();

    gate.ensure_capacity(&scope, QuotaAxis::Storage)
        .await
        .unwrap();
}

#[tokio::test]
async fn check_without_scope_passes_through() {
    let (_db, _scope, gate) = setup().await;

    gate.check(None, QuotaAxis::Users).await.unwrap();
    gate.check(None, QuotaAxis::Jobs).await.unwrap();
}
