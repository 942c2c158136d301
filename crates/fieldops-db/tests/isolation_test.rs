//! Cross-tenant isolation tests: rows owned by one tenant must be
//! indistinguishable from nonexistent rows when accessed under another
//! tenant's scope.

use fieldops_core::TenantScope;
use fieldops_core::error::FieldOpsError;
use fieldops_core::models::asset::CreateAsset;
use fieldops_core::models::assignment::CreateJobAssignment;
use fieldops_core::models::job::{CreateJob, UpdateJob};
use fieldops_core::models::signature::CreateSignature;
use fieldops_core::models::tenant::CreateTenant;
use fieldops_core::models::user::CreateUser;
use fieldops_core::models::worker::CreateWorker;
use fieldops_core::repository::{
    AssetRepository, AssignmentRepository, JobRepository, Pagination, SignatureRepository,
    TenantRepository, UserRepository, WorkerRepository,
};
use fieldops_db::repository::{
    SurrealAssetRepository, SurrealAssignmentRepository, SurrealJobRepository,
    SurrealSignatureRepository, SurrealTenantRepository, SurrealUserRepository,
    SurrealWorkerRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

/// Helper: in-memory DB with two active tenants.
async fn setup_two_tenants() -> (Surreal<Db>, TenantScope, TenantScope) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    fieldops_db::run_migrations(&db).await.unwrap();

    let tenants = SurrealTenantRepository::new(db.clone());
    let tenant_a = tenants
        .create(CreateTenant {
            name: "Tenant A".into(),
            slug: "tenant-a".into(),
            metadata: None,
        })
        .await
        .unwrap();
    let tenant_b = tenants
        .create(CreateTenant {
            name: "Tenant B".into(),
            slug: "tenant-b".into(),
            metadata: None,
        })
        .await
        .unwrap();

    let scope_a = TenantScope::for_tenant(&tenant_a).unwrap();
    let scope_b = TenantScope::for_tenant(&tenant_b).unwrap();

    (db, scope_a, scope_b)
}

fn assert_not_found<T: std::fmt::Debug>(result: Result<T, FieldOpsError>) {
    match result {
        Err(FieldOpsError::NotFound { .. }) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn users_are_invisible_across_tenants() {
    let (db, scope_a, scope_b) = setup_two_tenants().await;
    let repo = SurrealUserRepository::new(db);

    let user = repo
        .create(
            &scope_a,
            CreateUser {
                email: "isolated@example.com".into(),
                full_name: "Isolated".into(),
                password: "CorrectHorseBattery1!".into(),
                metadata: None,
            },
        )
        .await
        .unwrap();

    assert!(repo.get_by_id(&scope_a, user.id).await.is_ok());

    assert_not_found(repo.get_by_id(&scope_b, user.id).await);
    assert_not_found(repo.get_by_email(&scope_b, "isolated@example.com").await);

    let listed = repo.list(&scope_b, Pagination::default()).await.unwrap();
    assert_eq!(listed.total, 0);
    assert_eq!(repo.count(&scope_b).await.unwrap(), 0);

    // A foreign soft-delete deletes nothing.
    repo.delete(&scope_b, user.id).await.unwrap();
    let intact = repo.get_by_id(&scope_a, user.id).await.unwrap();
    assert_eq!(intact.status, fieldops_core::models::user::UserStatus::Active);
}

#[tokio::test]
async fn workers_are_invisible_across_tenants() {
    let (db, scope_a, scope_b) = setup_two_tenants().await;
    let repo = SurrealWorkerRepository::new(db);

    let worker = repo
        .create(
            &scope_a,
            CreateWorker {
                full_name: "Jo Technician".into(),
                email: "jo@a.example".into(),
                phone: None,
                job_title: None,
            },
        )
        .await
        .unwrap();

    assert_not_found(repo.get_by_id(&scope_b, worker.id).await);

    // The row survives a foreign delete attempt.
    repo.delete(&scope_b, worker.id).await.unwrap();
    assert!(repo.get_by_id(&scope_a, worker.id).await.is_ok());
}

#[tokio::test]
async fn jobs_are_invisible_across_tenants() {
    let (db, scope_a, scope_b) = setup_two_tenants().await;
    let repo = SurrealJobRepository::new(db);

    let job = repo
        .create(
            &scope_a,
            CreateJob {
                reference: "JOB-0001".into(),
                title: "Inspection".into(),
                description: "Routine".into(),
                site_address: None,
                scheduled_for: None,
            },
        )
        .await
        .unwrap();

    assert_not_found(repo.get_by_id(&scope_b, job.id).await);
    assert_not_found(
        repo.update(
            &scope_b,
            job.id,
            UpdateJob {
                title: Some("Hijacked".into()),
                ..Default::default()
            },
        )
        .await,
    );

    // The foreign update attempt left the row untouched.
    let intact = repo.get_by_id(&scope_a, job.id).await.unwrap();
    assert_eq!(intact.title, "Inspection");
}

#[tokio::test]
async fn assets_are_invisible_across_tenants() {
    let (db, scope_a, scope_b) = setup_two_tenants().await;
    let repo = SurrealAssetRepository::new(db);

    let asset = repo
        .create(
            &scope_a,
            CreateAsset {
                name: "Thermal Camera".into(),
                asset_tag: "CAM-0001".into(),
                category: None,
                location: None,
            },
        )
        .await
        .unwrap();

    assert_not_found(repo.get_by_id(&scope_b, asset.id).await);
    let listed = repo.list(&scope_b, Pagination::default()).await.unwrap();
    assert_eq!(listed.total, 0);
}

#[tokio::test]
async fn assignments_are_scoped_through_the_job() {
    let (db, scope_a, scope_b) = setup_two_tenants().await;
    let jobs = SurrealJobRepository::new(db.clone());
    let workers = SurrealWorkerRepository::new(db.clone());
    let assignments = SurrealAssignmentRepository::new(db);

    let job = jobs
        .create(
            &scope_a,
            CreateJob {
                reference: "JOB-0002".into(),
                title: "Install".into(),
                description: "New unit".into(),
                site_address: None,
                scheduled_for: None,
            },
        )
        .await
        .unwrap();
    let worker = workers
        .create(
            &scope_a,
            CreateWorker {
                full_name: "Sam".into(),
                email: "sam@a.example".into(),
                phone: None,
                job_title: None,
            },
        )
        .await
        .unwrap();

    let assignment = assignments
        .create(
            &scope_a,
            job.id,
            CreateJobAssignment {
                worker_id: worker.id,
                note: None,
            },
        )
        .await
        .unwrap();

    // Under the foreign scope the job itself is invisible, so every
    // assignment verb reports NotFound.
    assert_not_found(
        assignments
            .create(
                &scope_b,
                job.id,
                CreateJobAssignment {
                    worker_id: worker.id,
                    note: None,
                },
            )
            .await,
    );
    assert_not_found(assignments.list_for_job(&scope_b, job.id).await);
    assert_not_found(assignments.delete(&scope_b, job.id, assignment.id).await);

    // Still present under the owning scope.
    let listed = assignments.list_for_job(&scope_a, job.id).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn signatures_are_scoped_through_the_user() {
    let (db, scope_a, scope_b) = setup_two_tenants().await;
    let users = SurrealUserRepository::new(db.clone());
    let signatures = SurrealSignatureRepository::new(db);

    let user = users
        .create(
            &scope_a,
            CreateUser {
                email: "signer@a.example".into(),
                full_name: "Signer".into(),
                password: "CorrectHorseBattery1!".into(),
                metadata: None,
            },
        )
        .await
        .unwrap();

    signatures
        .create(
            &scope_a,
            user.id,
            CreateSignature {
                job_id: None,
                data: "aW1hZ2U=".into(),
            },
        )
        .await
        .unwrap();

    assert_not_found(
        signatures
            .create(
                &scope_b,
                user.id,
                CreateSignature {
                    job_id: None,
                    data: "aW1hZ2U=".into(),
                },
            )
            .await,
    );
    assert_not_found(signatures.list_for_user(&scope_b, user.id).await);

    let listed = signatures.list_for_user(&scope_a, user.id).await.unwrap();
    assert_eq!(listed.len(), 1);
}
