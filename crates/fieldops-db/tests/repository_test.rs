//! Integration tests for tenant, worker and asset repositories using
//! in-memory SurrealDB.

use fieldops_core::TenantScope;
use fieldops_core::error::FieldOpsError;
use fieldops_core::models::asset::{AssetStatus, CreateAsset, UpdateAsset};
use fieldops_core::models::tenant::{CreateTenant, TenantStatus, UpdateTenant};
use fieldops_core::models::worker::{CreateWorker, UpdateWorker};
use fieldops_core::repository::{
    AssetRepository, Pagination, TenantRepository, WorkerRepository,
};
use fieldops_db::repository::{
    SurrealAssetRepository, SurrealTenantRepository, SurrealWorkerRepository,
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
// Tenants
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_tenant() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    fieldops_db::run_migrations(&db).await.unwrap();

    let repo = SurrealTenantRepository::new(db);
    let tenant = repo
        .create(CreateTenant {
            name: "Northwind Maintenance".into(),
            slug: "northwind".into(),
            metadata: None,
        })
        .await
        .unwrap();

    assert_eq!(tenant.name, "Northwind Maintenance");
    assert_eq!(tenant.slug, "northwind");
    assert_eq!(tenant.status, TenantStatus::Active);

    let by_id = repo.get_by_id(tenant.id).await.unwrap();
    assert_eq!(by_id.id, tenant.id);

    let by_slug = repo.get_by_slug("northwind").await.unwrap();
    assert_eq!(by_slug.id, tenant.id);
}

#[tokio::test]
async fn unknown_tenant_slug_is_not_found() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    fieldops_db::run_migrations(&db).await.unwrap();

    let repo = SurrealTenantRepository::new(db);
    let result = repo.get_by_slug("no-such-tenant").await;
    assert!(matches!(result, Err(FieldOpsError::NotFound { .. })));
}

#[tokio::test]
async fn suspend_tenant() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    fieldops_db::run_migrations(&db).await.unwrap();

    let repo = SurrealTenantRepository::new(db);
    let tenant = repo
        .create(CreateTenant {
            name: "Suspendable".into(),
            slug: "suspendable".into(),
            metadata: None,
        })
        .await
        .unwrap();

    let updated = repo
        .update(
            tenant.id,
            UpdateTenant {
                status: Some(TenantStatus::Suspended),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, TenantStatus::Suspended);

    // A suspended tenant can no longer produce a scope.
    assert!(matches!(
        TenantScope::for_tenant(&updated),
        Err(FieldOpsError::TenantNotActive { .. })
    ));
}

// ---------------------------------------------------------------------------
// Workers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn worker_crud() {
    let (db, scope) = setup().await;
    let repo = SurrealWorkerRepository::new(db);

    let worker = repo
        .create(
            &scope,
            CreateWorker {
                full_name: "Jo Technician".into(),
                email: "jo@acme.example".into(),
                phone: Some("+1-555-0100".into()),
                job_title: Some("HVAC Technician".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(worker.tenant_id, scope.tenant_id());
    assert!(worker.active);

    let fetched = repo.get_by_id(&scope, worker.id).await.unwrap();
    assert_eq!(fetched.full_name, "Jo Technician");

    let updated = repo
        .update(
            &scope,
            worker.id,
            UpdateWorker {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(!updated.active);
    assert_eq!(updated.email, "jo@acme.example"); // unchanged

    repo.delete(&scope, worker.id).await.unwrap();
    let gone = repo.get_by_id(&scope, worker.id).await;
    assert!(matches!(gone, Err(FieldOpsError::NotFound { .. })));
}

#[tokio::test]
async fn list_workers_with_pagination() {
    let (db, scope) = setup().await;
    let repo = SurrealWorkerRepository::new(db);

    for i in 0..4 {
        repo.create(
            &scope,
            CreateWorker {
                full_name: format!("Worker {i}"),
                email: format!("worker-{i}@acme.example"),
                phone: None,
                job_title: None,
            },
        )
        .await
        .unwrap();
    }

    let page = repo
        .list(
            &scope,
            Pagination {
                offset: 0,
                limit: 2,
            },
        )
        .await
        .unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 4);
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn asset_crud() {
    let (db, scope) = setup().await;
    let repo = SurrealAssetRepository::new(db);

    let asset = repo
        .create(
            &scope,
            CreateAsset {
                name: "Thermal Camera".into(),
                asset_tag: "CAM-0001".into(),
                category: Some("diagnostics".into()),
                location: Some("Van 3".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(asset.tenant_id, scope.tenant_id());
    assert_eq!(asset.status, AssetStatus::InService);

    let updated = repo
        .update(
            &scope,
            asset.id,
            UpdateAsset {
                status: Some(AssetStatus::InRepair),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, AssetStatus::InRepair);
    assert_eq!(updated.asset_tag, "CAM-0001"); // immutable

    repo.delete(&scope, asset.id).await.unwrap();
    let gone = repo.get_by_id(&scope, asset.id).await;
    assert!(matches!(gone, Err(FieldOpsError::NotFound { .. })));
}

#[tokio::test]
async fn duplicate_asset_tag_rejected() {
    let (db, scope) = setup().await;
    let repo = SurrealAssetRepository::new(db);

    repo.create(
        &scope,
        CreateAsset {
            name: "Ladder A".into(),
            asset_tag: "LAD-0001".into(),
            category: None,
            location: None,
        },
    )
    .await
    .unwrap();

    let result = repo
        .create(
            &scope,
            CreateAsset {
                name: "Ladder B".into(),
                asset_tag: "LAD-0001".into(),
                category: None,
                location: None,
            },
        )
        .await;

    assert!(result.is_err(), "duplicate asset tag should be rejected");
}
