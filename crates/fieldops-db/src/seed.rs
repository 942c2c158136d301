//! Permission catalog and stock-role provisioning.
//!
//! The permission catalog is global and idempotent: `seed_permissions`
//! can run on every startup. Stock roles are per tenant and created
//! once, at tenant signup.

use fieldops_core::TenantScope;
use fieldops_core::error::FieldOpsResult;
use fieldops_core::models::permission::{CreatePermission, Permission};
use fieldops_core::models::role::{ADMINISTRATOR_ROLE, CreateRole, Role};
use fieldops_core::repository::{PermissionRepository, RoleRepository};
use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::repository::{SurrealPermissionRepository, SurrealRoleRepository};

/// The built-in permission catalog: (key, slug, description).
pub const PERMISSION_CATALOG: &[(&str, &str, &str)] = &[
    ("users.view", "users-view", "View users within the tenant"),
    ("users.create", "users-create", "Create users within the tenant"),
    ("users.update", "users-update", "Update users within the tenant"),
    ("users.delete", "users-delete", "Deactivate users within the tenant"),
    ("workers.view", "workers-view", "View field workers"),
    ("workers.create", "workers-create", "Create field workers"),
    ("workers.update", "workers-update", "Update field workers"),
    ("workers.delete", "workers-delete", "Delete field workers"),
    ("jobs.view", "jobs-view", "View jobs"),
    ("jobs.create", "jobs-create", "Create jobs"),
    ("jobs.update", "jobs-update", "Update jobs"),
    ("jobs.delete", "jobs-delete", "Delete jobs"),
    ("jobs.assign", "jobs-assign", "Assign workers to jobs"),
    ("assets.view", "assets-view", "View assets"),
    ("assets.create", "assets-create", "Create assets"),
    ("assets.update", "assets-update", "Update assets"),
    ("assets.delete", "assets-delete", "Delete assets"),
];

/// Permission keys granted to the stock `worker` role.
const WORKER_GRANTS: &[&str] = &["jobs.view", "jobs.update", "workers.view", "assets.view"];

/// The three roles provisioned for every new tenant.
pub struct StockRoles {
    pub admin: Role,
    pub manager: Role,
    pub worker: Role,
}

/// Ensure every catalog permission exists. Safe to run on every boot.
pub async fn seed_permissions<C: Connection>(db: &Surreal<C>) -> FieldOpsResult<Vec<Permission>> {
    let repo = SurrealPermissionRepository::new(db.clone());

    let mut permissions = Vec::with_capacity(PERMISSION_CATALOG.len());
    for (key, slug, description) in PERMISSION_CATALOG {
        let permission = repo
            .ensure(CreatePermission {
                key: (*key).to_string(),
                slug: (*slug).to_string(),
                description: (*description).to_string(),
            })
            .await?;
        permissions.push(permission);
    }

    info!(count = permissions.len(), "Permission catalog seeded");

    Ok(permissions)
}

/// Create the stock roles for a freshly signed-up tenant and wire up
/// their default grants.
///
/// The `Administrator` role carries no explicit grants; holders pass
/// every permission check by name. The `manager` role is granted the
/// full catalog, the `worker` role a read-mostly subset.
pub async fn provision_stock_roles<C: Connection>(
    db: &Surreal<C>,
    scope: &TenantScope,
) -> FieldOpsResult<StockRoles> {
    let role_repo = SurrealRoleRepository::new(db.clone());
    let permission_repo = SurrealPermissionRepository::new(db.clone());

    let admin = role_repo
        .create(
            scope,
            CreateRole {
                name: ADMINISTRATOR_ROLE.to_string(),
                slug: "admin".to_string(),
                description: "Full access to everything in the tenant".to_string(),
            },
        )
        .await?;

    let manager = role_repo
        .create(
            scope,
            CreateRole {
                name: "manager".to_string(),
                slug: "manager".to_string(),
                description: "Manages users, workers, jobs and assets".to_string(),
            },
        )
        .await?;

    let worker = role_repo
        .create(
            scope,
            CreateRole {
                name: "worker".to_string(),
                slug: "worker".to_string(),
                description: "Views and progresses assigned jobs".to_string(),
            },
        )
        .await?;

    for (key, _, _) in PERMISSION_CATALOG {
        let permission = permission_repo.get_by_key(key).await?;
        permission_repo
            .grant_to_role(manager.id, permission.id)
            .await?;
        if WORKER_GRANTS.contains(key) {
            permission_repo
                .grant_to_role(worker.id, permission.id)
                .await?;
        }
    }

    info!(
        tenant = %scope.slug(),
        "Stock roles provisioned"
    );

    Ok(StockRoles {
        admin,
        manager,
        worker,
    })
}
