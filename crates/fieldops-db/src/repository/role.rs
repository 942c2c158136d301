//! SurrealDB implementation of [`RoleRepository`].
//!
//! Role membership is stored as graph edges: `user -> has_role -> role`.
//! Assignment verifies that both endpoints belong to the scope's tenant
//! before creating the edge, so a handler cannot attach another
//! tenant's role to one of its users.

use chrono::{DateTime, Utc};
use fieldops_core::TenantScope;
use fieldops_core::error::FieldOpsResult;
use fieldops_core::models::role::{CreateRole, Role};
use fieldops_core::repository::RoleRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RoleRow {
    tenant_id: Option<String>,
    name: String,
    slug: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct RoleRowWithId {
    record_id: String,
    tenant_id: Option<String>,
    name: String,
    slug: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_tenant_id(raw: Option<String>) -> Result<Option<Uuid>, DbError> {
    raw.map(|s| {
        Uuid::parse_str(&s).map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))
    })
    .transpose()
}

impl RoleRow {
    fn into_role(self, id: Uuid) -> Result<Role, DbError> {
        Ok(Role {
            id,
            tenant_id: parse_tenant_id(self.tenant_id)?,
            name: self.name,
            slug: self.slug,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl RoleRowWithId {
    fn try_into_role(self) -> Result<Role, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Role {
            id,
            tenant_id: parse_tenant_id(self.tenant_id)?,
            name: self.name,
            slug: self.slug,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Bare record-id projection used by the tenant-membership checks.
#[derive(Debug, SurrealValue)]
struct IdRow {
    record_id: String,
}

/// SurrealDB implementation of the Role repository.
#[derive(Clone)]
pub struct SurrealRoleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Assert that the given role belongs to the scope's tenant.
    ///
    /// A role owned by another tenant is reported as NotFound, the same
    /// answer a nonexistent role gets.
    async fn require_role_in_tenant(
        &self,
        scope: &TenantScope,
        role_id: Uuid,
    ) -> Result<(), DbError> {
        let role_id_str = role_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id FROM type::record('role', $role_id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("role_id", role_id_str.clone()))
            .bind(("tenant_id", scope.tenant_id().to_string()))
            .await?;

        let rows: Vec<IdRow> = result.take(0)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "role".into(),
                id: role_id_str,
            });
        }
        Ok(())
    }

    /// Assert that the given user belongs to the scope's tenant.
    async fn require_user_in_tenant(
        &self,
        scope: &TenantScope,
        user_id: Uuid,
    ) -> Result<(), DbError> {
        let user_id_str = user_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id FROM type::record('user', $user_id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("user_id", user_id_str.clone()))
            .bind(("tenant_id", scope.tenant_id().to_string()))
            .await?;

        let rows: Vec<IdRow> = result.take(0)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: user_id_str,
            });
        }
        Ok(())
    }
}

impl<C: Connection> RoleRepository for SurrealRoleRepository<C> {
    async fn create(&self, scope: &TenantScope, input: CreateRole) -> FieldOpsResult<Role> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let tenant_id_str = scope.tenant_id().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('role', $id) SET \
                 tenant_id = $tenant_id, \
                 name = $name, slug = $slug, \
                 description = $description",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id_str))
            .bind(("name", input.name))
            .bind(("slug", input.slug))
            .bind(("description", input.description))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: id_str,
        })?;

        Ok(row.into_role(id)?)
    }

    async fn get_by_slug(&self, scope: &TenantScope, slug: &str) -> FieldOpsResult<Role> {
        let tenant_id_str = scope.tenant_id().to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 WHERE tenant_id = $tenant_id AND slug = $slug",
            )
            .bind(("tenant_id", tenant_id_str))
            .bind(("slug", slug.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            id: format!("slug={slug}"),
        })?;

        Ok(row.try_into_role()?)
    }

    async fn list(&self, scope: &TenantScope) -> FieldOpsResult<Vec<Role>> {
        let tenant_id_str = scope.tenant_id().to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY name ASC",
            )
            .bind(("tenant_id", tenant_id_str))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;

        let roles = rows
            .into_iter()
            .map(|row| row.try_into_role())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(roles)
    }

    async fn assign_to_user(
        &self,
        scope: &TenantScope,
        user_id: Uuid,
        role_id: Uuid,
    ) -> FieldOpsResult<()> {
        self.require_user_in_tenant(scope, user_id).await?;
        self.require_role_in_tenant(scope, role_id).await?;

        let user_id_str = user_id.to_string();
        let role_id_str = role_id.to_string();

        let query =
            format!("RELATE user:`{user_id_str}` -> has_role -> role:`{role_id_str}`;");

        self.db.query(query).await.map_err(DbError::from)?;

        Ok(())
    }

    async fn unassign_from_user(
        &self,
        scope: &TenantScope,
        user_id: Uuid,
        role_id: Uuid,
    ) -> FieldOpsResult<()> {
        self.require_user_in_tenant(scope, user_id).await?;
        self.require_role_in_tenant(scope, role_id).await?;

        self.db
            .query(
                "DELETE has_role WHERE \
                 in = type::record('user', $user_id) AND \
                 out = type::record('role', $role_id)",
            )
            .bind(("user_id", user_id.to_string()))
            .bind(("role_id", role_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn roles_for_user(&self, user_id: Uuid) -> FieldOpsResult<Vec<Role>> {
        let user_id_str = user_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 WHERE id IN (\
                     SELECT VALUE out FROM has_role \
                     WHERE in = type::record('user', $user_id)\
                 )",
            )
            .bind(("user_id", user_id_str))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;

        let roles = rows
            .into_iter()
            .map(|row| row.try_into_role())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(roles)
    }
}
