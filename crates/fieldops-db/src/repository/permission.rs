//! SurrealDB implementation of [`PermissionRepository`].
//!
//! Permissions are a global catalog keyed by a dotted, namespaced
//! string. Grants are graph edges: `role -> grants -> permission`.

use chrono::{DateTime, Utc};
use fieldops_core::error::FieldOpsResult;
use fieldops_core::models::permission::{CreatePermission, Permission};
use fieldops_core::repository::PermissionRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct PermissionRow {
    key: String,
    slug: String,
    description: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct PermissionRowWithId {
    record_id: String,
    key: String,
    slug: String,
    description: String,
    created_at: DateTime<Utc>,
}

impl PermissionRow {
    fn into_permission(self, id: Uuid) -> Permission {
        Permission {
            id,
            key: self.key,
            slug: self.slug,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

impl PermissionRowWithId {
    fn try_into_permission(self) -> Result<Permission, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(Permission {
            id,
            key: self.key,
            slug: self.slug,
            description: self.description,
            created_at: self.created_at,
        })
    }
}

/// Projection used by the per-user permission-key query.
#[derive(Debug, SurrealValue)]
struct KeyRow {
    key: String,
}

/// SurrealDB implementation of the Permission repository.
#[derive(Clone)]
pub struct SurrealPermissionRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPermissionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PermissionRepository for SurrealPermissionRepository<C> {
    async fn ensure(&self, input: CreatePermission) -> FieldOpsResult<Permission> {
        // Idempotent: an existing row with the same key wins.
        if let Ok(existing) = self.get_by_key(&input.key).await {
            return Ok(existing);
        }

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('permission', $id) SET \
                 key = $key, slug = $slug, \
                 description = $description",
            )
            .bind(("id", id_str.clone()))
            .bind(("key", input.key))
            .bind(("slug", input.slug))
            .bind(("description", input.description))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<PermissionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "permission".into(),
            id: id_str,
        })?;

        Ok(row.into_permission(id))
    }

    async fn get_by_key(&self, key: &str) -> FieldOpsResult<Permission> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM permission \
                 WHERE key = $key",
            )
            .bind(("key", key.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PermissionRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "permission".into(),
            id: format!("key={key}"),
        })?;

        Ok(row.try_into_permission()?)
    }

    async fn list(&self) -> FieldOpsResult<Vec<Permission>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM permission \
                 ORDER BY key ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PermissionRowWithId> = result.take(0).map_err(DbError::from)?;

        let permissions = rows
            .into_iter()
            .map(|row| row.try_into_permission())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(permissions)
    }

    async fn grant_to_role(&self, role_id: Uuid, permission_id: Uuid) -> FieldOpsResult<()> {
        let role_id_str = role_id.to_string();
        let permission_id_str = permission_id.to_string();

        let query = format!(
            "RELATE role:`{role_id_str}` -> grants -> permission:`{permission_id_str}`;"
        );

        self.db.query(query).await.map_err(DbError::from)?;

        Ok(())
    }

    async fn keys_for_user(&self, user_id: Uuid) -> FieldOpsResult<Vec<String>> {
        let user_id_str = user_id.to_string();

        // Two hops: user -> has_role -> role -> grants -> permission.
        let mut result = self
            .db
            .query(
                "SELECT key FROM permission \
                 WHERE id IN (\
                     SELECT VALUE out FROM grants \
                     WHERE in IN (\
                         SELECT VALUE out FROM has_role \
                         WHERE in = type::record('user', $user_id)\
                     )\
                 )",
            )
            .bind(("user_id", user_id_str))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<KeyRow> = result.take(0).map_err(DbError::from)?;

        Ok(rows.into_iter().map(|r| r.key).collect())
    }
}
