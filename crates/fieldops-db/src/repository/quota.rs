//! SurrealDB implementation of [`QuotaRepository`].
//!
//! At most one quota row exists per tenant (unique index on
//! `tenant_id`). A missing row means the tenant is unlimited on every
//! axis, which is why `get` returns an `Option`.

use chrono::{DateTime, Utc};
use fieldops_core::TenantScope;
use fieldops_core::error::FieldOpsResult;
use fieldops_core::models::quota::{SetTenantQuota, TenantQuota};
use fieldops_core::repository::QuotaRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct QuotaRow {
    tenant_id: String,
    max_users: Option<u32>,
    max_jobs_per_month: Option<u32>,
    max_storage_mb: Option<u64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct QuotaRowWithId {
    record_id: String,
    tenant_id: String,
    max_users: Option<u32>,
    max_jobs_per_month: Option<u32>,
    max_storage_mb: Option<u64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl QuotaRow {
    fn into_quota(self, id: Uuid) -> Result<TenantQuota, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        Ok(TenantQuota {
            id,
            tenant_id,
            max_users: self.max_users,
            max_jobs_per_month: self.max_jobs_per_month,
            max_storage_mb: self.max_storage_mb,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl QuotaRowWithId {
    fn try_into_quota(self) -> Result<TenantQuota, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        Ok(TenantQuota {
            id,
            tenant_id,
            max_users: self.max_users,
            max_jobs_per_month: self.max_jobs_per_month,
            max_storage_mb: self.max_storage_mb,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Quota repository.
#[derive(Clone)]
pub struct SurrealQuotaRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealQuotaRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> QuotaRepository for SurrealQuotaRepository<C> {
    async fn get(&self, scope: &TenantScope) -> FieldOpsResult<Option<TenantQuota>> {
        let tenant_id_str = scope.tenant_id().to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM tenant_quota \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("tenant_id", tenant_id_str))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<QuotaRowWithId> = result.take(0).map_err(DbError::from)?;

        rows.into_iter()
            .next()
            .map(|row| row.try_into_quota())
            .transpose()
            .map_err(Into::into)
    }

    async fn set(&self, scope: &TenantScope, input: SetTenantQuota) -> FieldOpsResult<TenantQuota> {
        let tenant_id_str = scope.tenant_id().to_string();

        // Replace semantics: update the existing row if one exists,
        // otherwise create it.
        let existing = self.get(scope).await?;

        let (query, id) = match &existing {
            Some(quota) => (
                "UPDATE type::record('tenant_quota', $id) SET \
                 max_users = $max_users, \
                 max_jobs_per_month = $max_jobs_per_month, \
                 max_storage_mb = $max_storage_mb, \
                 updated_at = time::now()",
                quota.id,
            ),
            None => (
                "CREATE type::record('tenant_quota', $id) SET \
                 tenant_id = $tenant_id, \
                 max_users = $max_users, \
                 max_jobs_per_month = $max_jobs_per_month, \
                 max_storage_mb = $max_storage_mb",
                Uuid::new_v4(),
            ),
        };

        let id_str = id.to_string();

        let result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id_str))
            .bind(("max_users", input.max_users))
            .bind(("max_jobs_per_month", input.max_jobs_per_month))
            .bind(("max_storage_mb", input.max_storage_mb))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<QuotaRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant_quota".into(),
            id: id_str,
        })?;

        Ok(row.into_quota(id)?)
    }
}
