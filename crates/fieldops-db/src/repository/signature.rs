//! SurrealDB implementation of [`SignatureRepository`].
//!
//! Signatures are scoped through the owning user: every verb first
//! pins the user to the scope's tenant.

use chrono::{DateTime, Utc};
use fieldops_core::TenantScope;
use fieldops_core::error::FieldOpsResult;
use fieldops_core::models::signature::{CreateSignature, Signature};
use fieldops_core::repository::SignatureRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SignatureRow {
    user_id: String,
    job_id: Option<String>,
    data: String,
    signed_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct SignatureRowWithId {
    record_id: String,
    user_id: String,
    job_id: Option<String>,
    data: String,
    signed_at: DateTime<Utc>,
}

fn parse_job_id(raw: Option<String>) -> Result<Option<Uuid>, DbError> {
    raw.map(|s| {
        Uuid::parse_str(&s).map_err(|e| DbError::Migration(format!("invalid job UUID: {e}")))
    })
    .transpose()
}

impl SignatureRow {
    fn into_signature(self, id: Uuid) -> Result<Signature, DbError> {
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Migration(format!("invalid user UUID: {e}")))?;
        Ok(Signature {
            id,
            user_id,
            job_id: parse_job_id(self.job_id)?,
            data: self.data,
            signed_at: self.signed_at,
        })
    }
}

impl SignatureRowWithId {
    fn try_into_signature(self) -> Result<Signature, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| DbError::Migration(format!("invalid user UUID: {e}")))?;
        Ok(Signature {
            id,
            user_id,
            job_id: parse_job_id(self.job_id)?,
            data: self.data,
            signed_at: self.signed_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct IdRow {
    record_id: String,
}

/// SurrealDB implementation of the Signature repository.
#[derive(Clone)]
pub struct SurrealSignatureRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSignatureRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Assert that the user belongs to the scope's tenant.
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

impl<C: Connection> SignatureRepository for SurrealSignatureRepository<C> {
    async fn create(
        &self,
        scope: &TenantScope,
        user_id: Uuid,
        input: CreateSignature,
    ) -> FieldOpsResult<Signature> {
        self.require_user_in_tenant(scope, user_id).await?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('signature', $id) SET \
                 user_id = $user_id, \
                 job_id = $job_id, \
                 data = $data",
            )
            .bind(("id", id_str.clone()))
            .bind(("user_id", user_id.to_string()))
            .bind(("job_id", input.job_id.map(|j| j.to_string())))
            .bind(("data", input.data))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<SignatureRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "signature".into(),
            id: id_str,
        })?;

        Ok(row.into_signature(id)?)
    }

    async fn list_for_user(
        &self,
        scope: &TenantScope,
        user_id: Uuid,
    ) -> FieldOpsResult<Vec<Signature>> {
        self.require_user_in_tenant(scope, user_id).await?;

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM signature \
                 WHERE user_id = $user_id \
                 ORDER BY signed_at ASC",
            )
            .bind(("user_id", user_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SignatureRowWithId> = result.take(0).map_err(DbError::from)?;

        let signatures = rows
            .into_iter()
            .map(|row| row.try_into_signature())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(signatures)
    }
}
