//! SurrealDB implementation of [`AssignmentRepository`].
//!
//! Assignments carry no `tenant_id` of their own. Every verb first
//! pins the owning job to the scope's tenant, so a job belonging to
//! another tenant (and its assignments) answers NotFound exactly like
//! a job that does not exist.

use chrono::{DateTime, Utc};
use fieldops_core::TenantScope;
use fieldops_core::error::FieldOpsResult;
use fieldops_core::models::assignment::{CreateJobAssignment, JobAssignment};
use fieldops_core::repository::AssignmentRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AssignmentRow {
    job_id: String,
    worker_id: String,
    note: Option<String>,
    assigned_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AssignmentRowWithId {
    record_id: String,
    job_id: String,
    worker_id: String,
    note: Option<String>,
    assigned_at: DateTime<Utc>,
}

impl AssignmentRow {
    fn into_assignment(self, id: Uuid) -> Result<JobAssignment, DbError> {
        let job_id = Uuid::parse_str(&self.job_id)
            .map_err(|e| DbError::Migration(format!("invalid job UUID: {e}")))?;
        let worker_id = Uuid::parse_str(&self.worker_id)
            .map_err(|e| DbError::Migration(format!("invalid worker UUID: {e}")))?;
        Ok(JobAssignment {
            id,
            job_id,
            worker_id,
            note: self.note,
            assigned_at: self.assigned_at,
        })
    }
}

impl AssignmentRowWithId {
    fn try_into_assignment(self) -> Result<JobAssignment, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let job_id = Uuid::parse_str(&self.job_id)
            .map_err(|e| DbError::Migration(format!("invalid job UUID: {e}")))?;
        let worker_id = Uuid::parse_str(&self.worker_id)
            .map_err(|e| DbError::Migration(format!("invalid worker UUID: {e}")))?;
        Ok(JobAssignment {
            id,
            job_id,
            worker_id,
            note: self.note,
            assigned_at: self.assigned_at,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct IdRow {
    record_id: String,
}

/// SurrealDB implementation of the Assignment repository.
#[derive(Clone)]
pub struct SurrealAssignmentRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAssignmentRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    /// Assert that the job belongs to the scope's tenant.
    async fn require_job_in_tenant(
        &self,
        scope: &TenantScope,
        job_id: Uuid,
    ) -> Result<(), DbError> {
        let job_id_str = job_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id FROM type::record('job', $job_id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("job_id", job_id_str.clone()))
            .bind(("tenant_id", scope.tenant_id().to_string()))
            .await?;

        let rows: Vec<IdRow> = result.take(0)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "job".into(),
                id: job_id_str,
            });
        }
        Ok(())
    }

    /// Assert that the worker belongs to the scope's tenant.
    async fn require_worker_in_tenant(
        &self,
        scope: &TenantScope,
        worker_id: Uuid,
    ) -> Result<(), DbError> {
        let worker_id_str = worker_id.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id FROM type::record('worker', $worker_id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("worker_id", worker_id_str.clone()))
            .bind(("tenant_id", scope.tenant_id().to_string()))
            .await?;

        let rows: Vec<IdRow> = result.take(0)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "worker".into(),
                id: worker_id_str,
            });
        }
        Ok(())
    }
}

impl<C: Connection> AssignmentRepository for SurrealAssignmentRepository<C> {
    async fn create(
        &self,
        scope: &TenantScope,
        job_id: Uuid,
        input: CreateJobAssignment,
    ) -> FieldOpsResult<JobAssignment> {
        self.require_job_in_tenant(scope, job_id).await?;
        self.require_worker_in_tenant(scope, input.worker_id).await?;

        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('job_assignment', $id) SET \
                 job_id = $job_id, \
                 worker_id = $worker_id, \
                 note = $note",
            )
            .bind(("id", id_str.clone()))
            .bind(("job_id", job_id.to_string()))
            .bind(("worker_id", input.worker_id.to_string()))
            .bind(("note", input.note))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<AssignmentRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "job_assignment".into(),
            id: id_str,
        })?;

        Ok(row.into_assignment(id)?)
    }

    async fn list_for_job(
        &self,
        scope: &TenantScope,
        job_id: Uuid,
    ) -> FieldOpsResult<Vec<JobAssignment>> {
        self.require_job_in_tenant(scope, job_id).await?;

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM job_assignment \
                 WHERE job_id = $job_id \
                 ORDER BY assigned_at ASC",
            )
            .bind(("job_id", job_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AssignmentRowWithId> = result.take(0).map_err(DbError::from)?;

        let assignments = rows
            .into_iter()
            .map(|row| row.try_into_assignment())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(assignments)
    }

    async fn delete(&self, scope: &TenantScope, job_id: Uuid, id: Uuid) -> FieldOpsResult<()> {
        self.require_job_in_tenant(scope, job_id).await?;

        self.db
            .query(
                "DELETE type::record('job_assignment', $id) \
                 WHERE job_id = $job_id",
            )
            .bind(("id", id.to_string()))
            .bind(("job_id", job_id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
