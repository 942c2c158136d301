//! SurrealDB implementation of [`JobRepository`].

use chrono::{DateTime, Utc};
use fieldops_core::TenantScope;
use fieldops_core::error::FieldOpsResult;
use fieldops_core::models::job::{CreateJob, Job, JobStatus, UpdateJob};
use fieldops_core::repository::{JobRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct JobRow {
    tenant_id: String,
    reference: String,
    title: String,
    description: String,
    site_address: Option<String>,
    status: String,
    scheduled_for: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct JobRowWithId {
    record_id: String,
    tenant_id: String,
    reference: String,
    title: String,
    description: String,
    site_address: Option<String>,
    status: String,
    scheduled_for: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_status(s: &str) -> Result<JobStatus, DbError> {
    match s {
        "Scheduled" => Ok(JobStatus::Scheduled),
        "InProgress" => Ok(JobStatus::InProgress),
        "Completed" => Ok(JobStatus::Completed),
        "Cancelled" => Ok(JobStatus::Cancelled),
        other => Err(DbError::Migration(format!("unknown job status: {other}"))),
    }
}

fn status_to_string(s: &JobStatus) -> &'static str {
    match s {
        JobStatus::Scheduled => "Scheduled",
        JobStatus::InProgress => "InProgress",
        JobStatus::Completed => "Completed",
        JobStatus::Cancelled => "Cancelled",
    }
}

impl JobRow {
    fn into_job(self, id: Uuid) -> Result<Job, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        Ok(Job {
            id,
            tenant_id,
            reference: self.reference,
            title: self.title,
            description: self.description,
            site_address: self.site_address,
            status: parse_status(&self.status)?,
            scheduled_for: self.scheduled_for,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl JobRowWithId {
    fn try_into_job(self) -> Result<Job, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        Ok(Job {
            id,
            tenant_id,
            reference: self.reference,
            title: self.title,
            description: self.description,
            site_address: self.site_address,
            status: parse_status(&self.status)?,
            scheduled_for: self.scheduled_for,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Job repository.
#[derive(Clone)]
pub struct SurrealJobRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealJobRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> JobRepository for SurrealJobRepository<C> {
    async fn create(&self, scope: &TenantScope, input: CreateJob) -> FieldOpsResult<Job> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let tenant_id_str = scope.tenant_id().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('job', $id) SET \
                 tenant_id = $tenant_id, \
                 reference = $reference, title = $title, \
                 description = $description, \
                 site_address = $site_address, \
                 status = 'Scheduled', \
                 scheduled_for = $scheduled_for",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id_str))
            .bind(("reference", input.reference))
            .bind(("title", input.title))
            .bind(("description", input.description))
            .bind(("site_address", input.site_address))
            .bind(("scheduled_for", input.scheduled_for))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<JobRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "job".into(),
            id: id_str,
        })?;

        Ok(row.into_job(id)?)
    }

    async fn get_by_id(&self, scope: &TenantScope, id: Uuid) -> FieldOpsResult<Job> {
        let id_str = id.to_string();
        let tenant_id_str = scope.tenant_id().to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('job', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id_str))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<JobRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "job".into(),
            id: id_str,
        })?;

        Ok(row.into_job(id)?)
    }

    async fn update(&self, scope: &TenantScope, id: Uuid, input: UpdateJob) -> FieldOpsResult<Job> {
        let id_str = id.to_string();
        let tenant_id_str = scope.tenant_id().to_string();

        let mut sets = Vec::new();
        if input.title.is_some() {
            sets.push("title = $title");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.site_address.is_some() {
            sets.push("site_address = $site_address");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        if input.scheduled_for.is_some() {
            sets.push("scheduled_for = $scheduled_for");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('job', $id) SET {} \
             WHERE tenant_id = $tenant_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id_str));

        if let Some(title) = input.title {
            builder = builder.bind(("title", title));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(site_address) = input.site_address {
            builder = builder.bind(("site_address", site_address));
        }
        if let Some(ref status) = input.status {
            builder = builder.bind(("status", status_to_string(status).to_string()));
        }
        if let Some(scheduled_for) = input.scheduled_for {
            builder = builder.bind(("scheduled_for", scheduled_for));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<JobRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "job".into(),
            id: id_str,
        })?;

        Ok(row.into_job(id)?)
    }

    async fn delete(&self, scope: &TenantScope, id: Uuid) -> FieldOpsResult<()> {
        let id_str = id.to_string();
        let tenant_id_str = scope.tenant_id().to_string();

        // Remove assignments first, then the job record. The assignment
        // filter goes through the job's tenant, so a cross-tenant id
        // deletes nothing.
        let query = format!(
            "DELETE job_assignment WHERE job_id = '{id_str}' AND \
             '{id_str}' IN (SELECT VALUE meta::id(id) FROM job \
                 WHERE tenant_id = $tenant_id); \
             DELETE type::record('job', $id) WHERE tenant_id = $tenant_id;"
        );

        self.db
            .query(query)
            .bind(("id", id_str))
            .bind(("tenant_id", tenant_id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(
        &self,
        scope: &TenantScope,
        pagination: Pagination,
    ) -> FieldOpsResult<PaginatedResult<Job>> {
        let tenant_id_str = scope.tenant_id().to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM job \
                 WHERE tenant_id = $tenant_id GROUP ALL",
            )
            .bind(("tenant_id", tenant_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM job \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("tenant_id", tenant_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<JobRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_job())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn count_created_in_month(
        &self,
        scope: &TenantScope,
        year: i32,
        month: u32,
    ) -> FieldOpsResult<u64> {
        let tenant_id_str = scope.tenant_id().to_string();

        // Matched on both year and month so a quota month never bleeds
        // into the same month of another year.
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM job \
                 WHERE tenant_id = $tenant_id \
                 AND time::year(created_at) = $year \
                 AND time::month(created_at) = $month \
                 GROUP ALL",
            )
            .bind(("tenant_id", tenant_id_str))
            .bind(("year", i64::from(year)))
            .bind(("month", i64::from(month)))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}
