//! SurrealDB implementation of [`WorkerRepository`].

use chrono::{DateTime, Utc};
use fieldops_core::TenantScope;
use fieldops_core::error::FieldOpsResult;
use fieldops_core::models::worker::{CreateWorker, UpdateWorker, Worker};
use fieldops_core::repository::{PaginatedResult, Pagination, WorkerRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct WorkerRow {
    tenant_id: String,
    full_name: String,
    email: String,
    phone: Option<String>,
    job_title: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct WorkerRowWithId {
    record_id: String,
    tenant_id: String,
    full_name: String,
    email: String,
    phone: Option<String>,
    job_title: Option<String>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

impl WorkerRow {
    fn into_worker(self, id: Uuid) -> Result<Worker, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        Ok(Worker {
            id,
            tenant_id,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            job_title: self.job_title,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl WorkerRowWithId {
    fn try_into_worker(self) -> Result<Worker, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        Ok(Worker {
            id,
            tenant_id,
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            job_title: self.job_title,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Worker repository.
#[derive(Clone)]
pub struct SurrealWorkerRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealWorkerRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> WorkerRepository for SurrealWorkerRepository<C> {
    async fn create(&self, scope: &TenantScope, input: CreateWorker) -> FieldOpsResult<Worker> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let tenant_id_str = scope.tenant_id().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('worker', $id) SET \
                 tenant_id = $tenant_id, \
                 full_name = $full_name, email = $email, \
                 phone = $phone, job_title = $job_title, \
                 active = true",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id_str))
            .bind(("full_name", input.full_name))
            .bind(("email", input.email))
            .bind(("phone", input.phone))
            .bind(("job_title", input.job_title))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<WorkerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "worker".into(),
            id: id_str,
        })?;

        Ok(row.into_worker(id)?)
    }

    async fn get_by_id(&self, scope: &TenantScope, id: Uuid) -> FieldOpsResult<Worker> {
        let id_str = id.to_string();
        let tenant_id_str = scope.tenant_id().to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('worker', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id_str))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WorkerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "worker".into(),
            id: id_str,
        })?;

        Ok(row.into_worker(id)?)
    }

    async fn update(
        &self,
        scope: &TenantScope,
        id: Uuid,
        input: UpdateWorker,
    ) -> FieldOpsResult<Worker> {
        let id_str = id.to_string();
        let tenant_id_str = scope.tenant_id().to_string();

        let mut sets = Vec::new();
        if input.full_name.is_some() {
            sets.push("full_name = $full_name");
        }
        if input.email.is_some() {
            sets.push("email = $email");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.job_title.is_some() {
            sets.push("job_title = $job_title");
        }
        if input.active.is_some() {
            sets.push("active = $active");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('worker', $id) SET {} \
             WHERE tenant_id = $tenant_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id_str));

        if let Some(full_name) = input.full_name {
            builder = builder.bind(("full_name", full_name));
        }
        if let Some(email) = input.email {
            builder = builder.bind(("email", email));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(job_title) = input.job_title {
            builder = builder.bind(("job_title", job_title));
        }
        if let Some(active) = input.active {
            builder = builder.bind(("active", active));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<WorkerRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "worker".into(),
            id: id_str,
        })?;

        Ok(row.into_worker(id)?)
    }

    async fn delete(&self, scope: &TenantScope, id: Uuid) -> FieldOpsResult<()> {
        let id_str = id.to_string();
        let tenant_id_str = scope.tenant_id().to_string();

        self.db
            .query(
                "DELETE type::record('worker', $id) \
                 WHERE tenant_id = $tenant_id",
            )
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
    ) -> FieldOpsResult<PaginatedResult<Worker>> {
        let tenant_id_str = scope.tenant_id().to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM worker \
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
                "SELECT meta::id(id) AS record_id, * FROM worker \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("tenant_id", tenant_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<WorkerRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_worker())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
