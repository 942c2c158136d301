//! SurrealDB implementation of [`AuditLogRepository`].
//!
//! The audit log is append-only. `append` takes an optional tenant id
//! directly because denials are recorded before any scope exists
//! (failed logins, lookups against unknown tenant slugs); reads go
//! through the scope like every other tenant-owned table.

use chrono::{DateTime, Utc};
use fieldops_core::TenantScope;
use fieldops_core::error::FieldOpsResult;
use fieldops_core::models::audit::{
    ActorType, AuditLogEntry, AuditOutcome, CreateAuditLogEntry,
};
use fieldops_core::repository::{AuditLogRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AuditRow {
    tenant_id: Option<String>,
    actor_id: Option<String>,
    actor_type: String,
    action: String,
    resource: Option<String>,
    outcome: String,
    ip_address: Option<String>,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AuditRowWithId {
    record_id: String,
    tenant_id: Option<String>,
    actor_id: Option<String>,
    actor_type: String,
    action: String,
    resource: Option<String>,
    outcome: String,
    ip_address: Option<String>,
    metadata: serde_json::Value,
    created_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_actor_type(s: &str) -> Result<ActorType, DbError> {
    match s {
        "User" => Ok(ActorType::User),
        "System" => Ok(ActorType::System),
        other => Err(DbError::Migration(format!("unknown actor type: {other}"))),
    }
}

fn actor_type_to_string(a: &ActorType) -> &'static str {
    match a {
        ActorType::User => "User",
        ActorType::System => "System",
    }
}

fn parse_outcome(s: &str) -> Result<AuditOutcome, DbError> {
    match s {
        "Success" => Ok(AuditOutcome::Success),
        "Denied" => Ok(AuditOutcome::Denied),
        "Failure" => Ok(AuditOutcome::Failure),
        other => Err(DbError::Migration(format!("unknown outcome: {other}"))),
    }
}

fn outcome_to_string(o: &AuditOutcome) -> &'static str {
    match o {
        AuditOutcome::Success => "Success",
        AuditOutcome::Denied => "Denied",
        AuditOutcome::Failure => "Failure",
    }
}

fn parse_opt_uuid(raw: Option<String>, what: &str) -> Result<Option<Uuid>, DbError> {
    raw.map(|s| {
        Uuid::parse_str(&s).map_err(|e| DbError::Migration(format!("invalid {what} UUID: {e}")))
    })
    .transpose()
}

impl AuditRow {
    fn into_entry(self, id: Uuid) -> Result<AuditLogEntry, DbError> {
        Ok(AuditLogEntry {
            id,
            tenant_id: parse_opt_uuid(self.tenant_id, "tenant")?,
            actor_id: parse_opt_uuid(self.actor_id, "actor")?,
            actor_type: parse_actor_type(&self.actor_type)?,
            action: self.action,
            resource: self.resource,
            outcome: parse_outcome(&self.outcome)?,
            ip_address: self.ip_address,
            metadata: self.metadata,
            created_at: self.created_at,
        })
    }
}

impl AuditRowWithId {
    fn try_into_entry(self) -> Result<AuditLogEntry, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        Ok(AuditLogEntry {
            id,
            tenant_id: parse_opt_uuid(self.tenant_id, "tenant")?,
            actor_id: parse_opt_uuid(self.actor_id, "actor")?,
            actor_type: parse_actor_type(&self.actor_type)?,
            action: self.action,
            resource: self.resource,
            outcome: parse_outcome(&self.outcome)?,
            ip_address: self.ip_address,
            metadata: self.metadata,
            created_at: self.created_at,
        })
    }
}

/// SurrealDB implementation of the AuditLog repository.
#[derive(Clone)]
pub struct SurrealAuditLogRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAuditLogRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AuditLogRepository for SurrealAuditLogRepository<C> {
    async fn append(&self, input: CreateAuditLogEntry) -> FieldOpsResult<AuditLogEntry> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let metadata = input
            .metadata
            .unwrap_or(serde_json::Value::Object(Default::default()));

        let result = self
            .db
            .query(
                "CREATE type::record('audit_log', $id) SET \
                 tenant_id = $tenant_id, \
                 actor_id = $actor_id, \
                 actor_type = $actor_type, \
                 action = $action, \
                 resource = $resource, \
                 outcome = $outcome, \
                 ip_address = $ip_address, \
                 metadata = $metadata",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", input.tenant_id.map(|t| t.to_string())))
            .bind(("actor_id", input.actor_id.map(|a| a.to_string())))
            .bind(("actor_type", actor_type_to_string(&input.actor_type).to_string()))
            .bind(("action", input.action))
            .bind(("resource", input.resource))
            .bind(("outcome", outcome_to_string(&input.outcome).to_string()))
            .bind(("ip_address", input.ip_address))
            .bind(("metadata", metadata))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<AuditRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "audit_log".into(),
            id: id_str,
        })?;

        Ok(row.into_entry(id)?)
    }

    async fn list(
        &self,
        scope: &TenantScope,
        pagination: Pagination,
    ) -> FieldOpsResult<PaginatedResult<AuditLogEntry>> {
        let tenant_id_str = scope.tenant_id().to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM audit_log \
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
                "SELECT meta::id(id) AS record_id, * FROM audit_log \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at DESC \
                 LIMIT $limit START $offset",
            )
            .bind(("tenant_id", tenant_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AuditRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_entry())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
