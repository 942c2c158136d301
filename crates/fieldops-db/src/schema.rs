//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Tenants (global scope)
-- =======================================================================
DEFINE TABLE tenant SCHEMAFULL;
DEFINE FIELD name ON TABLE tenant TYPE string;
DEFINE FIELD slug ON TABLE tenant TYPE string;
DEFINE FIELD status ON TABLE tenant TYPE string \
    ASSERT $value IN ['Active', 'Suspended', 'Inactive'];
DEFINE FIELD metadata ON TABLE tenant TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_tenant_slug ON TABLE tenant COLUMNS slug UNIQUE;

-- =======================================================================
-- Users (tenant scope; tenant_id absent only for platform accounts)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE user TYPE option<string>;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD full_name ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD status ON TABLE user TYPE string \
    ASSERT $value IN ['Active', 'Inactive'];
DEFINE FIELD metadata ON TABLE user TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_tenant_email ON TABLE user \
    COLUMNS tenant_id, email UNIQUE;

-- =======================================================================
-- Roles (tenant scope; tenant_id absent for global roles)
-- =======================================================================
DEFINE TABLE role SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE role TYPE option<string>;
DEFINE FIELD name ON TABLE role TYPE string;
DEFINE FIELD slug ON TABLE role TYPE string;
DEFINE FIELD description ON TABLE role TYPE string;
DEFINE FIELD created_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_role_tenant_name ON TABLE role \
    COLUMNS tenant_id, name UNIQUE;
DEFINE INDEX idx_role_tenant_slug ON TABLE role \
    COLUMNS tenant_id, slug UNIQUE;

-- =======================================================================
-- Permissions (global catalog)
-- =======================================================================
DEFINE TABLE permission SCHEMAFULL;
DEFINE FIELD key ON TABLE permission TYPE string;
DEFINE FIELD slug ON TABLE permission TYPE string;
DEFINE FIELD description ON TABLE permission TYPE string;
DEFINE FIELD created_at ON TABLE permission TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_permission_key ON TABLE permission COLUMNS key UNIQUE;

-- =======================================================================
-- Tenant quotas (at most one row per tenant)
-- =======================================================================
DEFINE TABLE tenant_quota SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE tenant_quota TYPE string;
DEFINE FIELD max_users ON TABLE tenant_quota TYPE option<int>;
DEFINE FIELD max_jobs_per_month ON TABLE tenant_quota TYPE option<int>;
DEFINE FIELD max_storage_mb ON TABLE tenant_quota TYPE option<int>;
DEFINE FIELD created_at ON TABLE tenant_quota TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE tenant_quota TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_quota_tenant ON TABLE tenant_quota \
    COLUMNS tenant_id UNIQUE;

-- =======================================================================
-- Sessions
-- =======================================================================
DEFINE TABLE session SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE session TYPE option<string>;
DEFINE FIELD user_id ON TABLE session TYPE string;
DEFINE FIELD token_hash ON TABLE session TYPE string;
DEFINE FIELD ip_address ON TABLE session TYPE option<string>;
DEFINE FIELD user_agent ON TABLE session TYPE option<string>;
DEFINE FIELD expires_at ON TABLE session TYPE datetime;
DEFINE FIELD created_at ON TABLE session TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_session_token ON TABLE session \
    COLUMNS token_hash UNIQUE;
DEFINE INDEX idx_session_user ON TABLE session COLUMNS user_id;

-- =======================================================================
-- Workers (tenant scope)
-- =======================================================================
DEFINE TABLE worker SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE worker TYPE string;
DEFINE FIELD full_name ON TABLE worker TYPE string;
DEFINE FIELD email ON TABLE worker TYPE string;
DEFINE FIELD phone ON TABLE worker TYPE option<string>;
DEFINE FIELD job_title ON TABLE worker TYPE option<string>;
DEFINE FIELD active ON TABLE worker TYPE bool DEFAULT true;
DEFINE FIELD created_at ON TABLE worker TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE worker TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_worker_tenant_email ON TABLE worker \
    COLUMNS tenant_id, email UNIQUE;

-- =======================================================================
-- Jobs (tenant scope; created_at drives the monthly quota count)
-- =======================================================================
DEFINE TABLE job SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE job TYPE string;
DEFINE FIELD reference ON TABLE job TYPE string;
DEFINE FIELD title ON TABLE job TYPE string;
DEFINE FIELD description ON TABLE job TYPE string;
DEFINE FIELD site_address ON TABLE job TYPE option<string>;
DEFINE FIELD status ON TABLE job TYPE string \
    ASSERT $value IN ['Scheduled', 'InProgress', 'Completed', \
    'Cancelled'];
DEFINE FIELD scheduled_for ON TABLE job TYPE option<datetime>;
DEFINE FIELD created_at ON TABLE job TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE job TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_job_tenant_reference ON TABLE job \
    COLUMNS tenant_id, reference UNIQUE;
DEFINE INDEX idx_job_tenant_created ON TABLE job \
    COLUMNS tenant_id, created_at;

-- =======================================================================
-- Job assignments (no tenant_id; scoped through the owning job)
-- =======================================================================
DEFINE TABLE job_assignment SCHEMAFULL;
DEFINE FIELD job_id ON TABLE job_assignment TYPE string;
DEFINE FIELD worker_id ON TABLE job_assignment TYPE string;
DEFINE FIELD note ON TABLE job_assignment TYPE option<string>;
DEFINE FIELD assigned_at ON TABLE job_assignment TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_assignment_job ON TABLE job_assignment COLUMNS job_id;

-- =======================================================================
-- Assets (tenant scope)
-- =======================================================================
DEFINE TABLE asset SCHEMAFULL;
DEFINE FIELD tenant_id ON TABLE asset TYPE string;
DEFINE FIELD name ON TABLE asset TYPE string;
DEFINE FIELD asset_tag ON TABLE asset TYPE string;
DEFINE FIELD category ON TABLE asset TYPE option<string>;
DEFINE FIELD location ON TABLE asset TYPE option<string>;
DEFINE FIELD status ON TABLE asset TYPE string \
    ASSERT $value IN ['InService', 'InRepair', 'Retired'];
DEFINE FIELD created_at ON TABLE asset TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE asset TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_asset_tenant_tag ON TABLE asset \
    COLUMNS tenant_id, asset_tag UNIQUE;

-- =======================================================================
-- Signatures (no tenant_id; scoped through the owning user)
-- =======================================================================
DEFINE TABLE signature SCHEMAFULL;
DEFINE FIELD user_id ON TABLE signature TYPE string;
DEFINE FIELD job_id ON TABLE signature TYPE option<string>;
DEFINE FIELD data ON TABLE signature TYPE string;
DEFINE FIELD signed_at ON TABLE signature TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_signature_user ON TABLE signature COLUMNS user_id;

-- =======================================================================
-- Audit Log (append-only)
-- =======================================================================
DEFINE TABLE audit_log SCHEMAFULL
    PERMISSIONS
        FOR create FULL
        FOR select FULL
        FOR update NONE
        FOR delete NONE;
DEFINE FIELD tenant_id ON TABLE audit_log TYPE option<string>;
DEFINE FIELD actor_id ON TABLE audit_log TYPE option<string>;
DEFINE FIELD actor_type ON TABLE audit_log TYPE string \
    ASSERT $value IN ['User', 'System'];
DEFINE FIELD action ON TABLE audit_log TYPE string;
DEFINE FIELD resource ON TABLE audit_log TYPE option<string>;
DEFINE FIELD outcome ON TABLE audit_log TYPE string \
    ASSERT $value IN ['Success', 'Denied', 'Failure'];
DEFINE FIELD ip_address ON TABLE audit_log TYPE option<string>;
DEFINE FIELD metadata ON TABLE audit_log TYPE object FLEXIBLE \
    DEFAULT {};
DEFINE FIELD created_at ON TABLE audit_log TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_audit_tenant_time ON TABLE audit_log \
    COLUMNS tenant_id, created_at;

-- =======================================================================
-- Graph Edge Tables (relations)
-- =======================================================================

-- User -> Role assignment
DEFINE TABLE has_role TYPE RELATION SCHEMAFULL;

-- Role -> Permission grants
DEFINE TABLE grants TYPE RELATION SCHEMAFULL;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
