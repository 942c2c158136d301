//! Per-tenant resource quota model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resource ceilings for one tenant. At most one row per tenant; a
/// `None` ceiling means unlimited on that axis, and a tenant with no
/// quota row at all is unlimited on every axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantQuota {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub max_users: Option<u32>,
    pub max_jobs_per_month: Option<u32>,
    /// Ceiling is stored and reported; storage usage accounting is not
    /// implemented yet, so this axis is never enforced.
    pub max_storage_mb: Option<u64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Full replacement payload for a tenant's quota row (PUT semantics).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SetTenantQuota {
    pub max_users: Option<u32>,
    pub max_jobs_per_month: Option<u32>,
    pub max_storage_mb: Option<u64>,
}
