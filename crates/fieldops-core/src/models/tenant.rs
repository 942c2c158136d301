//! Tenant domain model.
//!
//! Tenants are the unit of data partitioning. Every scoped entity row
//! carries the owning tenant's id, and all data access is filtered by it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a tenant.
///
/// Only `Active` tenants are served; suspending or deactivating a tenant
/// cuts off every authenticated request on its behalf without touching
/// its data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Suspended,
    Inactive,
}

/// An isolated organizational account.
///
/// Each tenant has its own users, roles, workers, jobs and assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    /// Human-readable name.
    pub name: String,
    /// URL-safe unique identifier (e.g., `acme-field-services`).
    pub slug: String,
    pub status: TenantStatus,
    /// Arbitrary key-value metadata.
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new tenant. New tenants start `Active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub slug: String,
    pub metadata: Option<serde_json::Value>,
}

/// Fields that can be updated on an existing tenant.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateTenant {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub status: Option<TenantStatus>,
    pub metadata: Option<serde_json::Value>,
}
