//! Role domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exact name of the universal-bypass role: a user holding a role with
/// this name passes every permission check unconditionally.
pub const ADMINISTRATOR_ROLE: &str = "Administrator";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    /// `None` for global roles; otherwise the owning tenant.
    pub tenant_id: Option<Uuid>,
    /// Unique per tenant. Matched case-sensitively by the
    /// permission-check bypass and the role-name guard.
    pub name: String,
    /// Stable machine identifier (e.g. `admin`, `manager`, `worker`).
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRole {
    pub name: String,
    pub slug: String,
    pub description: String,
}
