//! Permission domain model.
//!
//! Permissions form a global catalog shared by all tenants; roles
//! reference them through `grants` edges.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: Uuid,
    /// Dotted, namespaced key (e.g. `users.view`). Unique.
    pub key: String,
    pub slug: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePermission {
    pub key: String,
    pub slug: String,
    pub description: String,
}
