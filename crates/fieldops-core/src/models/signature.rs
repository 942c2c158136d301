//! Signature domain model.
//!
//! Signatures carry no `tenant_id`; access is scoped through the
//! owning user's tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signature {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: Option<Uuid>,
    /// Base64-encoded image payload.
    pub data: String,
    pub signed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSignature {
    pub job_id: Option<Uuid>,
    pub data: String,
}
