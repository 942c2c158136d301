//! Job assignment domain model.
//!
//! Assignments carry no `tenant_id` of their own; they are scoped
//! through the owning job for every access verb.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobAssignment {
    pub id: Uuid,
    pub job_id: Uuid,
    pub worker_id: Uuid,
    pub note: Option<String>,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobAssignment {
    pub worker_id: Uuid,
    pub note: Option<String>,
}
