//! Job (work order) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Client-facing reference (e.g. `JOB-2024-0113`).
    pub reference: String,
    pub title: String,
    pub description: String,
    pub site_address: Option<String>,
    pub status: JobStatus,
    pub scheduled_for: Option<DateTime<Utc>>,
    /// Drives the monthly job quota count.
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJob {
    pub reference: String,
    pub title: String,
    pub description: String,
    pub site_address: Option<String>,
    pub scheduled_for: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateJob {
    pub title: Option<String>,
    pub description: Option<String>,
    pub site_address: Option<String>,
    pub status: Option<JobStatus>,
    pub scheduled_for: Option<DateTime<Utc>>,
}
