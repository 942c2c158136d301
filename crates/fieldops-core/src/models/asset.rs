//! Asset (equipment) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssetStatus {
    InService,
    InRepair,
    Retired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    /// Physical tag; unique per tenant.
    pub asset_tag: String,
    pub category: Option<String>,
    pub location: Option<String>,
    pub status: AssetStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAsset {
    pub name: String,
    pub asset_tag: String,
    pub category: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateAsset {
    pub name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub status: Option<AssetStatus>,
}
