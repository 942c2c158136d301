//! SurrealDB implementation of [`AssetRepository`].

use chrono::{DateTime, Utc};
use fieldops_core::TenantScope;
use fieldops_core::error::FieldOpsResult;
use fieldops_core::models::asset::{Asset, AssetStatus, CreateAsset, UpdateAsset};
use fieldops_core::repository::{AssetRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AssetRow {
    tenant_id: String,
    name: String,
    asset_tag: String,
    category: Option<String>,
    location: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct AssetRowWithId {
    record_id: String,
    tenant_id: String,
    name: String,
    asset_tag: String,
    category: Option<String>,
    location: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_status(s: &str) -> Result<AssetStatus, DbError> {
    match s {
        "InService" => Ok(AssetStatus::InService),
        "InRepair" => Ok(AssetStatus::InRepair),
        "Retired" => Ok(AssetStatus::Retired),
        other => Err(DbError::Migration(format!("unknown asset status: {other}"))),
    }
}

fn status_to_string(s: &AssetStatus) -> &'static str {
    match s {
        AssetStatus::InService => "InService",
        AssetStatus::InRepair => "InRepair",
        AssetStatus::Retired => "Retired",
    }
}

impl AssetRow {
    fn into_asset(self, id: Uuid) -> Result<Asset, DbError> {
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        Ok(Asset {
            id,
            tenant_id,
            name: self.name,
            asset_tag: self.asset_tag,
            category: self.category,
            location: self.location,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl AssetRowWithId {
    fn try_into_asset(self) -> Result<Asset, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Migration(format!("invalid UUID: {e}")))?;
        let tenant_id = Uuid::parse_str(&self.tenant_id)
            .map_err(|e| DbError::Migration(format!("invalid tenant UUID: {e}")))?;
        Ok(Asset {
            id,
            tenant_id,
            name: self.name,
            asset_tag: self.asset_tag,
            category: self.category,
            location: self.location,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Asset repository.
#[derive(Clone)]
pub struct SurrealAssetRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAssetRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> AssetRepository for SurrealAssetRepository<C> {
    async fn create(&self, scope: &TenantScope, input: CreateAsset) -> FieldOpsResult<Asset> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let tenant_id_str = scope.tenant_id().to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('asset', $id) SET \
                 tenant_id = $tenant_id, \
                 name = $name, asset_tag = $asset_tag, \
                 category = $category, location = $location, \
                 status = 'InService'",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id_str))
            .bind(("name", input.name))
            .bind(("asset_tag", input.asset_tag))
            .bind(("category", input.category))
            .bind(("location", input.location))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<AssetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "asset".into(),
            id: id_str,
        })?;

        Ok(row.into_asset(id)?)
    }

    async fn get_by_id(&self, scope: &TenantScope, id: Uuid) -> FieldOpsResult<Asset> {
        let id_str = id.to_string();
        let tenant_id_str = scope.tenant_id().to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('asset', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id_str))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AssetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "asset".into(),
            id: id_str,
        })?;

        Ok(row.into_asset(id)?)
    }

    async fn update(
        &self,
        scope: &TenantScope,
        id: Uuid,
        input: UpdateAsset,
    ) -> FieldOpsResult<Asset> {
        let id_str = id.to_string();
        let tenant_id_str = scope.tenant_id().to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.category.is_some() {
            sets.push("category = $category");
        }
        if input.location.is_some() {
            sets.push("location = $location");
        }
        if input.status.is_some() {
            sets.push("status = $status");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('asset', $id) SET {} \
             WHERE tenant_id = $tenant_id",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("tenant_id", tenant_id_str));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(category) = input.category {
            builder = builder.bind(("category", category));
        }
        if let Some(location) = input.location {
            builder = builder.bind(("location", location));
        }
        if let Some(ref status) = input.status {
            builder = builder.bind(("status", status_to_string(status).to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Migration(e.to_string()))?;

        let rows: Vec<AssetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "asset".into(),
            id: id_str,
        })?;

        Ok(row.into_asset(id)?)
    }

    async fn delete(&self, scope: &TenantScope, id: Uuid) -> FieldOpsResult<()> {
        let id_str = id.to_string();
        let tenant_id_str = scope.tenant_id().to_string();

        self.db
            .query(
                "DELETE type::record('asset', $id) \
                 WHERE tenant_id = $tenant_id",
            )
            .bind(("id", id_str))
            .bind(("tenant_id", tenant_id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(
        &self,
        scope: &TenantScope,
        pagination: Pagination,
    ) -> FieldOpsResult<PaginatedResult<Asset>> {
        let tenant_id_str = scope.tenant_id().to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM asset \
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
                "SELECT meta::id(id) AS record_id, * FROM asset \
                 WHERE tenant_id = $tenant_id \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("tenant_id", tenant_id_str))
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<AssetRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_asset())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
