//! Asset (equipment) management.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use fieldops_core::models::asset::{Asset, CreateAsset, UpdateAsset};
use fieldops_core::repository::AssetRepository;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::RequestScope;
use crate::handlers::{ListResponse, PageQuery};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    rs: RequestScope,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<ListResponse<Asset>>> {
    rs.require_permission("assets.view")?;

    let result = state.assets.list(&rs.scope, page.into()).await?;
    Ok(Json(result.into()))
}

pub async fn create(
    State(state): State<AppState>,
    rs: RequestScope,
    Json(body): Json<CreateAsset>,
) -> ApiResult<(StatusCode, Json<Asset>)> {
    rs.require_permission("assets.create")?;

    let asset = state.assets.create(&rs.scope, body).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

pub async fn get(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Asset>> {
    rs.require_permission("assets.view")?;

    let asset = state.assets.get_by_id(&rs.scope, id).await?;
    Ok(Json(asset))
}

pub async fn update(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAsset>,
) -> ApiResult<Json<Asset>> {
    rs.require_permission("assets.update")?;

    let asset = state.assets.update(&rs.scope, id, body).await?;
    Ok(Json(asset))
}

pub async fn delete(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    rs.require_permission("assets.delete")?;

    state.assets.get_by_id(&rs.scope, id).await?;
    state.assets.delete(&rs.scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
