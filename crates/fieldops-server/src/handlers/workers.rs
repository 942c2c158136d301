//! Field worker management.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use fieldops_core::models::worker::{CreateWorker, UpdateWorker, Worker};
use fieldops_core::repository::WorkerRepository;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::RequestScope;
use crate::handlers::{ListResponse, PageQuery};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    rs: RequestScope,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<ListResponse<Worker>>> {
    rs.require_permission("workers.view")?;

    let result = state.workers.list(&rs.scope, page.into()).await?;
    Ok(Json(result.into()))
}

pub async fn create(
    State(state): State<AppState>,
    rs: RequestScope,
    Json(body): Json<CreateWorker>,
) -> ApiResult<(StatusCode, Json<Worker>)> {
    rs.require_permission("workers.create")?;

    let worker = state.workers.create(&rs.scope, body).await?;
    Ok((StatusCode::CREATED, Json(worker)))
}

pub async fn get(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Worker>> {
    rs.require_permission("workers.view")?;

    let worker = state.workers.get_by_id(&rs.scope, id).await?;
    Ok(Json(worker))
}

pub async fn update(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateWorker>,
) -> ApiResult<Json<Worker>> {
    rs.require_permission("workers.update")?;

    let worker = state.workers.update(&rs.scope, id, body).await?;
    Ok(Json(worker))
}

pub async fn delete(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    rs.require_permission("workers.delete")?;

    state.workers.get_by_id(&rs.scope, id).await?;
    state.workers.delete(&rs.scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
