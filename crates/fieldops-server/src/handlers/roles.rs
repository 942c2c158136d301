//! Role catalog.

use axum::Json;
use axum::extract::State;
use fieldops_core::models::role::Role;
use fieldops_core::repository::RoleRepository;

use crate::error::ApiResult;
use crate::extract::RequestScope;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>, rs: RequestScope) -> ApiResult<Json<Vec<Role>>> {
    let roles = state.roles.list(&rs.scope).await?;
    Ok(Json(roles))
}
