//! Audit trail read access.

use axum::Json;
use axum::extract::{Query, State};
use fieldops_core::models::audit::AuditLogEntry;
use fieldops_core::repository::AuditLogRepository;

use crate::error::ApiResult;
use crate::extract::RequestScope;
use crate::handlers::{ListResponse, PageQuery};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    rs: RequestScope,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<ListResponse<AuditLogEntry>>> {
    rs.require_role("Administrator")?;

    let result = state.audit.list(&rs.scope, page.into()).await?;
    Ok(Json(result.into()))
}
