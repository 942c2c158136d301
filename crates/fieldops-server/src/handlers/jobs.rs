//! Job management and worker assignments.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use fieldops_auth::QuotaAxis;
use fieldops_core::error::FieldOpsError;
use fieldops_core::models::assignment::{CreateJobAssignment, JobAssignment};
use fieldops_core::models::audit::AuditOutcome;
use fieldops_core::models::job::{CreateJob, Job, UpdateJob};
use fieldops_core::repository::{AssignmentRepository, JobRepository};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::RequestScope;
use crate::handlers::tenants::audit;
use crate::handlers::{ListResponse, PageQuery};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    rs: RequestScope,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<ListResponse<Job>>> {
    rs.require_permission("jobs.view")?;

    let result = state.jobs.list(&rs.scope, page.into()).await?;
    Ok(Json(result.into()))
}

pub async fn create(
    State(state): State<AppState>,
    rs: RequestScope,
    Json(body): Json<CreateJob>,
) -> ApiResult<(StatusCode, Json<Job>)> {
    rs.require_permission("jobs.create")?;

    // Quota rejections land in the audit trail alongside successes.
    match state
        .quota_gate
        .ensure_capacity(&rs.scope, QuotaAxis::Jobs)
        .await
    {
        Ok(()) => {}
        Err(e @ FieldOpsError::QuotaExceeded { .. }) => {
            audit(
                &state,
                Some(rs.scope.tenant_id()),
                Some(rs.principal.user_id()),
                "job.create",
                AuditOutcome::Denied,
            )
            .await;
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    }

    let job = state.jobs.create(&rs.scope, body).await?;

    audit(
        &state,
        Some(rs.scope.tenant_id()),
        Some(rs.principal.user_id()),
        "job.create",
        AuditOutcome::Success,
    )
    .await;

    Ok((StatusCode::CREATED, Json(job)))
}

pub async fn get(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Job>> {
    rs.require_permission("jobs.view")?;

    let job = state.jobs.get_by_id(&rs.scope, id).await?;
    Ok(Json(job))
}

pub async fn update(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateJob>,
) -> ApiResult<Json<Job>> {
    rs.require_permission("jobs.update")?;

    let job = state.jobs.update(&rs.scope, id, body).await?;
    Ok(Json(job))
}

pub async fn delete(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    rs.require_permission("jobs.delete")?;

    state.jobs.get_by_id(&rs.scope, id).await?;
    state.jobs.delete(&rs.scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn create_assignment(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateJobAssignment>,
) -> ApiResult<(StatusCode, Json<JobAssignment>)> {
    rs.require_permission("jobs.assign")?;

    let assignment = state.assignments.create(&rs.scope, id, body).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

pub async fn list_assignments(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<JobAssignment>>> {
    rs.require_permission("jobs.view")?;

    let assignments = state.assignments.list_for_job(&rs.scope, id).await?;
    Ok(Json(assignments))
}

pub async fn delete_assignment(
    State(state): State<AppState>,
    rs: RequestScope,
    Path((id, assignment_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    rs.require_permission("jobs.assign")?;

    state
        .assignments
        .delete(&rs.scope, id, assignment_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
