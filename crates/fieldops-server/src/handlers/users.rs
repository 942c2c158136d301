//! User management, role assignment, and signatures.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use fieldops_auth::QuotaAxis;
use fieldops_core::error::FieldOpsError;
use fieldops_core::models::audit::AuditOutcome;
use fieldops_core::models::role::Role;
use fieldops_core::models::signature::{CreateSignature, Signature};
use fieldops_core::models::user::{CreateUser, UpdateUser, User};
use fieldops_core::repository::{RoleRepository, SignatureRepository, UserRepository};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::RequestScope;
use crate::handlers::tenants::audit;
use crate::handlers::{ListResponse, PageQuery};
use crate::state::AppState;

/// Public projection of a user row (no password hash).
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub tenant_id: Option<Uuid>,
    pub email: String,
    pub full_name: String,
    pub status: fieldops_core::models::user::UserStatus,
    pub metadata: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            tenant_id: u.tenant_id,
            email: u.email,
            full_name: u.full_name,
            status: u.status,
            metadata: u.metadata,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    rs: RequestScope,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<ListResponse<UserResponse>>> {
    rs.require_permission("users.view")?;

    let result = state.users.list(&rs.scope, page.into()).await?;
    Ok(Json(ListResponse {
        items: result.items.into_iter().map(UserResponse::from).collect(),
        total: result.total,
        offset: result.offset,
        limit: result.limit,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    rs: RequestScope,
    Json(body): Json<CreateUser>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    rs.require_permission("users.create")?;

    // Quota rejections land in the audit trail alongside successes.
    match state
        .quota_gate
        .ensure_capacity(&rs.scope, QuotaAxis::Users)
        .await
    {
        Ok(()) => {}
        Err(e @ FieldOpsError::QuotaExceeded { .. }) => {
            audit(
                &state,
                Some(rs.scope.tenant_id()),
                Some(rs.principal.user_id()),
                "user.create",
                AuditOutcome::Denied,
            )
            .await;
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    }

    let user = state.users.create(&rs.scope, body).await?;

    audit(
        &state,
        Some(rs.scope.tenant_id()),
        Some(rs.principal.user_id()),
        "user.create",
        AuditOutcome::Success,
    )
    .await;

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn get(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    rs.require_permission("users.view")?;

    let user = state.users.get_by_id(&rs.scope, id).await?;
    Ok(Json(user.into()))
}

pub async fn update(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUser>,
) -> ApiResult<Json<UserResponse>> {
    rs.require_permission("users.update")?;

    let user = state.users.update(&rs.scope, id, body).await?;
    Ok(Json(user.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    rs.require_permission("users.delete")?;

    // Soft-delete: the row survives with status Inactive.
    state.users.get_by_id(&rs.scope, id).await?;
    state.users.delete(&rs.scope, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub role_id: Uuid,
}

pub async fn assign_role(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
    Json(body): Json<AssignRoleRequest>,
) -> ApiResult<StatusCode> {
    rs.require_admin_or_manager()?;

    state
        .roles
        .assign_to_user(&rs.scope, id, body.role_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unassign_role(
    State(state): State<AppState>,
    rs: RequestScope,
    Path((id, role_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    rs.require_admin_or_manager()?;

    state
        .roles
        .unassign_from_user(&rs.scope, id, role_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_roles(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Role>>> {
    rs.require_permission("users.view")?;

    // The user lookup pins the id to the tenant before the unscoped
    // role query runs.
    let user = state.users.get_by_id(&rs.scope, id).await?;
    let roles = state.roles.roles_for_user(user.id).await?;
    Ok(Json(roles))
}

pub async fn create_signature(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateSignature>,
) -> ApiResult<(StatusCode, Json<Signature>)> {
    rs.require_permission("users.update")?;

    let signature = state.signatures.create(&rs.scope, id, body).await?;
    Ok((StatusCode::CREATED, Json(signature)))
}

pub async fn list_signatures(
    State(state): State<AppState>,
    rs: RequestScope,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Signature>>> {
    rs.require_permission("users.view")?;

    let signatures = state.signatures.list_for_user(&rs.scope, id).await?;
    Ok(Json(signatures))
}
