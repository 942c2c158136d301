//! Tenant signup and self-service administration.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{Datelike, Utc};
use fieldops_core::TenantScope;
use fieldops_core::error::FieldOpsError;
use fieldops_core::models::audit::{ActorType, AuditOutcome, CreateAuditLogEntry};
use fieldops_core::models::quota::SetTenantQuota;
use fieldops_core::models::tenant::{CreateTenant, Tenant, TenantStatus, UpdateTenant};
use fieldops_core::models::user::CreateUser;
use fieldops_core::repository::{
    JobRepository, QuotaRepository, RoleRepository, TenantRepository, UserRepository,
};
use fieldops_db::seed::provision_stock_roles;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::RequestScope;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub slug: String,
    pub admin_email: String,
    pub admin_full_name: String,
    pub admin_password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub tenant: Tenant,
    pub admin_user_id: Uuid,
}

/// Open endpoint: create a tenant, its stock roles, and the initial
/// admin user in one step.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    if body.admin_password.len() < state.auth_config.min_password_length {
        return Err(FieldOpsError::Validation {
            message: format!(
                "password must be at least {} characters",
                state.auth_config.min_password_length
            ),
        }
        .into());
    }

    // Slug conflicts answer 409 rather than surfacing the unique-index
    // violation.
    if state.tenants.get_by_slug(&body.slug).await.is_ok() {
        return Err(FieldOpsError::AlreadyExists {
            entity: format!("tenant with slug '{}'", body.slug),
        }
        .into());
    }

    let tenant = state
        .tenants
        .create(CreateTenant {
            name: body.name,
            slug: body.slug,
            metadata: None,
        })
        .await?;

    // New tenants are Active, so the scope constructor cannot fail
    // here for lifecycle reasons.
    let scope = TenantScope::for_tenant(&tenant)?;

    let stock = provision_stock_roles(&state.db, &scope).await?;

    let admin = state
        .users
        .create(
            &scope,
            CreateUser {
                email: body.admin_email,
                full_name: body.admin_full_name,
                password: body.admin_password,
                metadata: None,
            },
        )
        .await?;

    state
        .roles
        .assign_to_user(&scope, admin.id, stock.admin.id)
        .await?;

    audit(
        &state,
        Some(tenant.id),
        Some(admin.id),
        "tenant.signup",
        AuditOutcome::Success,
    )
    .await;

    info!(tenant = %tenant.slug, "tenant signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            tenant,
            admin_user_id: admin.id,
        }),
    ))
}

pub async fn current(
    State(state): State<AppState>,
    rs: RequestScope,
) -> ApiResult<Json<Tenant>> {
    let tenant = state.tenants.get_by_id(rs.scope.tenant_id()).await?;
    Ok(Json(tenant))
}

#[derive(Debug, Deserialize)]
pub struct UpdateTenantRequest {
    pub name: Option<String>,
    pub status: Option<TenantStatus>,
}

/// Tenant-admin gate. An admin may suspend their own tenant; every
/// scoped request afterwards fails `TenantNotActive`.
pub async fn update_current(
    State(state): State<AppState>,
    rs: RequestScope,
    Json(body): Json<UpdateTenantRequest>,
) -> ApiResult<Json<Tenant>> {
    rs.require_tenant_admin()?;

    let tenant = state
        .tenants
        .update(
            rs.scope.tenant_id(),
            UpdateTenant {
                name: body.name,
                slug: None,
                status: body.status,
                metadata: None,
            },
        )
        .await?;

    Ok(Json(tenant))
}

#[derive(Debug, Serialize)]
pub struct QuotaResponse {
    pub max_users: Option<u32>,
    pub max_jobs_per_month: Option<u32>,
    pub max_storage_mb: Option<u64>,
    pub current_users: u64,
    pub current_jobs_this_month: u64,
}

/// Ceilings plus live usage counts.
pub async fn quota(
    State(state): State<AppState>,
    rs: RequestScope,
) -> ApiResult<Json<QuotaResponse>> {
    rs.require_tenant_admin()?;

    let quota = state.quotas.get(&rs.scope).await?;
    let current_users = state.users.count(&rs.scope).await?;
    let now = Utc::now();
    let current_jobs_this_month = state
        .jobs
        .count_created_in_month(&rs.scope, now.year(), now.month())
        .await?;

    Ok(Json(QuotaResponse {
        max_users: quota.as_ref().and_then(|q| q.max_users),
        max_jobs_per_month: quota.as_ref().and_then(|q| q.max_jobs_per_month),
        max_storage_mb: quota.as_ref().and_then(|q| q.max_storage_mb),
        current_users,
        current_jobs_this_month,
    }))
}

pub async fn set_quota(
    State(state): State<AppState>,
    rs: RequestScope,
    Json(body): Json<SetTenantQuota>,
) -> ApiResult<Json<fieldops_core::models::quota::TenantQuota>> {
    rs.require_tenant_admin()?;

    let quota = state.quotas.set(&rs.scope, body).await?;
    Ok(Json(quota))
}

pub(crate) async fn audit(
    state: &AppState,
    tenant_id: Option<Uuid>,
    actor_id: Option<Uuid>,
    action: &str,
    outcome: AuditOutcome,
) {
    use fieldops_core::repository::AuditLogRepository;

    let result = state
        .audit
        .append(CreateAuditLogEntry {
            tenant_id,
            actor_id,
            actor_type: ActorType::User,
            action: action.into(),
            resource: None,
            outcome,
            ip_address: None,
            metadata: None,
        })
        .await;
    if let Err(e) = result {
        tracing::error!(error = %e, action, "failed to append audit entry");
    }
}
