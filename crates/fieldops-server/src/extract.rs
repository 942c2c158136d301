//! Request-pipeline extractors.
//!
//! Composition is explicit: handlers declare their pipeline stage by
//! extractor choice and call the guard methods they need, so the route
//! table reads as the authorization policy.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use fieldops_auth::{Credentials, Principal, rbac};
use fieldops_core::context::TenantScope;
use fieldops_core::error::FieldOpsError;

use crate::error::ApiError;
use crate::state::AppState;

/// Pull the request credential out of the headers. `Authorization:
/// Bearer` wins over the session cookie when both are present.
fn extract_credentials(parts: &Parts, state: &AppState) -> Option<Credentials> {
    if let Some(value) = parts.headers.get(AUTHORIZATION)
        && let Ok(value) = value.to_str()
        && let Some(token) = value.strip_prefix("Bearer ")
    {
        return Some(Credentials::Bearer(token.trim().to_string()));
    }

    let cookie_name = &state.auth_config.session_cookie_name;
    let header = parts.headers.get(COOKIE)?.to_str().ok()?;
    for pair in header.split(';') {
        let (name, value) = pair.trim().split_once('=')?;
        if name == cookie_name {
            return Some(Credentials::Session(value.to_string()));
        }
    }
    None
}

/// Optional principal: `None` for anonymous requests, 401 only for a
/// present-but-invalid credential.
pub struct CurrentPrincipal(pub Option<Principal>);

impl FromRequestParts<AppState> for CurrentPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let credentials = extract_credentials(parts, state);
        let principal = state.resolver.resolve(credentials).await?;
        Ok(Self(principal))
    }
}

/// Required principal: anonymous requests get 401 `Unauthenticated`.
pub struct AuthedPrincipal(pub Principal);

impl FromRequestParts<AppState> for AuthedPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentPrincipal(principal) =
            CurrentPrincipal::from_request_parts(parts, state).await?;
        let principal = principal.ok_or(FieldOpsError::Unauthenticated)?;
        Ok(Self(principal))
    }
}

/// Full pipeline entry: principal plus resolved tenant scope.
///
/// Handlers for tenant-scoped resources take this extractor and call
/// the `require_*` guards before touching repositories.
pub struct RequestScope {
    pub principal: Principal,
    pub scope: TenantScope,
}

impl RequestScope {
    pub fn require_role(&self, requirement: &str) -> Result<(), ApiError> {
        rbac::check_role(Some(&self.principal), requirement).map_err(Into::into)
    }

    pub fn require_permission(&self, requirement: &str) -> Result<(), ApiError> {
        rbac::check_permission(Some(&self.principal), requirement).map_err(Into::into)
    }

    pub fn require_admin_or_manager(&self) -> Result<(), ApiError> {
        rbac::check_admin_or_manager(Some(&self.principal)).map_err(Into::into)
    }

    pub fn require_tenant_admin(&self) -> Result<(), ApiError> {
        rbac::check_tenant_admin(Some(&self.principal)).map_err(Into::into)
    }
}

impl FromRequestParts<AppState> for RequestScope {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthedPrincipal(principal) =
            AuthedPrincipal::from_request_parts(parts, state).await?;
        let scope = state.tenant_loader.load(Some(&principal)).await?;
        Ok(Self { principal, scope })
    }
}
