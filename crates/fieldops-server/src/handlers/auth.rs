//! Authentication endpoints: login, refresh, logout.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::header::USER_AGENT;
use fieldops_auth::{LoginInput, RefreshInput};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::AuthedPrincipal;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub tenant_slug: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub session_token: String,
    pub session_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub session_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub session_id: Uuid,
}

fn client_meta(headers: &HeaderMap) -> (Option<String>, Option<String>) {
    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());
    let ua = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    (ip, ua)
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let (ip_address, user_agent) = client_meta(&headers);

    let output = state
        .auth_service
        .login(LoginInput {
            tenant_slug: body.tenant_slug,
            email: body.email,
            password: body.password,
            ip_address,
            user_agent,
        })
        .await?;

    Ok(Json(TokenResponse {
        access_token: output.access_token,
        token_type: "Bearer",
        expires_in: output.expires_in,
        session_token: output.session_token,
        session_id: output.session_id,
    }))
}

pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RefreshRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let (ip_address, user_agent) = client_meta(&headers);

    let output = state
        .auth_service
        .refresh(RefreshInput {
            raw_session_token: body.session_token,
            ip_address,
            user_agent,
        })
        .await?;

    Ok(Json(TokenResponse {
        access_token: output.access_token,
        token_type: "Bearer",
        expires_in: output.expires_in,
        session_token: output.session_token,
        session_id: output.session_id,
    }))
}

pub async fn logout(
    State(state): State<AppState>,
    AuthedPrincipal(principal): AuthedPrincipal,
    Json(body): Json<LogoutRequest>,
) -> ApiResult<axum::http::StatusCode> {
    // Only the caller's own sessions can be invalidated.
    state
        .auth_service
        .logout(principal.user_id(), body.session_id)
        .await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

pub async fn logout_all(
    State(state): State<AppState>,
    AuthedPrincipal(principal): AuthedPrincipal,
) -> ApiResult<axum::http::StatusCode> {
    state.auth_service.logout_all(principal.user_id()).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
