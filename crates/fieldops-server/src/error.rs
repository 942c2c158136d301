//! Error to HTTP response mapping.
//!
//! Every body carries `message`. Denials add diagnostic fields so
//! clients can render actionable errors: role failures report the
//! required and held roles, permission failures the required keys,
//! quota failures the axis, ceiling, and current usage.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fieldops_core::FieldOpsError;
use serde_json::{Value, json};
use tracing::error;

/// Wrapper turning a [`FieldOpsError`] into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub FieldOpsError);

impl From<FieldOpsError> for ApiError {
    fn from(err: FieldOpsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            FieldOpsError::Unauthenticated | FieldOpsError::AuthenticationFailed { .. } => (
                StatusCode::UNAUTHORIZED,
                json!({ "message": self.0.to_string() }),
            ),
            FieldOpsError::NoTenantAssociated
            | FieldOpsError::InvalidTenant
            | FieldOpsError::TenantNotActive { .. } => (
                StatusCode::FORBIDDEN,
                json!({ "message": self.0.to_string() }),
            ),
            FieldOpsError::InsufficientRole { required, actual } => (
                StatusCode::FORBIDDEN,
                json!({
                    "message": self.0.to_string(),
                    "required_roles": required,
                    "user_roles": actual,
                }),
            ),
            FieldOpsError::InsufficientPermission { required } => (
                StatusCode::FORBIDDEN,
                json!({
                    "message": self.0.to_string(),
                    "required_permissions": required,
                }),
            ),
            FieldOpsError::QuotaExceeded {
                quota_type,
                quota_limit,
                current_usage,
            } => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({
                    "message": self.0.to_string(),
                    "quota_type": quota_type,
                    "quota_limit": quota_limit,
                    "current_usage": current_usage,
                }),
            ),
            FieldOpsError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                json!({ "message": self.0.to_string() }),
            ),
            FieldOpsError::AlreadyExists { .. } => (
                StatusCode::CONFLICT,
                json!({ "message": self.0.to_string() }),
            ),
            FieldOpsError::Validation { .. } => (
                StatusCode::BAD_REQUEST,
                json!({ "message": self.0.to_string() }),
            ),
            FieldOpsError::Database(_)
            | FieldOpsError::Crypto(_)
            | FieldOpsError::Internal(_) => {
                error!(error = %self.0, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error" }),
                )
            }
        };

        (status, Json::<Value>(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
