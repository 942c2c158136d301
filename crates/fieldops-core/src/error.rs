//! Error types for the FieldOps system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FieldOpsError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    /// No resolvable principal where one is required.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// The principal carries no tenant reference.
    #[error("No tenant associated with the current principal")]
    NoTenantAssociated,

    /// The principal's tenant reference does not resolve to a tenant.
    #[error("Tenant reference does not resolve to a known tenant")]
    InvalidTenant,

    /// The tenant exists but is suspended or inactive.
    #[error("Tenant '{slug}' is not active")]
    TenantNotActive { slug: String },

    #[error("Missing required role (need one of: {})", .required.join(", "))]
    InsufficientRole {
        required: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Missing required permission (need one of: {})", .required.join(", "))]
    InsufficientPermission { required: Vec<String> },

    #[error("Quota exceeded for {quota_type}: {current_usage} of {quota_limit}")]
    QuotaExceeded {
        quota_type: String,
        quota_limit: u64,
        current_usage: u64,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type FieldOpsResult<T> = Result<T, FieldOpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_message_is_bare() {
        assert_eq!(FieldOpsError::Unauthenticated.to_string(), "Unauthenticated");
    }

    #[test]
    fn insufficient_role_lists_alternatives() {
        let err = FieldOpsError::InsufficientRole {
            required: vec!["admin".into(), "manager".into()],
            actual: vec!["worker".into()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required role (need one of: admin, manager)"
        );
    }

    #[test]
    fn quota_exceeded_reports_usage() {
        let err = FieldOpsError::QuotaExceeded {
            quota_type: "users".into(),
            quota_limit: 2,
            current_usage: 2,
        };
        assert_eq!(err.to_string(), "Quota exceeded for users: 2 of 2");
    }
}
