//! Storage-layer error type.
//!
//! `DbError` stays internal to this crate. Repositories surface
//! [`FieldOpsError`] at the trait boundary; `NotFound` keeps its shape
//! through the conversion so tenant misses and genuinely absent rows
//! stay indistinguishable to callers.

use fieldops_core::error::FieldOpsError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("surrealdb: {0}")]
    Surreal(#[from] surrealdb::Error),

    /// A schema statement failed or a row did not decode.
    #[error("schema or decode failure: {0}")]
    Migration(String),

    #[error("no {entity} row for {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for FieldOpsError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => FieldOpsError::NotFound { entity, id },
            other => FieldOpsError::Database(other.to_string()),
        }
    }
}
