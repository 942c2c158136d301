//! FieldOps Core — domain models, error taxonomy, and repository
//! contracts.
//!
//! This crate performs no I/O. It defines:
//! - Domain models ([`models`])
//! - The workspace error taxonomy ([`FieldOpsError`])
//! - The request-scoped tenant handle ([`TenantScope`])
//! - Credential hashing shared by storage and auth ([`password`])
//! - Repository traits implemented by the storage layer ([`repository`])

pub mod context;
pub mod error;
pub mod models;
pub mod password;
pub mod repository;

pub use context::TenantScope;
pub use error::{FieldOpsError, FieldOpsResult};
