//! SurrealDB repository implementations.

mod asset;
mod assignment;
mod audit;
mod job;
mod permission;
mod quota;
mod role;
mod session;
mod signature;
mod tenant;
mod user;
mod worker;

pub use asset::SurrealAssetRepository;
pub use assignment::SurrealAssignmentRepository;
pub use audit::SurrealAuditLogRepository;
pub use job::SurrealJobRepository;
pub use permission::SurrealPermissionRepository;
pub use quota::SurrealQuotaRepository;
pub use role::SurrealRoleRepository;
pub use session::SurrealSessionRepository;
pub use signature::SurrealSignatureRepository;
pub use tenant::SurrealTenantRepository;
pub use user::SurrealUserRepository;
pub use worker::SurrealWorkerRepository;
