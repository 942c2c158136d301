//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Every method that touches a
//! tenant-scoped entity takes a [`TenantScope`] as its first argument,
//! so a data access that skips the tenant filter does not typecheck.
//! Indirectly scoped entities (job assignments, signatures) take the
//! scope too and are constrained through their owning row's tenant.
//!
//! The only unscoped lookups are the identity-resolution escape
//! hatches on [`UserRepository`], [`SessionRepository`],
//! [`RoleRepository`] and [`PermissionRepository`]; each is marked as
//! such in its doc comment and must never be called from a business
//! handler.

use uuid::Uuid;

use crate::context::TenantScope;
use crate::error::FieldOpsResult;
use crate::models::{
    asset::{Asset, CreateAsset, UpdateAsset},
    assignment::{CreateJobAssignment, JobAssignment},
    audit::{AuditLogEntry, CreateAuditLogEntry},
    job::{CreateJob, Job, UpdateJob},
    permission::{CreatePermission, Permission},
    quota::{SetTenantQuota, TenantQuota},
    role::{CreateRole, Role},
    session::{CreateSession, Session},
    signature::{CreateSignature, Signature},
    tenant::{CreateTenant, Tenant, UpdateTenant},
    user::{CreateUser, UpdateUser, User},
    worker::{CreateWorker, UpdateWorker, Worker},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Tenant (global scope)
// ---------------------------------------------------------------------------

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: CreateTenant) -> impl Future<Output = FieldOpsResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = FieldOpsResult<Tenant>> + Send;
    fn get_by_slug(&self, slug: &str) -> impl Future<Output = FieldOpsResult<Tenant>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateTenant,
    ) -> impl Future<Output = FieldOpsResult<Tenant>> + Send;
}

// ---------------------------------------------------------------------------
// Users (tenant-scoped)
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(
        &self,
        scope: &TenantScope,
        input: CreateUser,
    ) -> impl Future<Output = FieldOpsResult<User>> + Send;
    fn get_by_id(
        &self,
        scope: &TenantScope,
        id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<User>> + Send;
    fn get_by_email(
        &self,
        scope: &TenantScope,
        email: &str,
    ) -> impl Future<Output = FieldOpsResult<User>> + Send;
    fn update(
        &self,
        scope: &TenantScope,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = FieldOpsResult<User>> + Send;
    /// Soft-delete: sets status to Inactive.
    fn delete(
        &self,
        scope: &TenantScope,
        id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<()>> + Send;
    fn list(
        &self,
        scope: &TenantScope,
        pagination: Pagination,
    ) -> impl Future<Output = FieldOpsResult<PaginatedResult<User>>> + Send;
    /// Count all users of the tenant, for the `users` quota axis.
    fn count(&self, scope: &TenantScope) -> impl Future<Output = FieldOpsResult<u64>> + Send;

    /// Identity-resolution escape hatch: fetch a user by id with no
    /// tenant filter. Only the identity resolver may call this; the
    /// tenant context loader re-validates the user's tenant afterwards.
    fn find_for_identity(&self, id: Uuid) -> impl Future<Output = FieldOpsResult<User>> + Send;
}

// ---------------------------------------------------------------------------
// Roles & permissions
// ---------------------------------------------------------------------------

pub trait RoleRepository: Send + Sync {
    fn create(
        &self,
        scope: &TenantScope,
        input: CreateRole,
    ) -> impl Future<Output = FieldOpsResult<Role>> + Send;
    fn get_by_slug(
        &self,
        scope: &TenantScope,
        slug: &str,
    ) -> impl Future<Output = FieldOpsResult<Role>> + Send;
    fn list(&self, scope: &TenantScope) -> impl Future<Output = FieldOpsResult<Vec<Role>>> + Send;

    /// Assign a role to a user (creates a `has_role` edge). The role
    /// must belong to the scope's tenant.
    fn assign_to_user(
        &self,
        scope: &TenantScope,
        user_id: Uuid,
        role_id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<()>> + Send;

    fn unassign_from_user(
        &self,
        scope: &TenantScope,
        user_id: Uuid,
        role_id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<()>> + Send;

    /// Identity-resolution escape hatch: all roles held by a user,
    /// regardless of tenant. Used once per request to materialize the
    /// principal's role set.
    fn roles_for_user(&self, user_id: Uuid)
    -> impl Future<Output = FieldOpsResult<Vec<Role>>> + Send;
}

pub trait PermissionRepository: Send + Sync {
    /// Insert a catalog entry; returns the existing row if the key is
    /// already present (idempotent, for seeding).
    fn ensure(
        &self,
        input: CreatePermission,
    ) -> impl Future<Output = FieldOpsResult<Permission>> + Send;
    fn get_by_key(&self, key: &str) -> impl Future<Output = FieldOpsResult<Permission>> + Send;
    fn list(&self) -> impl Future<Output = FieldOpsResult<Vec<Permission>>> + Send;

    /// Grant a permission to a role (creates a `grants` edge).
    fn grant_to_role(
        &self,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<()>> + Send;

    /// Identity-resolution escape hatch: the union of permission keys
    /// across all roles held by a user.
    fn keys_for_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<Vec<String>>> + Send;
}

// ---------------------------------------------------------------------------
// Quotas (tenant-scoped)
// ---------------------------------------------------------------------------

pub trait QuotaRepository: Send + Sync {
    /// The tenant's quota row, or `None` if no ceilings are configured.
    fn get(
        &self,
        scope: &TenantScope,
    ) -> impl Future<Output = FieldOpsResult<Option<TenantQuota>>> + Send;
    /// Create or replace the tenant's quota row.
    fn set(
        &self,
        scope: &TenantScope,
        input: SetTenantQuota,
    ) -> impl Future<Output = FieldOpsResult<TenantQuota>> + Send;
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

pub trait SessionRepository: Send + Sync {
    fn create(
        &self,
        input: CreateSession,
    ) -> impl Future<Output = FieldOpsResult<Session>> + Send;
    /// Identity-resolution escape hatch: sessions are looked up by
    /// token hash before any tenant is known. The hash is unique.
    fn find_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = FieldOpsResult<Session>> + Send;
    /// Invalidate a single session by id (refresh rotation, where the
    /// session row has already been loaded and checked).
    fn invalidate(&self, id: Uuid) -> impl Future<Output = FieldOpsResult<()>> + Send;
    /// Invalidate a session only if it belongs to the given user. A
    /// foreign or unknown session id is a silent no-op, so callers
    /// cannot revoke (or probe for) other users' sessions.
    fn invalidate_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<()>> + Send;
    /// Invalidate all sessions for a user (e.g. on password change).
    fn invalidate_user_sessions(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<()>> + Send;
    /// Remove all expired sessions; returns the number removed.
    fn cleanup_expired(&self) -> impl Future<Output = FieldOpsResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Workers / Jobs / Assets (tenant-scoped)
// ---------------------------------------------------------------------------

pub trait WorkerRepository: Send + Sync {
    fn create(
        &self,
        scope: &TenantScope,
        input: CreateWorker,
    ) -> impl Future<Output = FieldOpsResult<Worker>> + Send;
    fn get_by_id(
        &self,
        scope: &TenantScope,
        id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<Worker>> + Send;
    fn update(
        &self,
        scope: &TenantScope,
        id: Uuid,
        input: UpdateWorker,
    ) -> impl Future<Output = FieldOpsResult<Worker>> + Send;
    fn delete(
        &self,
        scope: &TenantScope,
        id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<()>> + Send;
    fn list(
        &self,
        scope: &TenantScope,
        pagination: Pagination,
    ) -> impl Future<Output = FieldOpsResult<PaginatedResult<Worker>>> + Send;
}

pub trait JobRepository: Send + Sync {
    fn create(
        &self,
        scope: &TenantScope,
        input: CreateJob,
    ) -> impl Future<Output = FieldOpsResult<Job>> + Send;
    fn get_by_id(
        &self,
        scope: &TenantScope,
        id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<Job>> + Send;
    fn update(
        &self,
        scope: &TenantScope,
        id: Uuid,
        input: UpdateJob,
    ) -> impl Future<Output = FieldOpsResult<Job>> + Send;
    fn delete(
        &self,
        scope: &TenantScope,
        id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<()>> + Send;
    fn list(
        &self,
        scope: &TenantScope,
        pagination: Pagination,
    ) -> impl Future<Output = FieldOpsResult<PaginatedResult<Job>>> + Send;
    /// Count jobs created in the given calendar month (matched on both
    /// month and year), for the `jobs` quota axis.
    fn count_created_in_month(
        &self,
        scope: &TenantScope,
        year: i32,
        month: u32,
    ) -> impl Future<Output = FieldOpsResult<u64>> + Send;
}

pub trait AssetRepository: Send + Sync {
    fn create(
        &self,
        scope: &TenantScope,
        input: CreateAsset,
    ) -> impl Future<Output = FieldOpsResult<Asset>> + Send;
    fn get_by_id(
        &self,
        scope: &TenantScope,
        id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<Asset>> + Send;
    fn update(
        &self,
        scope: &TenantScope,
        id: Uuid,
        input: UpdateAsset,
    ) -> impl Future<Output = FieldOpsResult<Asset>> + Send;
    fn delete(
        &self,
        scope: &TenantScope,
        id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<()>> + Send;
    fn list(
        &self,
        scope: &TenantScope,
        pagination: Pagination,
    ) -> impl Future<Output = FieldOpsResult<PaginatedResult<Asset>>> + Send;
}

// ---------------------------------------------------------------------------
// Indirectly scoped entities
// ---------------------------------------------------------------------------

/// Job assignments carry no `tenant_id`; every operation constrains the
/// owning job to the scope's tenant, so another tenant's job (and its
/// assignments) are indistinguishable from rows that do not exist.
pub trait AssignmentRepository: Send + Sync {
    fn create(
        &self,
        scope: &TenantScope,
        job_id: Uuid,
        input: CreateJobAssignment,
    ) -> impl Future<Output = FieldOpsResult<JobAssignment>> + Send;
    fn list_for_job(
        &self,
        scope: &TenantScope,
        job_id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<Vec<JobAssignment>>> + Send;
    fn delete(
        &self,
        scope: &TenantScope,
        job_id: Uuid,
        id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<()>> + Send;
}

/// Signatures are scoped through the owning user's tenant.
pub trait SignatureRepository: Send + Sync {
    fn create(
        &self,
        scope: &TenantScope,
        user_id: Uuid,
        input: CreateSignature,
    ) -> impl Future<Output = FieldOpsResult<Signature>> + Send;
    fn list_for_user(
        &self,
        scope: &TenantScope,
        user_id: Uuid,
    ) -> impl Future<Output = FieldOpsResult<Vec<Signature>>> + Send;
}

// ---------------------------------------------------------------------------
// Audit (append-only)
// ---------------------------------------------------------------------------

pub trait AuditLogRepository: Send + Sync {
    /// Append a new audit log entry. The payload carries an optional
    /// tenant id directly because denials are recorded before a scope
    /// exists (failed logins, unknown tenants). No update or delete
    /// operations exist.
    fn append(
        &self,
        input: CreateAuditLogEntry,
    ) -> impl Future<Output = FieldOpsResult<AuditLogEntry>> + Send;
    fn list(
        &self,
        scope: &TenantScope,
        pagination: Pagination,
    ) -> impl Future<Output = FieldOpsResult<PaginatedResult<AuditLogEntry>>> + Send;
}
