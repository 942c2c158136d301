//! Shared application state.

use std::sync::Arc;

use fieldops_auth::{AuthConfig, AuthService, IdentityResolver, QuotaGate, TenantContextLoader};
use fieldops_db::repository::{
    SurrealAssetRepository, SurrealAssignmentRepository, SurrealAuditLogRepository,
    SurrealJobRepository, SurrealPermissionRepository, SurrealQuotaRepository,
    SurrealRoleRepository, SurrealSessionRepository, SurrealSignatureRepository,
    SurrealTenantRepository, SurrealUserRepository, SurrealWorkerRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

pub type Resolver = IdentityResolver<
    SurrealUserRepository<Any>,
    SurrealSessionRepository<Any>,
    SurrealRoleRepository<Any>,
    SurrealPermissionRepository<Any>,
>;

pub type TenantLoader = TenantContextLoader<SurrealTenantRepository<Any>>;

pub type Gate = QuotaGate<
    SurrealQuotaRepository<Any>,
    SurrealUserRepository<Any>,
    SurrealJobRepository<Any>,
>;

pub type Auth = AuthService<
    SurrealTenantRepository<Any>,
    SurrealUserRepository<Any>,
    SurrealSessionRepository<Any>,
    SurrealAuditLogRepository<Any>,
>;

/// Everything a handler needs, cloneable per request.
#[derive(Clone)]
pub struct AppState {
    pub db: Surreal<Any>,
    pub auth_config: AuthConfig,

    pub resolver: Arc<Resolver>,
    pub tenant_loader: Arc<TenantLoader>,
    pub quota_gate: Arc<Gate>,
    pub auth_service: Arc<Auth>,

    pub tenants: SurrealTenantRepository<Any>,
    pub users: SurrealUserRepository<Any>,
    pub roles: SurrealRoleRepository<Any>,
    pub permissions: SurrealPermissionRepository<Any>,
    pub quotas: SurrealQuotaRepository<Any>,
    pub workers: SurrealWorkerRepository<Any>,
    pub jobs: SurrealJobRepository<Any>,
    pub assets: SurrealAssetRepository<Any>,
    pub assignments: SurrealAssignmentRepository<Any>,
    pub signatures: SurrealSignatureRepository<Any>,
    pub audit: SurrealAuditLogRepository<Any>,
}

impl AppState {
    pub fn new(db: Surreal<Any>, auth_config: AuthConfig) -> Self {
        let users = match &auth_config.pepper {
            Some(pepper) => SurrealUserRepository::with_pepper(db.clone(), pepper.clone()),
            None => SurrealUserRepository::new(db.clone()),
        };
        let tenants = SurrealTenantRepository::new(db.clone());
        let roles = SurrealRoleRepository::new(db.clone());
        let permissions = SurrealPermissionRepository::new(db.clone());
        let quotas = SurrealQuotaRepository::new(db.clone());
        let sessions = SurrealSessionRepository::new(db.clone());
        let workers = SurrealWorkerRepository::new(db.clone());
        let jobs = SurrealJobRepository::new(db.clone());
        let assets = SurrealAssetRepository::new(db.clone());
        let assignments = SurrealAssignmentRepository::new(db.clone());
        let signatures = SurrealSignatureRepository::new(db.clone());
        let audit = SurrealAuditLogRepository::new(db.clone());

        let resolver = Arc::new(IdentityResolver::new(
            users.clone(),
            sessions.clone(),
            roles.clone(),
            permissions.clone(),
            auth_config.clone(),
        ));
        let tenant_loader = Arc::new(TenantContextLoader::new(tenants.clone()));
        let quota_gate = Arc::new(QuotaGate::new(
            quotas.clone(),
            users.clone(),
            jobs.clone(),
        ));
        let auth_service = Arc::new(AuthService::new(
            tenants.clone(),
            users.clone(),
            sessions,
            audit.clone(),
            auth_config.clone(),
        ));

        Self {
            db,
            auth_config,
            resolver,
            tenant_loader,
            quota_gate,
            auth_service,
            tenants,
            users,
            roles,
            permissions,
            quotas,
            workers,
            jobs,
            assets,
            assignments,
            signatures,
            audit,
        }
    }
}
