//! Tenant context loading — the second stage of the request pipeline.

use fieldops_core::context::TenantScope;
use fieldops_core::error::{FieldOpsError, FieldOpsResult};
use fieldops_core::repository::TenantRepository;
use tracing::warn;

use crate::identity::Principal;

/// Resolves a principal's tenant reference into a [`TenantScope`].
///
/// This is the sole place tenant identity enters request state: the
/// returned scope is immutable and nothing downstream can replace it.
pub struct TenantContextLoader<T> {
    tenant_repo: T,
}

impl<T: TenantRepository> TenantContextLoader<T> {
    pub fn new(tenant_repo: T) -> Self {
        Self { tenant_repo }
    }

    /// Load the tenant scope for a request.
    ///
    /// 1. No principal, or a principal without a tenant reference →
    ///    `NoTenantAssociated`.
    /// 2. The reference does not resolve to a tenant row →
    ///    `InvalidTenant`.
    /// 3. The tenant is not `Active` → `TenantNotActive` (via
    ///    [`TenantScope::for_tenant`]).
    pub async fn load(&self, principal: Option<&Principal>) -> FieldOpsResult<TenantScope> {
        let tenant_id = principal
            .and_then(Principal::tenant_id)
            .ok_or(FieldOpsError::NoTenantAssociated)?;

        let tenant = self
            .tenant_repo
            .get_by_id(tenant_id)
            .await
            .map_err(|e| match e {
                FieldOpsError::NotFound { .. } => {
                    warn!(%tenant_id, "principal references unknown tenant");
                    FieldOpsError::InvalidTenant
                }
                other => other,
            })?;

        TenantScope::for_tenant(&tenant)
    }
}
