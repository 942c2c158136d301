//! Request-scoped tenant context.

use uuid::Uuid;

use crate::error::{FieldOpsError, FieldOpsResult};
use crate::models::tenant::{Tenant, TenantStatus};

/// Immutable handle to the tenant a request is acting for.
///
/// A scope can only be built from an `Active` tenant row, and every
/// tenant-scoped repository method takes one by reference. Handlers
/// never pass a raw tenant id to the data layer, so a data access that
/// skips the tenant filter does not typecheck. The scope is created
/// once per request by the tenant context loader and never mutated
/// afterwards.
#[derive(Debug, Clone)]
pub struct TenantScope {
    tenant_id: Uuid,
    slug: String,
    name: String,
}

impl TenantScope {
    /// Build a scope for the given tenant.
    ///
    /// Fails with [`FieldOpsError::TenantNotActive`] for suspended or
    /// inactive tenants, which is the sole status gate in the system.
    pub fn for_tenant(tenant: &Tenant) -> FieldOpsResult<Self> {
        match tenant.status {
            TenantStatus::Active => Ok(Self {
                tenant_id: tenant.id,
                slug: tenant.slug.clone(),
                name: tenant.name.clone(),
            }),
            TenantStatus::Suspended | TenantStatus::Inactive => {
                Err(FieldOpsError::TenantNotActive {
                    slug: tenant.slug.clone(),
                })
            }
        }
    }

    pub fn tenant_id(&self) -> Uuid {
        self.tenant_id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn tenant(status: TenantStatus) -> Tenant {
        Tenant {
            id: Uuid::new_v4(),
            name: "Acme Field Services".into(),
            slug: "acme".into(),
            status,
            metadata: serde_json::Value::Object(Default::default()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn active_tenant_yields_scope() {
        let t = tenant(TenantStatus::Active);
        let scope = TenantScope::for_tenant(&t).unwrap();
        assert_eq!(scope.tenant_id(), t.id);
        assert_eq!(scope.slug(), "acme");
    }

    #[test]
    fn suspended_tenant_is_rejected() {
        let t = tenant(TenantStatus::Suspended);
        match TenantScope::for_tenant(&t) {
            Err(FieldOpsError::TenantNotActive { slug }) => assert_eq!(slug, "acme"),
            other => panic!("expected TenantNotActive, got {other:?}"),
        }
    }

    #[test]
    fn inactive_tenant_is_rejected() {
        let t = tenant(TenantStatus::Inactive);
        assert!(matches!(
            TenantScope::for_tenant(&t),
            Err(FieldOpsError::TenantNotActive { .. })
        ));
    }
}
