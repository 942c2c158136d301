//! Role and permission evaluation.
//!
//! Pure functions over `(Option<&Principal>, requirement)`. A
//! requirement string is a pipe-delimited list of alternatives
//! (`"admin|manager"`, `"users.view|users.edit"`); tokens are trimmed
//! and empty tokens ignored. All checks fail closed.

use fieldops_core::error::{FieldOpsError, FieldOpsResult};

use crate::identity::Principal;

/// Split a requirement string into its trimmed alternatives.
pub fn parse_requirement(requirement: &str) -> Vec<String> {
    requirement
        .split('|')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Role-name check: succeeds if the principal's role names intersect
/// the requirement list.
pub fn check_role(principal: Option<&Principal>, requirement: &str) -> FieldOpsResult<()> {
    let principal = principal.ok_or(FieldOpsError::Unauthenticated)?;
    let required = parse_requirement(requirement);

    if required.iter().any(|name| principal.has_role_named(name)) {
        return Ok(());
    }

    Err(FieldOpsError::InsufficientRole {
        required,
        actual: principal.role_names(),
    })
}

/// Permission-key check: succeeds for holders of the `Administrator`
/// role (universal bypass), or if the principal's materialized
/// permission-key union intersects the requirement list.
pub fn check_permission(principal: Option<&Principal>, requirement: &str) -> FieldOpsResult<()> {
    let principal = principal.ok_or(FieldOpsError::Unauthenticated)?;

    if principal.is_administrator() {
        return Ok(());
    }

    let required = parse_requirement(requirement);
    if required.iter().any(|key| principal.has_permission_key(key)) {
        return Ok(());
    }

    Err(FieldOpsError::InsufficientPermission { required })
}

/// Convenience gate: role slug `admin` or `manager`.
pub fn check_admin_or_manager(principal: Option<&Principal>) -> FieldOpsResult<()> {
    let principal = principal.ok_or(FieldOpsError::Unauthenticated)?;

    if principal.has_role_slug("admin") || principal.has_role_slug("manager") {
        return Ok(());
    }

    Err(FieldOpsError::InsufficientRole {
        required: vec!["admin".into(), "manager".into()],
        actual: principal.role_names(),
    })
}

/// Convenience gate: admin-or-manager, additionally requiring that the
/// principal belongs to a tenant. The tenant test runs first,
/// independent of role.
pub fn check_tenant_admin(principal: Option<&Principal>) -> FieldOpsResult<()> {
    let principal = principal.ok_or(FieldOpsError::Unauthenticated)?;

    if principal.tenant_id().is_none() {
        return Err(FieldOpsError::NoTenantAssociated);
    }

    check_admin_or_manager(Some(principal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fieldops_core::models::role::Role;
    use fieldops_core::models::user::{User, UserStatus};
    use std::collections::HashSet;
    use uuid::Uuid;

    fn user(tenant_id: Option<Uuid>) -> User {
        User {
            id: Uuid::new_v4(),
            tenant_id,
            email: "worker@acme.test".into(),
            full_name: "Test Worker".into(),
            password_hash: "x".into(),
            status: UserStatus::Active,
            metadata: serde_json::Value::Object(Default::default()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn role(name: &str, slug: &str) -> Role {
        Role {
            id: Uuid::new_v4(),
            tenant_id: Some(Uuid::new_v4()),
            name: name.into(),
            slug: slug.into(),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn principal(roles: Vec<Role>, keys: &[&str], tenant: Option<Uuid>) -> Principal {
        Principal {
            user: user(tenant),
            roles,
            permission_keys: keys.iter().map(|k| k.to_string()).collect::<HashSet<_>>(),
        }
    }

    #[test]
    fn parse_trims_and_drops_empty_tokens() {
        assert_eq!(
            parse_requirement(" admin | manager ||"),
            vec!["admin".to_string(), "manager".to_string()]
        );
    }

    #[test]
    fn role_check_requires_principal() {
        assert!(matches!(
            check_role(None, "admin"),
            Err(FieldOpsError::Unauthenticated)
        ));
    }

    #[test]
    fn role_check_intersects_names() {
        let p = principal(vec![role("manager", "manager")], &[], Some(Uuid::new_v4()));
        assert!(check_role(Some(&p), "admin|manager").is_ok());
        // Order-independent.
        assert!(check_role(Some(&p), "manager|admin").is_ok());
    }

    #[test]
    fn role_check_reports_actual_roles() {
        let p = principal(vec![role("worker", "worker")], &[], Some(Uuid::new_v4()));
        match check_role(Some(&p), "admin|manager") {
            Err(FieldOpsError::InsufficientRole { required, actual }) => {
                assert_eq!(required, vec!["admin".to_string(), "manager".to_string()]);
                assert_eq!(actual, vec!["worker".to_string()]);
            }
            other => panic!("expected InsufficientRole, got {other:?}"),
        }
    }

    #[test]
    fn role_check_trims_whitespace() {
        let p = principal(vec![role("manager", "manager")], &[], Some(Uuid::new_v4()));
        assert!(check_role(Some(&p), "  admin |  manager  ").is_ok());
    }

    #[test]
    fn permission_check_matches_key_union() {
        let p = principal(
            vec![role("worker", "worker")],
            &["jobs.view", "jobs.edit"],
            Some(Uuid::new_v4()),
        );
        assert!(check_permission(Some(&p), "jobs.view|jobs.create").is_ok());
        assert!(matches!(
            check_permission(Some(&p), "users.view|users.edit"),
            Err(FieldOpsError::InsufficientPermission { .. })
        ));
    }

    #[test]
    fn administrator_bypasses_every_permission_check() {
        let p = principal(
            vec![role("Administrator", "admin")],
            &[],
            Some(Uuid::new_v4()),
        );
        assert!(check_permission(Some(&p), "users.view").is_ok());
        assert!(check_permission(Some(&p), "anything.at.all").is_ok());
    }

    #[test]
    fn administrator_bypass_is_case_sensitive() {
        let p = principal(
            vec![role("administrator", "admin")],
            &[],
            Some(Uuid::new_v4()),
        );
        assert!(matches!(
            check_permission(Some(&p), "users.view"),
            Err(FieldOpsError::InsufficientPermission { .. })
        ));
    }

    #[test]
    fn permission_check_requires_principal() {
        assert!(matches!(
            check_permission(None, "users.view"),
            Err(FieldOpsError::Unauthenticated)
        ));
    }

    #[test]
    fn admin_or_manager_gate() {
        let admin = principal(
            vec![role("Administrator", "admin")],
            &[],
            Some(Uuid::new_v4()),
        );
        let manager = principal(vec![role("manager", "manager")], &[], Some(Uuid::new_v4()));
        let worker = principal(vec![role("worker", "worker")], &[], Some(Uuid::new_v4()));

        assert!(check_admin_or_manager(Some(&admin)).is_ok());
        assert!(check_admin_or_manager(Some(&manager)).is_ok());
        assert!(matches!(
            check_admin_or_manager(Some(&worker)),
            Err(FieldOpsError::InsufficientRole { .. })
        ));
    }

    #[test]
    fn tenant_admin_gate_requires_tenant_before_role() {
        // Platform account with an admin role still fails on the
        // missing tenant.
        let platform_admin = principal(vec![role("Administrator", "admin")], &[], None);
        assert!(matches!(
            check_tenant_admin(Some(&platform_admin)),
            Err(FieldOpsError::NoTenantAssociated)
        ));

        let tenant_admin = principal(
            vec![role("Administrator", "admin")],
            &[],
            Some(Uuid::new_v4()),
        );
        assert!(check_tenant_admin(Some(&tenant_admin)).is_ok());
    }

    #[test]
    fn evaluation_is_repeatable() {
        let p = principal(
            vec![role("manager", "manager")],
            &["users.view"],
            Some(Uuid::new_v4()),
        );
        for _ in 0..3 {
            assert!(check_role(Some(&p), "manager").is_ok());
            assert!(check_permission(Some(&p), "users.view").is_ok());
        }
    }
}
