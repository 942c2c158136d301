//! Identity resolution — the first stage of the request pipeline.
//!
//! Turns a request credential (bearer JWT or opaque session token)
//! into a [`Principal`]: the user row plus the user's role set and
//! the union of permission keys across those roles, loaded once per
//! request so every later check evaluates against the same snapshot.

use std::collections::HashSet;

use fieldops_core::error::{FieldOpsError, FieldOpsResult};
use fieldops_core::models::role::{ADMINISTRATOR_ROLE, Role};
use fieldops_core::models::user::{User, UserStatus};
use fieldops_core::repository::{
    PermissionRepository, RoleRepository, SessionRepository, UserRepository,
};
use tracing::debug;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::token;

/// A request credential, as extracted from the transport layer.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// `Authorization: Bearer <jwt>` — stateless API scheme.
    Bearer(String),
    /// Opaque session-cookie token, matched by SHA-256 hash.
    Session(String),
}

/// The authenticated identity behind a request.
///
/// Role names and permission keys are materialized at resolution time;
/// authorization checks are set-membership tests against this snapshot
/// and never touch the store again.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user: User,
    pub roles: Vec<Role>,
    pub permission_keys: HashSet<String>,
}

impl Principal {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    /// The principal's tenant reference, if any.
    pub fn tenant_id(&self) -> Option<Uuid> {
        self.user.tenant_id
    }

    pub fn role_names(&self) -> Vec<String> {
        self.roles.iter().map(|r| r.name.clone()).collect()
    }

    /// True if the principal holds a role named exactly
    /// `Administrator` (case-sensitive) — the universal permission
    /// bypass.
    pub fn is_administrator(&self) -> bool {
        self.roles.iter().any(|r| r.name == ADMINISTRATOR_ROLE)
    }

    pub fn has_role_named(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name == name)
    }

    pub fn has_role_slug(&self, slug: &str) -> bool {
        self.roles.iter().any(|r| r.slug == slug)
    }

    pub fn has_permission_key(&self, key: &str) -> bool {
        self.permission_keys.contains(key)
    }
}

/// Resolves request credentials into a [`Principal`].
///
/// Generic over the directory repositories so the auth layer has no
/// dependency on the database crate.
pub struct IdentityResolver<U, S, R, P> {
    user_repo: U,
    session_repo: S,
    role_repo: R,
    permission_repo: P,
    config: AuthConfig,
}

impl<U, S, R, P> IdentityResolver<U, S, R, P>
where
    U: UserRepository,
    S: SessionRepository,
    R: RoleRepository,
    P: PermissionRepository,
{
    pub fn new(
        user_repo: U,
        session_repo: S,
        role_repo: R,
        permission_repo: P,
        config: AuthConfig,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            role_repo,
            permission_repo,
            config,
        }
    }

    /// Resolve a credential into a principal.
    ///
    /// Absent credentials are not an error: `Ok(None)` lets downstream
    /// guards decide whether anonymous access is permitted. A present
    /// but invalid credential fails with `AuthenticationFailed`.
    /// Read-only — expired sessions are rejected, not deleted.
    pub async fn resolve(
        &self,
        credentials: Option<Credentials>,
    ) -> FieldOpsResult<Option<Principal>> {
        let user_id = match credentials {
            None => return Ok(None),
            Some(Credentials::Bearer(jwt)) => {
                let validated = token::validate_access_token(&jwt, &self.config)
                    .map_err(FieldOpsError::from)?;
                Uuid::parse_str(&validated.0.sub).map_err(|e| {
                    FieldOpsError::from(AuthError::TokenInvalid(format!("bad subject: {e}")))
                })?
            }
            Some(Credentials::Session(raw)) => {
                let hash = token::hash_session_token(&raw);
                let session = self
                    .session_repo
                    .find_by_token_hash(&hash)
                    .await
                    .map_err(|e| match e {
                        FieldOpsError::NotFound { .. } => AuthError::InvalidCredentials.into(),
                        other => other,
                    })?;
                if session.expires_at <= chrono::Utc::now() {
                    return Err(AuthError::TokenExpired.into());
                }
                session.user_id
            }
        };

        let user = self
            .user_repo
            .find_for_identity(user_id)
            .await
            .map_err(|e| match e {
                FieldOpsError::NotFound { .. } => AuthError::InvalidCredentials.into(),
                other => other,
            })?;

        if user.status != UserStatus::Active {
            return Err(AuthError::AccountInactive.into());
        }

        self.materialize(user).await.map(Some)
    }

    /// Load the user's role set and permission-key union.
    async fn materialize(&self, user: User) -> FieldOpsResult<Principal> {
        let roles = self.role_repo.roles_for_user(user.id).await?;
        let permission_keys: HashSet<String> = self
            .permission_repo
            .keys_for_user(user.id)
            .await?
            .into_iter()
            .collect();

        debug!(
            user_id = %user.id,
            roles = roles.len(),
            permissions = permission_keys.len(),
            "principal resolved"
        );

        Ok(Principal {
            user,
            roles,
            permission_keys,
        })
    }
}
