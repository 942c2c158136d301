//! Authentication service — login, refresh, and logout orchestration.

use chrono::{Duration, Utc};
use fieldops_core::context::TenantScope;
use fieldops_core::error::{FieldOpsError, FieldOpsResult};
use fieldops_core::models::audit::{ActorType, AuditOutcome, CreateAuditLogEntry};
use fieldops_core::models::session::CreateSession;
use fieldops_core::models::user::{User, UserStatus};
use fieldops_core::password;
use fieldops_core::repository::{
    AuditLogRepository, SessionRepository, TenantRepository, UserRepository,
};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::token;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub tenant_slug: String,
    pub email: String,
    pub password: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Signed JWT access token.
    pub access_token: String,
    /// Raw opaque session token (returned to the client, not stored).
    pub session_token: String,
    /// Session ID (can be used for logout).
    pub session_id: Uuid,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// Input for the refresh rotation flow.
#[derive(Debug)]
pub struct RefreshInput {
    pub raw_session_token: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer has
/// no dependency on the database crate.
pub struct AuthService<T, U, S, A> {
    tenant_repo: T,
    user_repo: U,
    session_repo: S,
    audit_repo: A,
    config: AuthConfig,
}

impl<T, U, S, A> AuthService<T, U, S, A>
where
    T: TenantRepository,
    U: UserRepository,
    S: SessionRepository,
    A: AuditLogRepository,
{
    pub fn new(tenant_repo: T, user_repo: U, session_repo: S, audit_repo: A, config: AuthConfig) -> Self {
        Self {
            tenant_repo,
            user_repo,
            session_repo,
            audit_repo,
            config,
        }
    }

    /// Authenticate with tenant slug + email + password and issue a
    /// token pair.
    ///
    /// Unknown tenant slug, unknown email and wrong password all
    /// collapse to `InvalidCredentials` so callers cannot probe for
    /// accounts. A suspended or inactive tenant is reported as
    /// `TenantNotActive` even for otherwise-valid credentials.
    pub async fn login(&self, input: LoginInput) -> FieldOpsResult<LoginOutput> {
        // 1. Resolve the tenant by slug.
        let tenant = match self.tenant_repo.get_by_slug(&input.tenant_slug).await {
            Ok(t) => t,
            Err(FieldOpsError::NotFound { .. }) => {
                self.audit_denied(None, None, "auth.login", &input).await;
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        // 2. Gate on tenant lifecycle before touching credentials.
        let scope = match TenantScope::for_tenant(&tenant) {
            Ok(s) => s,
            Err(e) => {
                self.audit_denied(Some(tenant.id), None, "auth.login", &input)
                    .await;
                return Err(e);
            }
        };

        // 3. Look up the user within the tenant.
        let user = match self.user_repo.get_by_email(&scope, &input.email).await {
            Ok(u) => u,
            Err(FieldOpsError::NotFound { .. }) => {
                self.audit_denied(Some(tenant.id), None, "auth.login", &input)
                    .await;
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        // 4. Verify the password.
        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;

        if !valid {
            self.audit_denied(Some(tenant.id), Some(user.id), "auth.login", &input)
                .await;
            return Err(AuthError::InvalidCredentials.into());
        }

        // 5. Check account status.
        if user.status != UserStatus::Active {
            self.audit_denied(Some(tenant.id), Some(user.id), "auth.login", &input)
                .await;
            return Err(AuthError::AccountInactive.into());
        }

        // 6. Create a session and issue tokens.
        let output = self
            .open_session(&user, input.ip_address.clone(), input.user_agent.clone())
            .await?;

        self.audit(
            user.tenant_id,
            Some(user.id),
            "auth.login",
            AuditOutcome::Success,
            input.ip_address,
        )
        .await;

        Ok(output)
    }

    /// Rotate a session token: consume the old session, verify the
    /// user is still active, and issue a new token pair.
    ///
    /// Each session token is single-use for refresh — the old session
    /// is invalidated before the new one is created.
    pub async fn refresh(&self, input: RefreshInput) -> FieldOpsResult<LoginOutput> {
        // 1. Look up the session by token hash.
        let token_hash = token::hash_session_token(&input.raw_session_token);
        let session = self
            .session_repo
            .find_by_token_hash(&token_hash)
            .await
            .map_err(|e| match e {
                FieldOpsError::NotFound { .. } => {
                    AuthError::TokenInvalid("session token not found or already used".into())
                        .into()
                }
                other => other,
            })?;

        // 2. Check session expiry.
        if session.expires_at <= Utc::now() {
            let _ = self.session_repo.invalidate(session.id).await;
            return Err(AuthError::TokenExpired.into());
        }

        // 3. Invalidate the old session (single-use guarantee).
        self.session_repo.invalidate(session.id).await?;

        // 4. Verify the user is still active.
        let user = self.user_repo.find_for_identity(session.user_id).await?;
        if user.status != UserStatus::Active {
            return Err(AuthError::AccountInactive.into());
        }

        // 5. Create the replacement session and issue tokens.
        self.open_session(&user, input.ip_address, input.user_agent)
            .await
    }

    /// Invalidate one of the caller's own sessions (logout).
    ///
    /// A session id that belongs to another user is left untouched.
    pub async fn logout(&self, user_id: Uuid, session_id: Uuid) -> FieldOpsResult<()> {
        self.session_repo
            .invalidate_for_user(session_id, user_id)
            .await
    }

    /// Revoke all sessions for a user (e.g. on password change).
    pub async fn logout_all(&self, user_id: Uuid) -> FieldOpsResult<()> {
        self.session_repo.invalidate_user_sessions(user_id).await
    }

    async fn open_session(
        &self,
        user: &User,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> FieldOpsResult<LoginOutput> {
        let raw_token = token::generate_session_token();
        let token_hash = token::hash_session_token(&raw_token);
        let expires_at = Utc::now() + Duration::seconds(self.config.session_lifetime_secs as i64);

        let session = self
            .session_repo
            .create(CreateSession {
                tenant_id: user.tenant_id,
                user_id: user.id,
                token_hash,
                ip_address,
                user_agent,
                expires_at,
            })
            .await?;

        let access_token =
            token::issue_access_token(user.id, user.tenant_id, &self.config)
                .map_err(FieldOpsError::from)?;

        Ok(LoginOutput {
            access_token,
            session_token: raw_token,
            session_id: session.id,
            expires_in: self.config.access_token_lifetime_secs,
        })
    }

    async fn audit_denied(
        &self,
        tenant_id: Option<Uuid>,
        actor_id: Option<Uuid>,
        action: &str,
        input: &LoginInput,
    ) {
        self.audit(
            tenant_id,
            actor_id,
            action,
            AuditOutcome::Denied,
            input.ip_address.clone(),
        )
        .await;
    }

    /// Audit writes are best-effort: a failed append must not mask the
    /// auth outcome.
    async fn audit(
        &self,
        tenant_id: Option<Uuid>,
        actor_id: Option<Uuid>,
        action: &str,
        outcome: AuditOutcome,
        ip_address: Option<String>,
    ) {
        let result = self
            .audit_repo
            .append(CreateAuditLogEntry {
                tenant_id,
                actor_id,
                actor_type: ActorType::User,
                action: action.into(),
                resource: None,
                outcome,
                ip_address,
                metadata: None,
            })
            .await;
        if let Err(e) = result {
            tracing::error!(error = %e, action, "failed to append audit entry");
        }
    }
}
