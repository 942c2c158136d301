//! FieldOps Auth — identity resolution, RBAC evaluation, tenant
//! context loading, quota gating, and the authentication service.

pub mod config;
pub mod error;
pub mod identity;
pub mod quota;
pub mod rbac;
pub mod service;
pub mod tenant;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use identity::{Credentials, IdentityResolver, Principal};
pub use quota::{QuotaAxis, QuotaGate};
pub use service::{AuthService, LoginInput, LoginOutput, RefreshInput};
pub use tenant::TenantContextLoader;
pub use token::AccessTokenClaims;
