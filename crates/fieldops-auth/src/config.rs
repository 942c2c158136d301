//! Authentication configuration.

use serde::Deserialize;

/// Configuration for identity resolution and the authentication
/// service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// PEM-encoded Ed25519 private key for JWT signing.
    pub jwt_private_key_pem: String,
    /// PEM-encoded Ed25519 public key for JWT verification.
    pub jwt_public_key_pem: String,
    /// Access token lifetime in seconds (default: 900 = 15 minutes).
    pub access_token_lifetime_secs: u64,
    /// Session / refresh token lifetime in seconds
    /// (default: 2_592_000 = 30 days).
    pub session_lifetime_secs: u64,
    /// JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Optional pepper prepended to passwords before Argon2id
    /// hashing and verification.
    pub pepper: Option<String>,
    /// Minimum password length for policy enforcement.
    pub min_password_length: usize,
    /// Name of the cookie carrying the opaque session token.
    pub session_cookie_name: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_private_key_pem: String::new(),
            jwt_public_key_pem: String::new(),
            access_token_lifetime_secs: 900,
            session_lifetime_secs: 2_592_000,
            jwt_issuer: "fieldops".into(),
            pepper: None,
            min_password_length: 12,
            session_cookie_name: "fieldops_session".into(),
        }
    }
}
