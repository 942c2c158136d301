//! Credential hashing.
//!
//! The single home for the Argon2id parameters and the pepper
//! handling. The storage layer hashes here when a user is created and
//! the auth layer verifies here at login, so the two sides cannot
//! drift. A pepper, when configured, is prepended to the plaintext on
//! both sides; hashes made with a pepper never verify without it.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};

use crate::error::{FieldOpsError, FieldOpsResult};

// OWASP ASVS baseline: 19 MiB memory, 2 iterations, 1 lane.
const MEMORY_KIB: u32 = 19_456;
const ITERATIONS: u32 = 2;
const LANES: u32 = 1;

fn hasher() -> FieldOpsResult<Argon2<'static>> {
    let params = Params::new(MEMORY_KIB, ITERATIONS, LANES, None)
        .map_err(|e| FieldOpsError::Crypto(format!("argon2 params: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn apply_pepper(password: &str, pepper: Option<&str>) -> Vec<u8> {
    match pepper {
        Some(p) => format!("{p}{password}").into_bytes(),
        None => password.as_bytes().to_vec(),
    }
}

/// Hash a plaintext password into PHC string form. A fresh random salt
/// is drawn per call, so equal passwords produce distinct hashes.
pub fn hash_password(password: &str, pepper: Option<&str>) -> FieldOpsResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(&apply_pepper(password, pepper), &salt)
        .map_err(|e| FieldOpsError::Crypto(format!("password hash: {e}")))?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC hash.
///
/// `Ok(false)` is an ordinary mismatch; `Err(Crypto)` means the stored
/// hash itself is unreadable.
pub fn verify_password(password: &str, hash: &str, pepper: Option<&str>) -> FieldOpsResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| FieldOpsError::Crypto(format!("stored hash unreadable: {e}")))?;

    match hasher()?.verify_password(&apply_pepper(password, pepper), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(FieldOpsError::Crypto(format!("verification: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_accepts_the_original_password() {
        let hash = hash_password("s3cret-plain", None).unwrap();
        assert!(verify_password("s3cret-plain", &hash, None).unwrap());
    }

    #[test]
    fn rejects_a_different_password() {
        let hash = hash_password("s3cret-plain", None).unwrap();
        assert!(!verify_password("something-else", &hash, None).unwrap());
    }

    #[test]
    fn hashes_are_argon2id_with_unique_salts() {
        let first = hash_password("s3cret-plain", None).unwrap();
        let second = hash_password("s3cret-plain", None).unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(verify_password("s3cret-plain", &second, None).unwrap());
    }

    #[test]
    fn pepper_must_match_on_both_sides() {
        let hash = hash_password("s3cret-plain", Some("rack-secret")).unwrap();

        assert!(verify_password("s3cret-plain", &hash, Some("rack-secret")).unwrap());
        assert!(!verify_password("s3cret-plain", &hash, None).unwrap());
        assert!(!verify_password("s3cret-plain", &hash, Some("wrong")).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(matches!(
            verify_password("pw", "plainly-not-phc", None),
            Err(FieldOpsError::Crypto(_))
        ));
    }
}
