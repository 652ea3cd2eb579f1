//! Password hashing policy.
//!
//! New hashes use Argon2id with the fixed costs below and a random salt, encoded as
//! a PHC string. Verification takes algorithm, version and costs from the stored
//! string, so hashes produced under an older policy keep working.

use std::sync::OnceLock;

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

use super::errors::AuthError;

/// Memory cost in KiB.
pub const MEMORY_COST_KIB: u32 = 19 * 1024;
/// Number of passes.
pub const TIME_COST: u32 = 2;
pub const PARALLELISM: u32 = 1;

fn policy_hasher() -> Result<Argon2<'static>, AuthError> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
        .map_err(|e| AuthError::Internal(format!("invalid argon2 params: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash `plain` under the current policy. Two calls never return the same string.
pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = policy_hasher()?
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Check `plain` against a stored PHC string.
///
/// Mismatch is `Ok(false)`; a stored value that cannot be parsed is an internal error.
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| AuthError::Internal(format!("malformed password hash: {e}")))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::Internal(format!("password verification failed: {e}"))),
    }
}

/// Run a full verification against a throwaway hash and discard the outcome.
///
/// Lets a lookup miss cost the same as a password mismatch.
pub fn verify_dummy(plain: &str) {
    static DUMMY: OnceLock<String> = OnceLock::new();
    let stored = DUMMY.get_or_init(|| hash_password("dummy-password").unwrap_or_default());
    let _ = verify_password(plain, stored);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_embeds_policy_and_verifies() {
        let hash = hash_password("Secret1").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$"));
        assert!(hash.contains(&format!("m={MEMORY_COST_KIB},t={TIME_COST},p={PARALLELISM}")));
        assert!(verify_password("Secret1", &hash).unwrap());
        assert!(!verify_password("WrongPass", &hash).unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = hash_password("Secret1").unwrap();
        let b = hash_password("Secret1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verifies_hashes_made_with_other_costs() {
        let params = Params::new(8 * 1024, 1, 1, None).unwrap();
        let cheap = Argon2::new(Algorithm::Argon2i, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let hash = cheap.hash_password(b"legacy", &salt).unwrap().to_string();
        assert!(verify_password("legacy", &hash).unwrap());
        assert!(!verify_password("other", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_internal() {
        let err = verify_password("x", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}
