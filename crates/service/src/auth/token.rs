//! Session token signing and verification.
//!
//! Tokens are HS256 JWTs keyed by the issuing app's secret. The algorithm is
//! fixed on both sides; a token whose header names anything else is rejected.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;
use tracing::debug;

use super::domain::{AppId, SessionClaims};
use super::errors::AuthError;

pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

pub fn sign(claims: &SessionClaims, secret: &str) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::Internal(format!("app {} has no signing secret", claims.app_id)));
    }
    encode(&Header::new(SIGNING_ALGORITHM), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
}

/// Check signature and expiry, then return the claims.
pub fn verify(token: &str, secret: &str) -> Result<SessionClaims, AuthError> {
    let mut validation = Validation::new(SIGNING_ALGORITHM);
    validation.leeway = 0;
    decode::<SessionClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| {
            debug!(error = %e, "token rejected");
            AuthError::InvalidToken
        })
}

/// Read the `app_id` claim without checking the signature.
///
/// Only used to pick the key for [`verify`]; never trust anything else from here.
pub fn unverified_app_id(token: &str) -> Result<AppId, AuthError> {
    #[derive(Deserialize)]
    struct AppOnly {
        app_id: AppId,
    }

    let mut validation = Validation::new(SIGNING_ALGORITHM);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    decode::<AppOnly>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims.app_id)
        .map_err(|e| {
            debug!(error = %e, "token payload unreadable");
            AuthError::InvalidToken
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn claims(app_id: AppId, ttl_secs: i64) -> SessionClaims {
        let now = Utc::now().timestamp();
        SessionClaims { user_id: 1, email: "a@x.com".into(), app_id, issued_at: now, expires_at: now + ttl_secs }
    }

    #[test]
    fn round_trips_with_issuing_secret() {
        let c = claims(1, 60);
        let token = sign(&c, "mySecret").unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(verify(&token, "mySecret").unwrap(), c);
    }

    #[test]
    fn other_secret_fails() {
        let token = sign(&claims(1, 60), "app-a").unwrap();
        assert_eq!(verify(&token, "app-b"), Err(AuthError::InvalidToken));
    }

    #[test]
    fn expired_token_fails() {
        let token = sign(&claims(1, -5), "s").unwrap();
        assert_eq!(verify(&token, "s"), Err(AuthError::InvalidToken));
    }

    #[test]
    fn foreign_algorithm_is_rejected() {
        let c = claims(1, 60);
        let token = encode(&Header::new(Algorithm::HS512), &c, &EncodingKey::from_secret(b"s")).unwrap();
        assert_eq!(verify(&token, "s"), Err(AuthError::InvalidToken));
    }

    #[test]
    fn empty_secret_cannot_sign() {
        assert!(matches!(sign(&claims(1, 60), ""), Err(AuthError::Internal(_))));
    }

    #[test]
    fn reads_app_id_without_key() {
        let token = sign(&claims(42, 60), "whatever").unwrap();
        assert_eq!(unverified_app_id(&token), Ok(42));
        assert_eq!(unverified_app_id("garbage"), Err(AuthError::InvalidToken));
    }
}
