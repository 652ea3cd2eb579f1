use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::AuthError;

pub type UserId = i64;
pub type AppId = i32;

/// Registration input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub app_id: AppId,
}

/// Stored account as seen by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
}

/// Client application allowed to request tokens
#[derive(Clone, PartialEq, Eq)]
pub struct App {
    pub id: AppId,
    pub name: String,
    pub secret: String,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Payload of a session token. Timestamps are Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "uid")]
    pub user_id: UserId,
    pub email: String,
    pub app_id: AppId,
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl SessionClaims {
    /// Claims for `user` on `app`, valid for `ttl` starting at `now`.
    pub fn issue(user: &User, app: &App, now: DateTime<Utc>, ttl: Duration) -> Result<Self, AuthError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AuthError::Internal(format!("token ttl out of range: {e}")))?;
        let expires = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Internal("token expiry overflows".into()))?;
        Ok(Self {
            user_id: user.id,
            email: user.email.clone(),
            app_id: app.id,
            issued_at: now.timestamp(),
            expires_at: expires.timestamp(),
        })
    }
}

/// Canonical form used for storing and looking up emails: trimmed, lower-cased.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_email("  Alice@Example.COM \n"), "alice@example.com");
        assert_eq!(normalize_email("   "), "");
    }

    #[test]
    fn claims_expire_after_ttl() {
        let user = User { id: 7, email: "a@x.com".into(), password_hash: String::new() };
        let app = App { id: 3, name: "web".into(), secret: "s".into() };
        let now = Utc::now();
        let claims = SessionClaims::issue(&user, &app, now, Duration::from_secs(3600)).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.app_id, 3);
        assert_eq!(claims.issued_at, now.timestamp());
        assert_eq!(claims.expires_at - claims.issued_at, 3600);
    }

    #[test]
    fn claims_serialize_flat_with_standard_names() {
        let claims = SessionClaims { user_id: 1, email: "a@x.com".into(), app_id: 1, issued_at: 10, expires_at: 20 };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json, serde_json::json!({"uid": 1, "email": "a@x.com", "app_id": 1, "iat": 10, "exp": 20}));
    }

    #[test]
    fn app_debug_hides_secret() {
        let app = App { id: 1, name: "web".into(), secret: "top-secret".into() };
        assert!(!format!("{app:?}").contains("top-secret"));
    }
}
