use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("{field} is required")]
    Validation { field: &'static str },
    #[error("user already exists")]
    AlreadyExists,
    /// Returned for both unknown email and wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("app not found")]
    AppNotFound,
    #[error("invalid token")]
    InvalidToken,
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn missing(field: &'static str) -> Self {
        AuthError::Validation { field }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation { .. } => 1001,
            AuthError::AlreadyExists => 1002,
            AuthError::InvalidCredentials => 1004,
            AuthError::AppNotFound => 1005,
            AuthError::InvalidToken => 1006,
            AuthError::Internal(_) => 1200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_field() {
        assert_eq!(AuthError::missing("app_id").to_string(), "app_id is required");
    }
}
