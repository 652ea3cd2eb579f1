use async_trait::async_trait;
use thiserror::Error;

use super::domain::{App, AppId, User, UserId};

/// Failures reported by storage backends.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("record already exists")]
    AlreadyExists,
    #[error("record not found")]
    NotFound,
    #[error("storage failure: {0}")]
    Internal(String),
}

/// Durable mapping from email to account.
///
/// Implementations must enforce email uniqueness atomically in `save_user`; the
/// service never checks before writing.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<UserId, StoreError>;
    async fn user_by_email(&self, email: &str) -> Result<User, StoreError>;
}

/// Read-only lookup of client applications and their signing secrets.
#[async_trait]
pub trait AppRegistry: Send + Sync {
    async fn app_by_id(&self, app_id: AppId) -> Result<App, StoreError>;
}

/// In-memory implementations for tests, benches and doc examples
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Accounts {
        by_email: HashMap<String, User>,
        last_id: UserId,
    }

    #[derive(Default)]
    pub struct InMemoryCredentialStore {
        accounts: Mutex<Accounts>,
    }

    impl InMemoryCredentialStore {
        pub fn len(&self) -> usize {
            self.accounts.lock().map(|a| a.by_email.len()).unwrap_or(0)
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl CredentialStore for InMemoryCredentialStore {
        async fn save_user(&self, email: &str, password_hash: &str) -> Result<UserId, StoreError> {
            let mut accounts = self.accounts.lock().map_err(|_| StoreError::Internal("lock poisoned".into()))?;
            if accounts.by_email.contains_key(email) {
                return Err(StoreError::AlreadyExists);
            }
            accounts.last_id += 1;
            let user = User { id: accounts.last_id, email: email.to_string(), password_hash: password_hash.to_string() };
            accounts.by_email.insert(email.to_string(), user);
            Ok(accounts.last_id)
        }

        async fn user_by_email(&self, email: &str) -> Result<User, StoreError> {
            let accounts = self.accounts.lock().map_err(|_| StoreError::Internal("lock poisoned".into()))?;
            accounts.by_email.get(email).cloned().ok_or(StoreError::NotFound)
        }
    }

    #[derive(Default)]
    pub struct InMemoryAppRegistry {
        apps: HashMap<AppId, App>,
    }

    impl InMemoryAppRegistry {
        pub fn with_app(mut self, id: AppId, name: &str, secret: &str) -> Self {
            self.apps.insert(id, App { id, name: name.to_string(), secret: secret.to_string() });
            self
        }
    }

    #[async_trait]
    impl AppRegistry for InMemoryAppRegistry {
        async fn app_by_id(&self, app_id: AppId) -> Result<App, StoreError> {
            self.apps.get(&app_id).cloned().ok_or(StoreError::NotFound)
        }
    }

}
