use async_trait::async_trait;
use models::errors::ModelError;
use sea_orm::DatabaseConnection;

use crate::auth::domain::{App, AppId, User, UserId};
use crate::auth::repository::{AppRegistry, CredentialStore, StoreError};

/// Credential store and app registry over a SeaORM connection.
#[derive(Clone)]
pub struct SeaOrmStore {
    pub db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<ModelError> for StoreError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Conflict(_) => StoreError::AlreadyExists,
            other => StoreError::Internal(other.to_string()),
        }
    }
}

#[async_trait]
impl CredentialStore for SeaOrmStore {
    async fn save_user(&self, email: &str, password_hash: &str) -> Result<UserId, StoreError> {
        let created = models::user::create(&self.db, email, password_hash).await?;
        Ok(UserId::from(created.id))
    }

    async fn user_by_email(&self, email: &str) -> Result<User, StoreError> {
        let found = models::user::find_by_email(&self.db, email)
            .await?
            .ok_or(StoreError::NotFound)?;
        Ok(User { id: UserId::from(found.id), email: found.email, password_hash: found.password_hash })
    }
}

#[async_trait]
impl AppRegistry for SeaOrmStore {
    async fn app_by_id(&self, app_id: AppId) -> Result<App, StoreError> {
        let found = models::app::find(&self.db, app_id)
            .await?
            .ok_or(StoreError::NotFound)?;
        Ok(App { id: found.id, name: found.name, secret: found.secret })
    }
}
