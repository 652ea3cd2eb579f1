use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, instrument, warn};

use super::domain::{normalize_email, App, AppId, LoginInput, RegisterInput, SessionClaims, User, UserId};
use super::errors::AuthError;
use super::password::{hash_password, verify_dummy, verify_password};
use super::repository::{AppRegistry, CredentialStore, StoreError};
use super::token;

/// Auth service configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub token_ttl: Duration,
}

/// Auth business service independent of web framework and storage engine.
///
/// Holds no mutable state; concurrent calls share it through `Arc`.
pub struct AuthService<U: CredentialStore + ?Sized, A: AppRegistry + ?Sized> {
    users: Arc<U>,
    apps: Arc<A>,
    cfg: AuthConfig,
}

/// Service over type-erased stores, as held by the HTTP layer.
pub type DynAuthService = AuthService<dyn CredentialStore, dyn AppRegistry>;

impl<U, A> AuthService<U, A>
where
    U: CredentialStore + ?Sized,
    A: AppRegistry + ?Sized,
{
    pub fn new(users: Arc<U>, apps: Arc<A>, cfg: AuthConfig) -> Self {
        Self { users, apps, cfg }
    }

    /// Register a new user with a hashed password and return its id.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthConfig, AuthService, domain::RegisterInput};
    /// use service::auth::repository::memory::{InMemoryAppRegistry, InMemoryCredentialStore};
    /// use std::{sync::Arc, time::Duration};
    /// let svc = AuthService::new(
    ///     Arc::new(InMemoryCredentialStore::default()),
    ///     Arc::new(InMemoryAppRegistry::default()),
    ///     AuthConfig { token_ttl: Duration::from_secs(3600) },
    /// );
    /// let input = RegisterInput { email: "user@example.com".into(), password: "Secret123".into() };
    /// let id = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(id, 1);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<UserId, AuthError> {
        let email = normalize_email(&input.email);
        if email.is_empty() {
            return Err(AuthError::missing("email"));
        }
        if input.password.is_empty() {
            return Err(AuthError::missing("password"));
        }

        let password = input.password;
        let hash = blocking(move || hash_password(&password)).await?;

        match self.users.save_user(&email, &hash).await {
            Ok(user_id) => {
                info!(user_id, "user registered");
                Ok(user_id)
            }
            Err(StoreError::AlreadyExists) => {
                warn!("user already exists");
                Err(AuthError::AlreadyExists)
            }
            Err(e) => {
                error!(error = %e, "failed to save user");
                Err(AuthError::Internal(e.to_string()))
            }
        }
    }

    /// Authenticate a user and issue a token signed for the requesting app.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthConfig, AuthService, domain::{LoginInput, RegisterInput}};
    /// use service::auth::repository::memory::{InMemoryAppRegistry, InMemoryCredentialStore};
    /// use std::{sync::Arc, time::Duration};
    /// let svc = AuthService::new(
    ///     Arc::new(InMemoryCredentialStore::default()),
    ///     Arc::new(InMemoryAppRegistry::default().with_app(1, "web", "mySecret")),
    ///     AuthConfig { token_ttl: Duration::from_secs(3600) },
    /// );
    /// tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// let token = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into(), app_id: 1 })).unwrap();
    /// let claims = service::auth::token::verify(&token, "mySecret").unwrap();
    /// assert_eq!(claims.email, "u@e.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email, app_id = input.app_id))]
    pub async fn login(&self, input: LoginInput) -> Result<String, AuthError> {
        if input.password.is_empty() {
            return Err(AuthError::missing("password"));
        }
        let email = normalize_email(&input.email);
        if email.is_empty() {
            return Err(AuthError::missing("email"));
        }
        if input.app_id == 0 {
            return Err(AuthError::missing("app_id"));
        }

        let user = match self.users.user_by_email(&email).await {
            Ok(user) => user,
            Err(StoreError::NotFound) => {
                warn!("user not found");
                let password = input.password;
                blocking(move || {
                    verify_dummy(&password);
                    Ok(())
                })
                .await?;
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => {
                error!(error = %e, "failed to get user");
                return Err(AuthError::Internal(e.to_string()));
            }
        };

        if !self.password_matches(&user, input.password).await? {
            warn!(user_id = user.id, "invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let app = self.app(input.app_id).await?;
        let claims = SessionClaims::issue(&user, &app, Utc::now(), self.cfg.token_ttl)?;
        let token = token::sign(&claims, &app.secret).inspect_err(|e| error!(error = %e, "failed to sign token"))?;

        info!(user_id = user.id, app_id = app.id, expires_at = claims.expires_at, "user logged in");
        Ok(token)
    }

    /// Check a token against the secret of the app named in it and return its claims.
    #[instrument(skip_all)]
    pub async fn verify_token(&self, token: &str) -> Result<SessionClaims, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::missing("token"));
        }
        let app_id = token::unverified_app_id(token)?;
        let app = self.app(app_id).await?;
        let claims = token::verify(token, &app.secret)?;
        info!(user_id = claims.user_id, app_id, "token verified");
        Ok(claims)
    }

    async fn password_matches(&self, user: &User, password: String) -> Result<bool, AuthError> {
        let stored = user.password_hash.clone();
        blocking(move || verify_password(&password, &stored)).await
    }

    async fn app(&self, app_id: AppId) -> Result<App, AuthError> {
        match self.apps.app_by_id(app_id).await {
            Ok(app) => Ok(app),
            Err(StoreError::NotFound) => {
                warn!(app_id, "app not found");
                Err(AuthError::AppNotFound)
            }
            Err(e) => {
                error!(app_id, error = %e, "failed to get app");
                Err(AuthError::Internal(e.to_string()))
            }
        }
    }
}

/// Run CPU-heavy hashing on the blocking pool so async workers stay free.
async fn blocking<T, F>(f: F) -> Result<T, AuthError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AuthError::Internal(format!("blocking task failed: {e}")))?
}
