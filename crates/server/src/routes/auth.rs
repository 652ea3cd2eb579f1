use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use service::auth::domain::{AppId, LoginInput, RegisterInput, SessionClaims, UserId};
use service::auth::DynAuthService;
use utoipa::ToSchema;

use crate::errors::{ApiError, ErrorBody};

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<DynAuthService>,
}

// Absent fields deserialize as empty/zero so the service reports which one is missing.

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    #[schema(value_type = i64)]
    pub user_id: UserId,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[schema(value_type = i32)]
    pub app_id: AppId,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct VerifyRequest {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VerifyResponse {
    #[schema(value_type = i64)]
    pub user_id: UserId,
    pub email: String,
    #[schema(value_type = i32)]
    pub app_id: AppId,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl From<SessionClaims> for VerifyResponse {
    fn from(c: SessionClaims) -> Self {
        Self { user_id: c.user_id, email: c.email, app_id: c.app_id, issued_at: c.issued_at, expires_at: c.expires_at }
    }
}

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = RegisterRequest, responses((status = 200, description = "Registered", body = RegisterResponse), (status = 400, description = "Missing field", body = ErrorBody), (status = 409, description = "User already exists", body = ErrorBody)))]
pub async fn register(State(state): State<ServerState>, Json(req): Json<RegisterRequest>) -> Result<Json<RegisterResponse>, ApiError> {
    let user_id = state.auth.register(RegisterInput { email: req.email, password: req.password }).await?;
    Ok(Json(RegisterResponse { user_id }))
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = LoginRequest, responses((status = 200, description = "Logged in", body = LoginResponse), (status = 400, description = "Missing field or invalid email or password", body = ErrorBody), (status = 404, description = "App not found", body = ErrorBody)))]
pub async fn login(State(state): State<ServerState>, Json(req): Json<LoginRequest>) -> Result<Json<LoginResponse>, ApiError> {
    let token = state.auth.login(LoginInput { email: req.email, password: req.password, app_id: req.app_id }).await?;
    Ok(Json(LoginResponse { token }))
}

#[utoipa::path(post, path = "/auth/verify", tag = "auth", request_body = VerifyRequest, responses((status = 200, description = "Token valid", body = VerifyResponse), (status = 401, description = "Invalid or expired token", body = ErrorBody), (status = 404, description = "App not found", body = ErrorBody)))]
pub async fn verify(State(state): State<ServerState>, Json(req): Json<VerifyRequest>) -> Result<Json<VerifyResponse>, ApiError> {
    let claims = state.auth.verify_token(&req.token).await?;
    Ok(Json(claims.into()))
}
