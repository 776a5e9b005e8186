use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use validator::Validate;

use super::ApiJson;
use crate::{
    error::{AppError, AppResult},
    middleware::JwtKeys,
    models::User,
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct AuthRequest {
    pub name: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl AuthRequest {
    fn check(&self) -> AppResult<()> {
        self.validate()
            .map_err(|_| AppError::bad_request("email and password are required"))
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

fn respond(keys: &JwtKeys, user: User) -> AppResult<Json<AuthResponse>> {
    let token = keys.issue(&user).map_err(|e| {
        error!("token signing failed: {:?}", e);
        AppError::Internal(anyhow::anyhow!("failed to create token"))
    })?;
    Ok(Json(AuthResponse { user, token }))
}

// POST /api/auth/register
async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<AuthRequest>,
) -> AppResult<Json<AuthResponse>> {
    req.check()?;
    let user = state
        .users
        .register_customer(&req.name, &req.email, &req.password)
        .await?;
    respond(&state.jwt, user)
}

// POST /api/auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<AuthRequest>,
) -> AppResult<Json<AuthResponse>> {
    req.check()?;
    let user = state.users.authenticate(&req.email, &req.password).await?;
    respond(&state.jwt, user)
}
