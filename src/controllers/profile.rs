use axum::{extract::State, routing::get, Json, Router};
use serde::Deserialize;
use std::sync::Arc;

use super::ApiJson;
use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::User,
    services::user::{ProfileUpdate, UserError},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/me", get(get_profile).put(update_profile))
}

// GET /api/me
async fn get_profile(State(state): State<Arc<AppState>>, user: AuthUser) -> AppResult<Json<User>> {
    state
        .users
        .get_by_id(user.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("user not found"))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdateRequest {
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub current_password: String,
    pub new_password: String,
}

impl From<ProfileUpdateRequest> for ProfileUpdate {
    fn from(req: ProfileUpdateRequest) -> Self {
        ProfileUpdate {
            name: req.name,
            email: req.email,
            avatar_url: req.avatar_url,
            current_password: req.current_password,
            new_password: req.new_password,
        }
    }
}

// PUT /api/me: все ошибки профиля клиенту как 400
async fn update_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(req): ApiJson<ProfileUpdateRequest>,
) -> AppResult<Json<User>> {
    let updated = state
        .users
        .update_profile(user.user_id, req.into())
        .await
        .map_err(|e| match e {
            UserError::Database(_) | UserError::Hash(_) | UserError::Task(_) => AppError::from(e),
            other => AppError::bad_request(other.to_string()),
        })?;
    Ok(Json(updated))
}
