use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use super::ApiPath;
use crate::{
    error::{AppError, AppResult},
    middleware::StaffUser,
    models::{Booking, Role},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/users/{id}", get(get_client))
}

#[derive(Debug, Serialize)]
pub struct UserPublic {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCard {
    pub user: UserPublic,
    pub last_bookings: Vec<Booking>,
}

// GET /api/users/{id}: карточка клиента для кассы
async fn get_client(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<ClientCard>> {
    let user = state
        .users
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))?;
    let last_bookings = state.bookings.get_by_user_id(id).await?;

    Ok(Json(ClientCard {
        user: UserPublic { id: user.id, name: user.name, email: user.email, role: user.role },
        last_bookings,
    }))
}
