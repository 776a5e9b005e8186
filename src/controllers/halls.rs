use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use std::sync::Arc;

use super::{validate, ApiJson};
use crate::{
    error::AppResult,
    middleware::AdminUser,
    models::{Hall, NewHall},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/halls", get(list_halls).post(create_hall))
}

async fn list_halls(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Hall>>> {
    Ok(Json(state.catalog.list_halls().await?))
}

async fn create_hall(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiJson(req): ApiJson<NewHall>,
) -> AppResult<(StatusCode, Json<Hall>)> {
    validate(&req)?;
    let hall = state.catalog.create_hall(&req).await?;
    Ok((StatusCode::CREATED, Json(hall)))
}
