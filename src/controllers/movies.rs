use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use super::{validate, ApiJson, ApiPath};
use crate::{
    error::{AppError, AppResult},
    middleware::AdminUser,
    models::{Movie, NewMovie},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(list_movies).post(create_movie))
        .route("/movies/{id}", get(get_movie).put(update_movie).delete(delete_movie))
}

// GET /api/movies
async fn list_movies(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Movie>>> {
    Ok(Json(state.catalog.list_movies().await?))
}

// GET /api/movies/{id}
async fn get_movie(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Movie>> {
    state
        .catalog
        .get_movie(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("not found"))
}

// POST /api/movies
async fn create_movie(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiJson(req): ApiJson<NewMovie>,
) -> AppResult<(StatusCode, Json<Movie>)> {
    validate(&req)?;
    let movie = state.catalog.create_movie(&req).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

// PUT /api/movies/{id}
async fn update_movie(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<NewMovie>,
) -> AppResult<Json<Movie>> {
    validate(&req)?;
    Ok(Json(state.catalog.update_movie(id, &req).await?))
}

// DELETE /api/movies/{id}
async fn delete_movie(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    state.catalog.delete_movie(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
