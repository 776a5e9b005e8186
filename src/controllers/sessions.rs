use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{validate, ApiJson, ApiPath};
use crate::{
    error::{AppError, AppResult},
    middleware::AdminUser,
    models::{NewSession, Session},
    services::session::SeatStatus,
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", get(list_sessions).post(create_session))
        .route("/sessions/{id}", get(get_session).put(update_session).delete(delete_session))
        .route("/sessions/{id}/seats", get(session_seats))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionsQuery {
    pub movie_id: Option<String>,
    pub hall_id: Option<String>,
}

fn parse_filter(value: Option<&str>, name: &str) -> AppResult<Option<i64>> {
    match value.filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| AppError::bad_request(format!("invalid {name}"))),
    }
}

// GET /api/sessions?movieId=&hallId=
async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SessionsQuery>,
) -> AppResult<Json<Vec<Session>>> {
    let movie_id = parse_filter(params.movie_id.as_deref(), "movieId")?;
    let hall_id = parse_filter(params.hall_id.as_deref(), "hallId")?;

    let sessions = match (movie_id, hall_id) {
        (Some(movie_id), _) => state.sessions.get_by_movie_id(movie_id).await?,
        (None, Some(hall_id)) => state.sessions.get_by_hall_id(hall_id).await?,
        (None, None) => state.sessions.get_all().await?,
    };
    Ok(Json(sessions))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Session>> {
    state
        .sessions
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("not found"))
}

// GET /api/sessions/{id}/seats
async fn session_seats(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Vec<SeatStatus>>> {
    state
        .sessions
        .seat_map(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("not found"))
}

async fn create_session(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiJson(req): ApiJson<NewSession>,
) -> AppResult<(StatusCode, Json<Session>)> {
    validate(&req)?;
    let session = state.sessions.create(&req).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

async fn update_session(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<NewSession>,
) -> AppResult<Json<Session>> {
    validate(&req)?;
    Ok(Json(state.sessions.update(id, &req).await?))
}

async fn delete_session(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    state.sessions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_parse_or_report_their_name() {
        assert_eq!(parse_filter(None, "movieId").unwrap(), None);
        assert_eq!(parse_filter(Some(""), "movieId").unwrap(), None);
        assert_eq!(parse_filter(Some("7"), "hallId").unwrap(), Some(7));
        assert_eq!(
            parse_filter(Some("seven"), "movieId").unwrap_err().to_string(),
            "invalid movieId"
        );
    }
}
