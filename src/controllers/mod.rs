pub mod auth;
pub mod bookings;
pub mod halls;
pub mod health;
pub mod movies;
pub mod posters;
pub mod profile;
pub mod sessions;
pub mod users;

use axum::{
    extract::{FromRequest, FromRequestParts},
    Router,
};
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    AppState,
};

pub fn routes(max_poster_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .merge(movies::routes())
        .merge(halls::routes())
        .merge(sessions::routes())
        .merge(bookings::routes())
        .merge(auth::routes())
        .merge(profile::routes())
        .merge(users::routes())
        .merge(posters::routes(max_poster_bytes))
}

/// JSON body whose parse failures answer `{"error": "invalid json"}`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters whose parse failures answer `{"error": "invalid id"}`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

// validator отдаёт ошибки по полям, клиенту хватает первой
pub(crate) fn validate<T: Validate>(payload: &T) -> AppResult<()> {
    payload.validate().map_err(|errors| {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "invalid request".to_string());
        AppError::bad_request(message)
    })
}
