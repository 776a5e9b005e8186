use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, sync::Arc};

use super::{ApiJson, ApiPath};
use crate::{
    error::{AppError, AppResult},
    middleware::{AuthUser, StaffUser},
    models::{Booking, Role},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route(
            "/bookings/{id}",
            get(get_booking).delete(cancel_booking).patch(change_seats),
        )
}

/* ---------- helpers ---------- */

/// Booking as the client list shows it: the booking plus its owner's name.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingWithUser {
    #[serde(flatten)]
    pub booking: Booking,
    pub user_name: String,
}

fn with_user_names(bookings: Vec<Booking>, names: &HashMap<i64, String>) -> Vec<BookingWithUser> {
    bookings
        .into_iter()
        .map(|booking| BookingWithUser {
            user_name: names.get(&booking.user_id).cloned().unwrap_or_default(),
            booking,
        })
        .collect()
}

async fn load_owned(state: &AppState, user: &AuthUser, id: i64) -> AppResult<Booking> {
    let booking = state
        .bookings
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("not found"))?;
    if !user.can_access(booking.user_id) {
        return Err(AppError::forbidden("forbidden"));
    }
    Ok(booking)
}

/* ---------- BOOKINGS ---------- */

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub all: Option<String>,
}

// GET /api/bookings, ?all=1 для кассира и админа
async fn list_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<Vec<BookingWithUser>>> {
    let all = params.all.as_deref() == Some("1") && user.role.is_staff();
    let bookings = if all {
        state.bookings.get_all().await?
    } else {
        state.bookings.get_by_user_id(user.user_id).await?
    };

    let mut user_ids: Vec<i64> = bookings.iter().map(|b| b.user_id).collect();
    user_ids.sort_unstable();
    user_ids.dedup();
    let names: HashMap<i64, String> = state.repos.users.names_by_ids(&user_ids).await?.into_iter().collect();

    Ok(Json(with_user_names(bookings, &names)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub session_id: i64,
    #[serde(default)]
    pub seat_ids: Vec<i64>,
    #[serde(default)]
    pub ticket_types: Vec<String>,
}

// POST /api/bookings
async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(req): ApiJson<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    if user.role == Role::Admin {
        return Err(AppError::forbidden("admin cannot create bookings"));
    }

    let booking = state
        .bookings
        .create(user.user_id, req.session_id, &req.seat_ids, &req.ticket_types)
        .await
        .map_err(|e| e.into_create_error())?;
    Ok((StatusCode::CREATED, Json(booking)))
}

// GET /api/bookings/{id}
async fn get_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<Json<Booking>> {
    Ok(Json(load_owned(&state, &user, id).await?))
}

// DELETE /api/bookings/{id}: отмена, бронь остаётся в истории
async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> AppResult<StatusCode> {
    load_owned(&state, &user, id).await?;
    state.bookings.cancel(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSeatsRequest {
    #[serde(default)]
    pub seat_ids: Vec<i64>,
}

// PATCH /api/bookings/{id}
async fn change_seats(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<ChangeSeatsRequest>,
) -> AppResult<Json<Booking>> {
    Ok(Json(state.bookings.change_seats(id, &req.seat_ids).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookingStatus;
    use chrono::Utc;

    fn booking(id: i64, user_id: i64) -> Booking {
        Booking {
            id,
            user_id,
            session_id: 1,
            status: BookingStatus::Confirmed,
            total_price: 2500.0,
            created_at: Utc::now(),
            tickets: Vec::new(),
        }
    }

    #[test]
    fn list_entries_carry_owner_name_inline() {
        let names = HashMap::from([(7, "Guest".to_string())]);
        let out = with_user_names(vec![booking(1, 7), booking(2, 8)], &names);

        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json[0]["id"], 1);
        assert_eq!(json[0]["userId"], 7);
        assert_eq!(json[0]["userName"], "Guest");
        assert_eq!(json[1]["userName"], "");
    }

    #[test]
    fn create_request_defaults_ticket_types() {
        let req: CreateBookingRequest =
            serde_json::from_str(r#"{"sessionId": 3, "seatIds": [10, 11]}"#).unwrap();
        assert_eq!(req.session_id, 3);
        assert_eq!(req.seat_ids, vec![10, 11]);
        assert!(req.ticket_types.is_empty());
    }
}
