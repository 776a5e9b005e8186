use serde::Serialize;
use std::collections::HashSet;

use crate::{
    cache::CacheService,
    error::{AppError, AppResult},
    models::{NewSession, SeatType, Session},
    repository::{BookingRepo, HallRepo, MovieRepo, SeatRepo, SessionRepo},
};

/// Seat of the session's hall with its booking state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatStatus {
    pub id: i64,
    pub hall_id: i64,
    pub row_number: i32,
    pub seat_number: i32,
    pub seat_type: SeatType,
    pub booked: bool,
}

#[derive(Clone)]
pub struct SessionService {
    sessions: SessionRepo,
    movies: MovieRepo,
    halls: HallRepo,
    seats: SeatRepo,
    bookings: BookingRepo,
    cache: CacheService,
}

impl SessionService {
    pub fn new(
        sessions: SessionRepo,
        movies: MovieRepo,
        halls: HallRepo,
        seats: SeatRepo,
        bookings: BookingRepo,
        cache: CacheService,
    ) -> Self {
        Self { sessions, movies, halls, seats, bookings, cache }
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<Option<Session>> {
        Ok(self.sessions.get_by_id(id).await?)
    }

    pub async fn get_all(&self) -> AppResult<Vec<Session>> {
        Ok(self.sessions.get_all().await?)
    }

    pub async fn get_by_movie_id(&self, movie_id: i64) -> AppResult<Vec<Session>> {
        Ok(self.sessions.get_by_movie_id(movie_id).await?)
    }

    pub async fn get_by_hall_id(&self, hall_id: i64) -> AppResult<Vec<Session>> {
        Ok(self.sessions.get_by_hall_id(hall_id).await?)
    }

    pub async fn create(&self, session: &NewSession) -> AppResult<Session> {
        self.check_references(session).await?;
        Ok(self.sessions.create(session).await?)
    }

    pub async fn update(&self, id: i64, session: &NewSession) -> AppResult<Session> {
        self.check_references(session).await?;
        self.sessions
            .update(id, session)
            .await?
            .ok_or_else(|| AppError::not_found("not found"))
    }

    /// Fails with a conflict while bookings still reference the session.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let deleted = self.sessions.delete(id).await.map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict("session has bookings".to_string()),
            other => other,
        })?;
        if !deleted {
            return Err(AppError::not_found("not found"));
        }
        Ok(())
    }

    /// Seats of the session's hall, each flagged when a pending or confirmed
    /// booking holds it. `None` when the session does not exist.
    pub async fn seat_map(&self, session_id: i64) -> AppResult<Option<Vec<SeatStatus>>> {
        let Some(session) = self.sessions.get_by_id(session_id).await? else {
            return Ok(None);
        };
        let hall = self
            .halls
            .get_by_id(session.hall_id)
            .await?
            .ok_or_else(|| AppError::not_found("hall not found"))?;

        if self.seats.ensure_for_hall(&hall).await? > 0 {
            self.cache.invalidate_hall_seats(hall.id).await;
        }
        let seats = self.cache.get_hall_seats(hall.id).await?;
        let booked: HashSet<i64> = self.bookings.booked_seat_ids(session_id).await?.into_iter().collect();

        Ok(Some(
            seats
                .into_iter()
                .map(|seat| SeatStatus {
                    booked: booked.contains(&seat.id),
                    id: seat.id,
                    hall_id: seat.hall_id,
                    row_number: seat.row_number,
                    seat_number: seat.seat_number,
                    seat_type: seat.seat_type,
                })
                .collect(),
        ))
    }

    async fn check_references(&self, session: &NewSession) -> AppResult<()> {
        if self.movies.get_by_id(session.movie_id).await?.is_none() {
            return Err(AppError::bad_request("movie not found"));
        }
        if self.halls.get_by_id(session.hall_id).await?.is_none() {
            return Err(AppError::bad_request("hall not found"));
        }
        Ok(())
    }
}
