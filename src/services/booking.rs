//! booking.rs
//!
//! Seat allocation and pricing for bookings.
//!
//! A request is checked against the seats already held in the session
//! (pending or confirmed bookings) and against the session's hall, then each
//! seat is priced. The check and the insert run in one transaction that holds
//! a row lock on the session, so two requests for the same session never
//! interleave between "read booked seats" and "write tickets".

use chrono::Utc;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::info;

use crate::{
    error::AppError,
    models::{Booking, BookingStatus, Seat, SeatType, Session},
    repository::{bookings::TicketDraft, BookingRepo, SeatRepo, SessionRepo},
};

/// Base price of an adult ticket; VIP seats cost a fixed multiple of it.
pub const ADULT_PRICE: f64 = 2500.0;
pub const STUDENT_PRICE: f64 = 1900.0;
pub const CHILD_PRICE: f64 = 1600.0;
pub const VIP_PRICE_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketType {
    Adult,
    Student,
    Child,
}

impl TicketType {
    /// Only `student` and `child` are recognised; anything else is an adult ticket.
    pub fn parse(value: &str) -> Self {
        match value {
            "student" => TicketType::Student,
            "child" => TicketType::Child,
            _ => TicketType::Adult,
        }
    }

    pub fn price(&self) -> f64 {
        match self {
            TicketType::Adult => ADULT_PRICE,
            TicketType::Student => STUDENT_PRICE,
            TicketType::Child => CHILD_PRICE,
        }
    }
}

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("at least one seat required")]
    NoSeats,

    #[error("session not found")]
    SessionNotFound,

    #[error("booking not found")]
    BookingNotFound,

    #[error("invalid seat")]
    InvalidSeat,

    #[error("seat already booked")]
    SeatAlreadyBooked,

    #[error("cannot change seats for cancelled booking")]
    BookingCancelled,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl BookingError {
    /// Creating a booking reports every validation failure, missing session
    /// included, as a bad request.
    pub fn into_create_error(self) -> AppError {
        match self {
            BookingError::Database(e) => AppError::from(e),
            other => AppError::bad_request(other.to_string()),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::SessionNotFound | BookingError::BookingNotFound => {
                AppError::not_found(err.to_string())
            }
            BookingError::Database(e) => AppError::from(e),
            other => AppError::bad_request(other.to_string()),
        }
    }
}

/// Price of one seat. VIP seats always cost twice the adult price; other
/// seats use the ticket type when one is given, else the session's base price.
pub fn seat_price(session: &Session, seat: &Seat, ticket_type: Option<TicketType>) -> f64 {
    if seat.seat_type == SeatType::Vip {
        return ADULT_PRICE * VIP_PRICE_MULTIPLIER;
    }
    match ticket_type {
        Some(tt) => tt.price(),
        None => session.price,
    }
}

/// Validates the requested seats and prices them, in request order.
///
/// `booked` holds seats already taken in the session; a seat requested twice
/// in one call counts as booked the second time. `ticket_types` is used only
/// when it has exactly one entry per seat.
pub fn allocate(
    session: &Session,
    seat_ids: &[i64],
    seats: &HashMap<i64, Seat>,
    mut booked: HashSet<i64>,
    ticket_types: &[String],
) -> Result<Vec<TicketDraft>, BookingError> {
    if seat_ids.is_empty() {
        return Err(BookingError::NoSeats);
    }
    let use_ticket_types = ticket_types.len() == seat_ids.len();

    let mut tickets = Vec::with_capacity(seat_ids.len());
    for (i, seat_id) in seat_ids.iter().enumerate() {
        if booked.contains(seat_id) {
            return Err(BookingError::SeatAlreadyBooked);
        }
        let seat = match seats.get(seat_id) {
            Some(seat) if seat.hall_id == session.hall_id => seat,
            _ => return Err(BookingError::InvalidSeat),
        };

        let ticket_type = use_ticket_types.then(|| TicketType::parse(&ticket_types[i]));
        tickets.push(TicketDraft {
            seat_id: *seat_id,
            price: seat_price(session, seat, ticket_type),
        });
        booked.insert(*seat_id);
    }

    Ok(tickets)
}

/// Seats taken in the session by bookings other than `own`. A booking that
/// changes seats may keep any of its current ones.
pub fn held_by_others(booked: impl IntoIterator<Item = i64>, own: &Booking) -> HashSet<i64> {
    let current: HashSet<i64> = own.seat_ids().collect();
    booked.into_iter().filter(|id| !current.contains(id)).collect()
}

#[derive(Clone)]
pub struct BookingService {
    bookings: BookingRepo,
}

impl BookingService {
    pub fn new(bookings: BookingRepo) -> Self {
        Self { bookings }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Booking>, BookingError> {
        Ok(self.bookings.get_by_id(id).await?)
    }

    pub async fn get_by_user_id(&self, user_id: i64) -> Result<Vec<Booking>, BookingError> {
        Ok(self.bookings.get_by_user_id(user_id).await?)
    }

    pub async fn get_all(&self) -> Result<Vec<Booking>, BookingError> {
        Ok(self.bookings.get_all().await?)
    }

    pub async fn create(
        &self,
        user_id: i64,
        session_id: i64,
        seat_ids: &[i64],
        ticket_types: &[String],
    ) -> Result<Booking, BookingError> {
        if seat_ids.is_empty() {
            return Err(BookingError::NoSeats);
        }

        let mut tx = self.bookings.begin().await?;

        let session = SessionRepo::lock_by_id(&mut tx, session_id)
            .await?
            .ok_or(BookingError::SessionNotFound)?;
        let booked: HashSet<i64> = BookingRepo::booked_seat_ids_in(&mut tx, session_id)
            .await?
            .into_iter()
            .collect();
        let seats = load_seats(&mut tx, seat_ids).await?;

        let tickets = allocate(&session, seat_ids, &seats, booked, ticket_types)?;

        let booking = BookingRepo::create(
            &mut tx,
            user_id,
            session_id,
            BookingStatus::Confirmed,
            Utc::now(),
            &tickets,
        )
        .await?;
        tx.commit().await?;

        info!(
            "Booking {} created: user {}, session {}, {} seats, total {:.2}",
            booking.id, user_id, session_id, booking.tickets.len(), booking.total_price
        );
        Ok(booking)
    }

    /// Moves a booking to other seats of the same session. Its own current
    /// seats count as free; every new seat is priced at the session price.
    pub async fn change_seats(&self, booking_id: i64, new_seat_ids: &[i64]) -> Result<Booking, BookingError> {
        if new_seat_ids.is_empty() {
            return Err(BookingError::NoSeats);
        }

        let mut tx = self.bookings.begin().await?;

        let mut booking = BookingRepo::lock_by_id(&mut tx, booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound)?;
        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::BookingCancelled);
        }

        let session = SessionRepo::lock_by_id(&mut tx, booking.session_id)
            .await?
            .ok_or(BookingError::SessionNotFound)?;

        let booked = held_by_others(
            BookingRepo::booked_seat_ids_in(&mut tx, session.id).await?,
            &booking,
        );
        let seats = load_seats(&mut tx, new_seat_ids).await?;

        let tickets = allocate(&session, new_seat_ids, &seats, booked, &[])?;

        booking.tickets = BookingRepo::replace_tickets(&mut tx, booking_id, &tickets).await?;
        booking.total_price = tickets.iter().map(|t| t.price).sum();
        tx.commit().await?;

        info!("Booking {} moved to {} seats", booking_id, booking.tickets.len());
        Ok(booking)
    }

    pub async fn cancel(&self, booking_id: i64) -> Result<(), BookingError> {
        if !self.bookings.update_status(booking_id, BookingStatus::Cancelled).await? {
            return Err(BookingError::BookingNotFound);
        }
        info!("Booking {} cancelled", booking_id);
        Ok(())
    }
}

async fn load_seats(conn: &mut sqlx::PgConnection, ids: &[i64]) -> sqlx::Result<HashMap<i64, Seat>> {
    Ok(SeatRepo::get_by_ids(conn, ids)
        .await?
        .into_iter()
        .map(|seat| (seat.id, seat))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ticket;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn session(hall_id: i64, price: f64) -> Session {
        Session {
            id: 1,
            movie_id: 1,
            hall_id,
            start_time: Utc.with_ymd_and_hms(2026, 2, 15, 14, 30, 0).unwrap(),
            price,
        }
    }

    fn seat(id: i64, hall_id: i64, seat_type: SeatType) -> Seat {
        Seat { id, hall_id, row_number: 1, seat_number: id as i32, seat_type }
    }

    /// Hall 1: seats 1..=4 regular, 5..=6 vip. Hall 2: seat 7.
    fn catalogue() -> HashMap<i64, Seat> {
        let mut seats: Vec<Seat> = (1..=4).map(|id| seat(id, 1, SeatType::Regular)).collect();
        seats.push(seat(5, 1, SeatType::Vip));
        seats.push(seat(6, 1, SeatType::Vip));
        seats.push(seat(7, 2, SeatType::Regular));
        seats.into_iter().map(|s| (s.id, s)).collect()
    }

    fn booking_with_seats(seat_ids: &[i64]) -> Booking {
        Booking {
            id: 10,
            user_id: 3,
            session_id: 1,
            status: BookingStatus::Confirmed,
            total_price: 0.0,
            created_at: Utc::now(),
            tickets: seat_ids
                .iter()
                .enumerate()
                .map(|(i, seat_id)| Ticket { id: i as i64 + 1, booking_id: 10, seat_id: *seat_id, price: 2200.0 })
                .collect(),
        }
    }

    fn types(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn empty_request_is_rejected() {
        let err = allocate(&session(1, 2200.0), &[], &catalogue(), HashSet::new(), &[]).unwrap_err();
        assert!(matches!(err, BookingError::NoSeats));
    }

    #[test]
    fn session_price_applies_without_ticket_types() {
        let tickets = allocate(&session(1, 2200.0), &[1, 2], &catalogue(), HashSet::new(), &[]).unwrap();
        assert_eq!(
            tickets,
            vec![
                TicketDraft { seat_id: 1, price: 2200.0 },
                TicketDraft { seat_id: 2, price: 2200.0 },
            ]
        );
    }

    #[test]
    fn vip_seat_costs_twice_the_adult_price() {
        let tickets = allocate(&session(1, 1900.0), &[5], &catalogue(), HashSet::new(), &[]).unwrap();
        assert_eq!(tickets[0].price, 5000.0);

        let tickets = allocate(&session(1, 1900.0), &[6], &catalogue(), HashSet::new(), &types(&["child"])).unwrap();
        assert_eq!(tickets[0].price, 5000.0);
    }

    #[test]
    fn ticket_types_price_each_seat() {
        let tickets = allocate(
            &session(1, 2200.0),
            &[1, 2, 3, 4],
            &catalogue(),
            HashSet::new(),
            &types(&["adult", "student", "child", "pensioner"]),
        )
        .unwrap();
        let prices: Vec<f64> = tickets.iter().map(|t| t.price).collect();
        assert_eq!(prices, vec![2500.0, 1900.0, 1600.0, 2500.0]);
    }

    #[test]
    fn ticket_types_of_wrong_length_fall_back_to_session_price() {
        let tickets = allocate(
            &session(1, 2200.0),
            &[1, 2],
            &catalogue(),
            HashSet::new(),
            &types(&["child"]),
        )
        .unwrap();
        assert!(tickets.iter().all(|t| t.price == 2200.0));
    }

    #[test]
    fn own_seats_are_free_when_changing() {
        let own = booking_with_seats(&[1, 2]);
        let held = held_by_others(vec![1, 2, 3], &own);
        assert_eq!(held, HashSet::from([3]));

        // место 2 остаётся за бронью, 3 занято чужой
        let tickets = allocate(&session(1, 2200.0), &[2, 4], &catalogue(), held.clone(), &[]).unwrap();
        assert_eq!(tickets.iter().map(|t| t.seat_id).collect::<Vec<_>>(), vec![2, 4]);

        let err = allocate(&session(1, 2200.0), &[2, 3], &catalogue(), held, &[]).unwrap_err();
        assert!(matches!(err, BookingError::SeatAlreadyBooked));
    }

    #[test]
    fn booked_seat_is_rejected() {
        let booked: HashSet<i64> = [2].into_iter().collect();
        let err = allocate(&session(1, 2200.0), &[1, 2], &catalogue(), booked, &[]).unwrap_err();
        assert!(matches!(err, BookingError::SeatAlreadyBooked));
    }

    #[test]
    fn duplicate_seat_in_one_request_is_rejected() {
        let err = allocate(&session(1, 2200.0), &[3, 3], &catalogue(), HashSet::new(), &[]).unwrap_err();
        assert!(matches!(err, BookingError::SeatAlreadyBooked));
    }

    #[test]
    fn seat_from_another_hall_is_invalid() {
        let err = allocate(&session(1, 2200.0), &[7], &catalogue(), HashSet::new(), &[]).unwrap_err();
        assert!(matches!(err, BookingError::InvalidSeat));
    }

    #[test]
    fn unknown_seat_is_invalid() {
        let err = allocate(&session(1, 2200.0), &[99], &catalogue(), HashSet::new(), &[]).unwrap_err();
        assert!(matches!(err, BookingError::InvalidSeat));
    }

    #[test]
    fn create_errors_are_all_bad_requests() {
        let err = BookingError::SessionNotFound.into_create_error();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "session not found");
    }

    #[test]
    fn change_errors_distinguish_missing_records() {
        let not_found: AppError = BookingError::BookingNotFound.into();
        assert_eq!(not_found.status(), axum::http::StatusCode::NOT_FOUND);

        let cancelled: AppError = BookingError::BookingCancelled.into();
        assert_eq!(cancelled.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    proptest! {
        #[test]
        fn allocation_never_returns_a_booked_or_repeated_seat(
            requested in proptest::collection::vec(1i64..=7, 1..6),
            taken in proptest::collection::hash_set(1i64..=7, 0..4),
        ) {
            let result = allocate(&session(1, 2200.0), &requested, &catalogue(), taken.clone(), &[]);
            if let Ok(tickets) = result {
                let ids: Vec<i64> = tickets.iter().map(|t| t.seat_id).collect();
                let unique: HashSet<i64> = ids.iter().copied().collect();
                prop_assert_eq!(unique.len(), ids.len());
                prop_assert!(ids.iter().all(|id| !taken.contains(id)));
                prop_assert!(ids.iter().all(|id| *id <= 6));
            }
        }

        #[test]
        fn total_is_the_sum_of_seat_prices(requested in proptest::collection::hash_set(1i64..=6, 1..6)) {
            let requested: Vec<i64> = requested.into_iter().collect();
            let tickets = allocate(&session(1, 2200.0), &requested, &catalogue(), HashSet::new(), &[]).unwrap();
            let vip = requested.iter().filter(|id| **id >= 5).count() as f64;
            let regular = requested.len() as f64 - vip;
            let total: f64 = tickets.iter().map(|t| t.price).sum();
            prop_assert_eq!(total, vip * 5000.0 + regular * 2200.0);
        }
    }
}
