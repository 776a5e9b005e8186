use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use std::collections::HashMap;

use crate::models::{Booking, BookingStatus, Ticket};

const COLUMNS: &str = "id, user_id, session_id, status, total_price, created_at";

/// Priced seat that is about to be written as a ticket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TicketDraft {
    pub seat_id: i64,
    pub price: f64,
}

#[derive(Clone)]
pub struct BookingRepo {
    pool: PgPool,
}

impl BookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn begin(&self) -> sqlx::Result<Transaction<'static, Postgres>> {
        self.pool.begin().await
    }

    /// Inserts the booking and its tickets; the returned booking carries both ids.
    pub async fn create(
        conn: &mut PgConnection,
        user_id: i64,
        session_id: i64,
        status: BookingStatus,
        created_at: DateTime<Utc>,
        tickets: &[TicketDraft],
    ) -> sqlx::Result<Booking> {
        let total_price: f64 = tickets.iter().map(|t| t.price).sum();

        let mut booking = sqlx::query_as::<_, Booking>(&format!(
            "INSERT INTO bookings (user_id, session_id, status, total_price, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(session_id)
        .bind(status.as_str())
        .bind(total_price)
        .bind(created_at)
        .fetch_one(&mut *conn)
        .await?;

        booking.tickets = Self::insert_tickets(conn, booking.id, tickets).await?;
        Ok(booking)
    }

    async fn insert_tickets(
        conn: &mut PgConnection,
        booking_id: i64,
        tickets: &[TicketDraft],
    ) -> sqlx::Result<Vec<Ticket>> {
        let seat_ids: Vec<i64> = tickets.iter().map(|t| t.seat_id).collect();
        let prices: Vec<f64> = tickets.iter().map(|t| t.price).collect();

        // WITH ORDINALITY сохраняет порядок мест из запроса
        sqlx::query_as::<_, Ticket>(
            "INSERT INTO tickets (booking_id, seat_id, price)
             SELECT $1, s, p FROM UNNEST($2::int8[], $3::float8[]) WITH ORDINALITY AS t(s, p, ord)
             ORDER BY ord
             RETURNING id, booking_id, seat_id, price",
        )
        .bind(booking_id)
        .bind(&seat_ids)
        .bind(&prices)
        .fetch_all(conn)
        .await
    }

    pub async fn get_by_id(&self, id: i64) -> sqlx::Result<Option<Booking>> {
        let mut conn = self.pool.acquire().await?;
        Self::find(&mut conn, id).await
    }

    pub async fn find(conn: &mut PgConnection, id: i64) -> sqlx::Result<Option<Booking>> {
        Self::load(conn, id, false).await
    }

    /// Loads the booking and holds a row lock on it until the transaction ends,
    /// so a concurrent cancel either lands before the read or waits for commit.
    pub async fn lock_by_id(conn: &mut PgConnection, id: i64) -> sqlx::Result<Option<Booking>> {
        Self::load(conn, id, true).await
    }

    async fn load(conn: &mut PgConnection, id: i64, for_update: bool) -> sqlx::Result<Option<Booking>> {
        let lock = if for_update { " FOR UPDATE" } else { "" };
        let booking = sqlx::query_as::<_, Booking>(&format!("SELECT {COLUMNS} FROM bookings WHERE id = $1{lock}"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        match booking {
            Some(booking) => {
                let mut list = vec![booking];
                Self::attach_tickets(conn, &mut list).await?;
                Ok(list.pop())
            }
            None => Ok(None),
        }
    }

    /// Bookings of one user, newest first.
    pub async fn get_by_user_id(&self, user_id: i64) -> sqlx::Result<Vec<Booking>> {
        let mut conn = self.pool.acquire().await?;
        let mut list = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;
        Self::attach_tickets(&mut conn, &mut list).await?;
        Ok(list)
    }

    /// Every booking, newest first.
    pub async fn get_all(&self) -> sqlx::Result<Vec<Booking>> {
        let mut conn = self.pool.acquire().await?;
        let mut list = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {COLUMNS} FROM bookings ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&mut *conn)
        .await?;
        Self::attach_tickets(&mut conn, &mut list).await?;
        Ok(list)
    }

    pub async fn booked_seat_ids(&self, session_id: i64) -> sqlx::Result<Vec<i64>> {
        let mut conn = self.pool.acquire().await?;
        Self::booked_seat_ids_in(&mut conn, session_id).await
    }

    /// Distinct seat ids held by pending or confirmed bookings of the session.
    pub async fn booked_seat_ids_in(conn: &mut PgConnection, session_id: i64) -> sqlx::Result<Vec<i64>> {
        sqlx::query_scalar::<_, i64>(
            "SELECT DISTINCT t.seat_id
             FROM tickets t
             JOIN bookings b ON b.id = t.booking_id
             WHERE b.session_id = $1 AND b.status IN ($2, $3)
             ORDER BY t.seat_id",
        )
        .bind(session_id)
        .bind(BookingStatus::Pending.as_str())
        .bind(BookingStatus::Confirmed.as_str())
        .fetch_all(conn)
        .await
    }

    pub async fn update_status(&self, id: i64, status: BookingStatus) -> sqlx::Result<bool> {
        sqlx::query("UPDATE bookings SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0)
    }

    /// Replaces the booking's tickets and total price.
    pub async fn replace_tickets(
        conn: &mut PgConnection,
        booking_id: i64,
        tickets: &[TicketDraft],
    ) -> sqlx::Result<Vec<Ticket>> {
        let total_price: f64 = tickets.iter().map(|t| t.price).sum();

        sqlx::query("DELETE FROM tickets WHERE booking_id = $1")
            .bind(booking_id)
            .execute(&mut *conn)
            .await?;
        sqlx::query("UPDATE bookings SET total_price = $2 WHERE id = $1")
            .bind(booking_id)
            .bind(total_price)
            .execute(&mut *conn)
            .await?;

        Self::insert_tickets(conn, booking_id, tickets).await
    }

    async fn attach_tickets(conn: &mut PgConnection, bookings: &mut [Booking]) -> sqlx::Result<()> {
        if bookings.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = bookings.iter().map(|b| b.id).collect();

        let tickets = sqlx::query_as::<_, Ticket>(
            "SELECT id, booking_id, seat_id, price FROM tickets WHERE booking_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(conn)
        .await?;

        let mut by_booking: HashMap<i64, Vec<Ticket>> = HashMap::new();
        for ticket in tickets {
            by_booking.entry(ticket.booking_id).or_default().push(ticket);
        }
        for booking in bookings.iter_mut() {
            booking.tickets = by_booking.remove(&booking.id).unwrap_or_default();
        }
        Ok(())
    }
}
