use sqlx::{PgConnection, PgPool};
use tracing::debug;

use crate::models::{Hall, Seat, SeatType};

#[derive(Clone)]
pub struct SeatRepo {
    pool: PgPool,
}

impl SeatRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Seats among `ids` that exist; unknown ids are simply absent from the result.
    pub async fn get_by_ids(conn: &mut PgConnection, ids: &[i64]) -> sqlx::Result<Vec<Seat>> {
        sqlx::query_as::<_, Seat>(
            "SELECT id, hall_id, row_number, seat_number, seat_type FROM seats WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(conn)
        .await
    }

    pub async fn get_by_hall_id(&self, hall_id: i64) -> sqlx::Result<Vec<Seat>> {
        sqlx::query_as::<_, Seat>(
            "SELECT id, hall_id, row_number, seat_number, seat_type
             FROM seats
             WHERE hall_id = $1
             ORDER BY row_number, seat_number",
        )
        .bind(hall_id)
        .fetch_all(&self.pool)
        .await
    }

    // Создаём места для зала, если их ещё нет
    pub async fn ensure_for_hall(&self, hall: &Hall) -> sqlx::Result<u64> {
        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM seats WHERE hall_id = $1")
            .bind(hall.id)
            .fetch_one(&self.pool)
            .await?;
        if existing > 0 {
            return Ok(0);
        }

        let mut rows = Vec::new();
        let mut numbers = Vec::new();
        let mut types = Vec::new();
        for (row, number, seat_type) in hall.seat_layout() {
            rows.push(row);
            numbers.push(number);
            types.push(seat_type.as_str().to_string());
        }

        let inserted = sqlx::query(
            "INSERT INTO seats (hall_id, row_number, seat_number, seat_type)
             SELECT $1, r, n, t FROM UNNEST($2::int4[], $3::int4[], $4::text[]) AS s(r, n, t)
             ON CONFLICT (hall_id, row_number, seat_number) DO NOTHING",
        )
        .bind(hall.id)
        .bind(&rows)
        .bind(&numbers)
        .bind(&types)
        .execute(&self.pool)
        .await?
        .rows_affected();

        debug!("Generated {} seats for hall {}", inserted, hall.id);
        Ok(inserted)
    }

    /// Re-applies the layout rule to existing seats: VIP in the last two rows only.
    pub async fn fix_vip_for_hall(&self, hall: &Hall) -> sqlx::Result<()> {
        if hall.rows < 2 {
            return Ok(());
        }
        let first_vip_row = hall.rows - 1;

        sqlx::query(
            "UPDATE seats
             SET seat_type = CASE WHEN row_number >= $2 THEN $3 ELSE $4 END
             WHERE hall_id = $1",
        )
        .bind(hall.id)
        .bind(first_vip_row)
        .bind(SeatType::Vip.as_str())
        .bind(SeatType::Regular.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
