use sqlx::PgPool;

use crate::models::{Hall, NewHall};

#[derive(Clone)]
pub struct HallRepo {
    pool: PgPool,
}

impl HallRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, hall: &NewHall) -> sqlx::Result<Hall> {
        sqlx::query_as::<_, Hall>(
            "INSERT INTO halls (name, capacity, rows, seats_per_row)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, capacity, rows, seats_per_row",
        )
        .bind(&hall.name)
        .bind(hall.capacity())
        .bind(hall.rows)
        .bind(hall.seats_per_row)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_by_id(&self, id: i64) -> sqlx::Result<Option<Hall>> {
        sqlx::query_as::<_, Hall>(
            "SELECT id, name, capacity, rows, seats_per_row FROM halls WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn get_all(&self) -> sqlx::Result<Vec<Hall>> {
        sqlx::query_as::<_, Hall>(
            "SELECT id, name, capacity, rows, seats_per_row FROM halls ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn count(&self) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM halls")
            .fetch_one(&self.pool)
            .await
    }
}
