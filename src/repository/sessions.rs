use sqlx::{PgConnection, PgPool};

use crate::models::{NewSession, Session};

const COLUMNS: &str = "id, movie_id, hall_id, start_time, price";

#[derive(Clone)]
pub struct SessionRepo {
    pool: PgPool,
}

impl SessionRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, session: &NewSession) -> sqlx::Result<Session> {
        sqlx::query_as::<_, Session>(&format!(
            "INSERT INTO sessions (movie_id, hall_id, start_time, price)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        ))
        .bind(session.movie_id)
        .bind(session.hall_id)
        .bind(session.start_time)
        .bind(session.price)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_by_id(&self, id: i64) -> sqlx::Result<Option<Session>> {
        let mut conn = self.pool.acquire().await?;
        Self::find(&mut conn, id, false).await
    }

    /// Loads the session and holds a row lock on it until the transaction ends.
    /// Bookings for one session serialize on this lock.
    pub async fn lock_by_id(conn: &mut PgConnection, id: i64) -> sqlx::Result<Option<Session>> {
        Self::find(conn, id, true).await
    }

    async fn find(conn: &mut PgConnection, id: i64, for_update: bool) -> sqlx::Result<Option<Session>> {
        let lock = if for_update { " FOR UPDATE" } else { "" };
        sqlx::query_as::<_, Session>(&format!("SELECT {COLUMNS} FROM sessions WHERE id = $1{lock}"))
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    pub async fn get_all(&self) -> sqlx::Result<Vec<Session>> {
        sqlx::query_as::<_, Session>(&format!("SELECT {COLUMNS} FROM sessions ORDER BY id"))
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get_by_movie_id(&self, movie_id: i64) -> sqlx::Result<Vec<Session>> {
        sqlx::query_as::<_, Session>(&format!(
            "SELECT {COLUMNS} FROM sessions WHERE movie_id = $1 ORDER BY start_time"
        ))
        .bind(movie_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_by_hall_id(&self, hall_id: i64) -> sqlx::Result<Vec<Session>> {
        sqlx::query_as::<_, Session>(&format!(
            "SELECT {COLUMNS} FROM sessions WHERE hall_id = $1 ORDER BY start_time"
        ))
        .bind(hall_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn update(&self, id: i64, session: &NewSession) -> sqlx::Result<Option<Session>> {
        sqlx::query_as::<_, Session>(&format!(
            "UPDATE sessions
             SET movie_id = $2, hall_id = $3, start_time = $4, price = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(session.movie_id)
        .bind(session.hall_id)
        .bind(session.start_time)
        .bind(session.price)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: i64) -> sqlx::Result<bool> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0)
    }

    pub async fn count(&self) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.pool)
            .await
    }
}
