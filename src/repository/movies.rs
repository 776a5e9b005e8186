use sqlx::PgPool;

use crate::models::{Movie, NewMovie};

const COLUMNS: &str = "id, title, description, duration, genre, rating, poster_url";

#[derive(Clone)]
pub struct MovieRepo {
    pool: PgPool,
}

impl MovieRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, movie: &NewMovie) -> sqlx::Result<Movie> {
        sqlx::query_as::<_, Movie>(&format!(
            "INSERT INTO movies (title, description, duration, genre, rating, poster_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        ))
        .bind(&movie.title)
        .bind(&movie.description)
        .bind(movie.duration)
        .bind(&movie.genre)
        .bind(movie.rating)
        .bind(&movie.poster_url)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn get_by_id(&self, id: i64) -> sqlx::Result<Option<Movie>> {
        sqlx::query_as::<_, Movie>(&format!("SELECT {COLUMNS} FROM movies WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_all(&self) -> sqlx::Result<Vec<Movie>> {
        sqlx::query_as::<_, Movie>(&format!("SELECT {COLUMNS} FROM movies ORDER BY id"))
            .fetch_all(&self.pool)
            .await
    }

    /// Replaces every field; `None` when the movie does not exist.
    pub async fn update(&self, id: i64, movie: &NewMovie) -> sqlx::Result<Option<Movie>> {
        sqlx::query_as::<_, Movie>(&format!(
            "UPDATE movies
             SET title = $2, description = $3, duration = $4, genre = $5, rating = $6, poster_url = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&movie.title)
        .bind(&movie.description)
        .bind(movie.duration)
        .bind(&movie.genre)
        .bind(movie.rating)
        .bind(&movie.poster_url)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: i64) -> sqlx::Result<bool> {
        sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0)
    }

    pub async fn count(&self) -> sqlx::Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await
    }
}
