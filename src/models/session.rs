use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// Сеанс: фильм в зале в заданное время по базовой цене
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: i64,
    pub movie_id: i64,
    pub hall_id: i64,
    pub start_time: DateTime<Utc>,
    pub price: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub movie_id: i64,
    pub hall_id: i64,
    /// RFC3339, e.g. `2026-02-15T14:00:00Z`.
    pub start_time: DateTime<Utc>,
    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: f64,
}
