use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Minutes.
    pub duration: i32,
    pub genre: String,
    pub rating: f64,
    pub poster_url: Option<String>,
}

/// Payload for creating or replacing a movie.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct NewMovie {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    pub description: String,
    #[validate(range(min = 0, message = "duration must not be negative"))]
    pub duration: i32,
    pub genre: String,
    #[validate(range(min = 0.0, max = 10.0, message = "rating must be between 0 and 10"))]
    pub rating: f64,
    pub poster_url: Option<String>,
}
