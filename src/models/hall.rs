use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::SeatType;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hall {
    pub id: i64,
    pub name: String,
    pub capacity: i32,
    pub rows: i32,
    pub seats_per_row: i32,
}

impl Hall {
    /// Every (row, seat number, type) position of the hall, row-major, 1-based.
    pub fn seat_layout(&self) -> impl Iterator<Item = (i32, i32, SeatType)> + '_ {
        (1..=self.rows).flat_map(move |row| {
            (1..=self.seats_per_row).map(move |number| (row, number, SeatType::for_row(row, self.rows)))
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewHall {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 1, max = 100, message = "rows must be between 1 and 100"))]
    pub rows: i32,
    #[validate(range(min = 1, max = 100, message = "seatsPerRow must be between 1 and 100"))]
    pub seats_per_row: i32,
}

impl NewHall {
    pub fn capacity(&self) -> i32 {
        self.rows * self.seats_per_row
    }
}
