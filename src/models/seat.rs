use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatType {
    Regular,
    Vip,
}

impl SeatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatType::Regular => "regular",
            SeatType::Vip => "vip",
        }
    }

    /// Seat type for a 1-based row of a hall with `rows` rows: the last two
    /// rows are VIP when the hall has at least two rows.
    pub fn for_row(row: i32, rows: i32) -> Self {
        if rows >= 2 && row >= rows - 1 {
            SeatType::Vip
        } else {
            SeatType::Regular
        }
    }
}

impl TryFrom<String> for SeatType {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "regular" => Ok(SeatType::Regular),
            "vip" => Ok(SeatType::Vip),
            _ => Err(UnknownVariant { kind: "seat_type", value }),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: i64,
    pub hall_id: i64,
    pub row_number: i32,
    pub seat_number: i32,
    #[sqlx(try_from = "String")]
    pub seat_type: SeatType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_two_rows_are_vip() {
        let types: Vec<SeatType> = (1..=8).map(|row| SeatType::for_row(row, 8)).collect();
        assert_eq!(types[..6], [SeatType::Regular; 6]);
        assert_eq!(types[6..], [SeatType::Vip; 2]);
    }

    #[test]
    fn single_row_hall_has_no_vip() {
        assert_eq!(SeatType::for_row(1, 1), SeatType::Regular);
    }

    #[test]
    fn two_row_hall_is_all_vip() {
        assert_eq!(SeatType::for_row(1, 2), SeatType::Vip);
        assert_eq!(SeatType::for_row(2, 2), SeatType::Vip);
    }

    #[test]
    fn parses_stored_values() {
        assert_eq!(SeatType::try_from("vip".to_string()).unwrap(), SeatType::Vip);
        assert!(SeatType::try_from("balcony".to_string()).is_err());
    }
}
