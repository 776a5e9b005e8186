pub mod booking;
pub mod hall;
pub mod movie;
pub mod seat;
pub mod session;
pub mod user;

pub use booking::{Booking, BookingStatus, Ticket};
pub use hall::{Hall, NewHall};
pub use movie::{Movie, NewMovie};
pub use seat::{Seat, SeatType};
pub use session::{NewSession, Session};
pub use user::{Role, User};

/// Значение текстовой колонки, которое не соответствует ни одному варианту enum.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
