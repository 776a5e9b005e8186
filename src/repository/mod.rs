//! PostgreSQL stores, one per entity.
//!
//! Queries are built at runtime (`query_as` without macros) so the crate
//! compiles without a live `DATABASE_URL`. Methods that take a
//! `&mut PgConnection` run inside the caller's transaction.

pub mod bookings;
pub mod halls;
pub mod movies;
pub mod seats;
pub mod sessions;
pub mod users;

pub use bookings::BookingRepo;
pub use halls::HallRepo;
pub use movies::MovieRepo;
pub use seats::SeatRepo;
pub use sessions::SessionRepo;
pub use users::UserRepo;

use sqlx::PgPool;

/// Все репозитории поверх одного пула
#[derive(Clone)]
pub struct Repositories {
    pub movies: MovieRepo,
    pub halls: HallRepo,
    pub seats: SeatRepo,
    pub sessions: SessionRepo,
    pub bookings: BookingRepo,
    pub users: UserRepo,
}

impl Repositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            movies: MovieRepo::new(pool.clone()),
            halls: HallRepo::new(pool.clone()),
            seats: SeatRepo::new(pool.clone()),
            sessions: SessionRepo::new(pool.clone()),
            bookings: BookingRepo::new(pool.clone()),
            users: UserRepo::new(pool),
        }
    }
}
