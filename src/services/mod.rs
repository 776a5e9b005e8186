pub mod booking;
pub mod catalog;
pub mod heartbeat;
pub mod posters;
pub mod seed;
pub mod session;
pub mod user;

pub use booking::BookingService;
pub use catalog::CatalogService;
pub use session::SessionService;
pub use user::UserService;
