use tracing::{info, warn};

use crate::{
    redis_client::RedisClient,
    repository::{HallRepo, MovieRepo, SeatRepo},
};

pub mod movies;
pub mod seats;

/// Read-through Redis cache for data that changes rarely: the movie list and
/// hall seat layouts. Booked state is never cached. A Redis failure only
/// costs a database round trip.
#[derive(Clone)]
pub struct CacheService {
    redis: RedisClient,
    movies: MovieRepo,
    halls: HallRepo,
    seats: SeatRepo,
}

impl CacheService {
    pub fn new(redis: RedisClient, movies: MovieRepo, halls: HallRepo, seats: SeatRepo) -> Self {
        Self { redis, movies, halls, seats }
    }

    // Прогрев кеша при старте: старые записи могли пережить сид и правку VIP-рядов
    pub async fn warmup_cache(&self) {
        info!("Starting cache warmup...");

        self.invalidate_movies().await;
        if let Err(e) = self.get_movies().await {
            warn!("Movie cache warmup failed: {:?}", e);
        }

        match self.halls.get_all().await {
            Ok(halls) => {
                for hall in halls {
                    self.invalidate_hall_seats(hall.id).await;
                    if let Err(e) = self.get_hall_seats(hall.id).await {
                        warn!("Seat cache warmup failed for hall {}: {:?}", hall.id, e);
                    }
                }
            }
            Err(e) => warn!("Seat cache warmup failed: {:?}", e),
        }

        info!("Cache warmup done");
    }
}
