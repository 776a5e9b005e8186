use tracing::warn;

use crate::cache::CacheService;
use crate::models::Seat;

const SEATS_TTL_SECS: u64 = 86400; // 24 часа

fn hall_seats_key(hall_id: i64) -> String {
    format!("hall:{}:seats", hall_id)
}

impl CacheService {
    /// Seat layout of a hall, ordered by row and number. Empty layouts are
    /// not cached, the hall may still get its seats generated.
    pub async fn get_hall_seats(&self, hall_id: i64) -> Result<Vec<Seat>, sqlx::Error> {
        let key = hall_seats_key(hall_id);
        if let Ok(seats) = self.redis.get_json::<Vec<Seat>>(&key).await {
            if !seats.is_empty() {
                return Ok(seats);
            }
        }

        let seats = self.seats.get_by_hall_id(hall_id).await?;
        if !seats.is_empty() {
            if let Err(e) = self.redis.set_json(&key, &seats, SEATS_TTL_SECS).await {
                warn!("Failed to cache seats of hall {}: {:?}", hall_id, e);
            }
        }
        Ok(seats)
    }

    pub async fn invalidate_hall_seats(&self, hall_id: i64) {
        if let Err(e) = self.redis.del(&hall_seats_key(hall_id)).await {
            warn!("Failed to invalidate seats cache for hall {}: {:?}", hall_id, e);
        }
    }
}
