use tracing::{debug, warn};

use crate::cache::CacheService;
use crate::models::Movie;

const MOVIES_KEY: &str = "movies";
const MOVIES_TTL_SECS: u64 = 3600;

impl CacheService {
    // Получить фильмы: сначала кеш, потом БД
    pub async fn get_movies(&self) -> Result<Vec<Movie>, sqlx::Error> {
        if let Ok(movies) = self.redis.get_json::<Vec<Movie>>(MOVIES_KEY).await {
            debug!("Movies served from cache");
            return Ok(movies);
        }

        let movies = self.movies.get_all().await?;
        if let Err(e) = self.redis.set_json(MOVIES_KEY, &movies, MOVIES_TTL_SECS).await {
            warn!("Failed to cache movies: {:?}", e);
        }
        Ok(movies)
    }

    pub async fn invalidate_movies(&self) {
        if let Err(e) = self.redis.del(MOVIES_KEY).await {
            warn!("Failed to invalidate movies cache: {:?}", e);
        }
    }
}
