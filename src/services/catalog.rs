use tracing::info;

use crate::{
    cache::CacheService,
    error::{AppError, AppResult},
    models::{Hall, Movie, NewHall, NewMovie},
    repository::{HallRepo, MovieRepo, SeatRepo},
};

/// Catalogue: movies and halls. Reads of the movie list go through the cache;
/// every write invalidates it.
#[derive(Clone)]
pub struct CatalogService {
    movies: MovieRepo,
    halls: HallRepo,
    seats: SeatRepo,
    cache: CacheService,
}

impl CatalogService {
    pub fn new(movies: MovieRepo, halls: HallRepo, seats: SeatRepo, cache: CacheService) -> Self {
        Self { movies, halls, seats, cache }
    }

    pub async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        Ok(self.cache.get_movies().await?)
    }

    pub async fn get_movie(&self, id: i64) -> AppResult<Option<Movie>> {
        Ok(self.movies.get_by_id(id).await?)
    }

    pub async fn create_movie(&self, movie: &NewMovie) -> AppResult<Movie> {
        let created = self.movies.create(movie).await?;
        self.cache.invalidate_movies().await;
        info!("Movie {} created: {}", created.id, created.title);
        Ok(created)
    }

    pub async fn update_movie(&self, id: i64, movie: &NewMovie) -> AppResult<Movie> {
        let updated = self
            .movies
            .update(id, movie)
            .await?
            .ok_or_else(|| AppError::not_found("not found"))?;
        self.cache.invalidate_movies().await;
        Ok(updated)
    }

    /// Fails with a conflict while sessions still reference the movie.
    pub async fn delete_movie(&self, id: i64) -> AppResult<()> {
        let deleted = self.movies.delete(id).await.map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict("movie has sessions".to_string()),
            other => other,
        })?;
        if !deleted {
            return Err(AppError::not_found("not found"));
        }
        self.cache.invalidate_movies().await;
        info!("Movie {} deleted", id);
        Ok(())
    }

    pub async fn list_halls(&self) -> AppResult<Vec<Hall>> {
        Ok(self.halls.get_all().await?)
    }

    /// Creates the hall and lays out its seats.
    pub async fn create_hall(&self, hall: &NewHall) -> AppResult<Hall> {
        let created = self.halls.create(hall).await?;
        let seats = self.seats.ensure_for_hall(&created).await?;
        info!("Hall {} created with {} seats", created.id, seats);
        Ok(created)
    }
}
