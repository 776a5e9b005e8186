pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod redis_client;
pub mod repository;
pub mod services;

use axum::{extract::FromRef, response::Html, routing::get, Router};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    cache::CacheService,
    config::{Config, UploadConfig},
    database::Database,
    middleware::JwtKeys,
    redis_client::RedisClient,
    repository::Repositories,
    services::{BookingService, CatalogService, SessionService, UserService},
};

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub redis: RedisClient,
    pub cache: CacheService,
    pub config: Config,
    pub repos: Repositories,
    pub catalog: CatalogService,
    pub sessions: SessionService,
    pub bookings: BookingService,
    pub users: UserService,
    pub jwt: JwtKeys,
}

impl AppState {
    /// Connects to PostgreSQL and Redis, applies migrations and wires the
    /// services on top of one pool.
    pub async fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        let db = Database::connect(&config.database).await?;
        db.run_migrations().await?;

        let redis = RedisClient::connect(&config.redis).await?;
        redis.ping().await?;

        let repos = db.repositories();
        let cache = CacheService::new(
            redis.clone(),
            repos.movies.clone(),
            repos.halls.clone(),
            repos.seats.clone(),
        );
        let catalog = CatalogService::new(
            repos.movies.clone(),
            repos.halls.clone(),
            repos.seats.clone(),
            cache.clone(),
        );
        let sessions = SessionService::new(
            repos.sessions.clone(),
            repos.movies.clone(),
            repos.halls.clone(),
            repos.seats.clone(),
            repos.bookings.clone(),
            cache.clone(),
        );
        let bookings = BookingService::new(repos.bookings.clone());
        let users = UserService::new(repos.users.clone());
        let jwt = JwtKeys::from_config(&config.jwt);

        Ok(Arc::new(Self {
            db,
            redis,
            cache,
            config,
            repos,
            catalog,
            sessions,
            bookings,
            users,
            jwt,
        }))
    }
}

impl FromRef<Arc<AppState>> for JwtKeys {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.jwt.clone()
    }
}

impl FromRef<Arc<AppState>> for UploadConfig {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.config.upload.clone()
    }
}

async fn index() -> Html<&'static str> {
    Html(include_str!("web/index.html"))
}

/// Full application router: HTML client, health check, JSON API under
/// `/api` and uploaded posters under `/posters`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let upload = state.config.upload.clone();

    Router::new()
        .route("/", get(index))
        .merge(controllers::health::routes())
        .nest("/api", controllers::routes(upload.max_poster_bytes))
        .nest_service("/posters", ServeDir::new(&upload.posters_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
