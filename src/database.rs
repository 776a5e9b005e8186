use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use crate::{config::DatabaseConfig, repository::Repositories};

/// PostgreSQL pool plus the embedded schema.
#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&config.url)
            .await?;

        info!(pool_size = config.pool_size, "Database connected");
        Ok(Database { pool })
    }

    // Схема лежит в src/migrations и вшивается в бинарник
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/migrations").run(&self.pool).await?;
        info!("Migrations applied");
        Ok(())
    }

    /// Every entity store over this pool.
    pub fn repositories(&self) -> Repositories {
        Repositories::new(self.pool.clone())
    }
}
