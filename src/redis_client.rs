use redis::{aio::MultiplexedConnection, AsyncCommands, Client, ErrorKind, RedisError, RedisResult};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::config::RedisConfig;

/// Shared multiplexed connection; clones are cheap and share one socket.
#[derive(Clone)]
pub struct RedisClient {
    pub conn: MultiplexedConnection,
}

impl RedisClient {
    pub async fn connect(config: &RedisConfig) -> RedisResult<Self> {
        let client = Client::open(config.url.as_str())?;
        let conn = client.get_multiplexed_tokio_connection().await?;
        info!("Redis connected");
        Ok(RedisClient { conn })
    }

    pub async fn ping(&self) -> RedisResult<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<String>(&mut conn).await.map(|_| ())
    }

    /// JSON value stored under `key`; a missing key is an error like any other miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> RedisResult<T> {
        let mut conn = self.conn.clone();
        let data: String = conn.get(key).await?;
        serde_json::from_str(&data)
            .map_err(|e| RedisError::from((ErrorKind::TypeError, "Parse error", e.to_string())))
    }

    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl_secs: u64) -> RedisResult<()> {
        let data = serde_json::to_string(value)
            .map_err(|e| RedisError::from((ErrorKind::TypeError, "Serialize error", e.to_string())))?;
        let mut conn = self.conn.clone();
        conn.set_ex(key, data, ttl_secs).await
    }

    pub async fn del(&self, key: &str) -> RedisResult<()> {
        let mut conn = self.conn.clone();
        conn.del(key).await
    }
}
