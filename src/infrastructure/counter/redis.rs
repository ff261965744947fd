use async_trait::async_trait;
use deadpool_redis::redis::{cmd, AsyncCommands};
use deadpool_redis::{Config, Connection, Pool, Runtime};

use crate::domain::{ports::CounterStore, DomainError};

pub type RedisPool = Pool;

pub fn create_pool(redis_url: &str) -> Result<RedisPool, DomainError> {
    let cfg = Config::from_url(redis_url);
    cfg.create_pool(Some(Runtime::Tokio1))
        .map_err(|e| DomainError::external(format!("Redis pool error: {e}")))
}

/// Counters backed by Redis `INCRBY`/`MGET`, so increments stay atomic across
/// processes.
#[derive(Clone)]
pub struct RedisCounterStore {
    pool: RedisPool,
}

impl RedisCounterStore {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> Result<Connection, DomainError> {
        self.pool
            .get()
            .await
            .map_err(|e| DomainError::external(format!("Redis pool error: {e}")))
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64, DomainError> {
        let mut conn = self.conn().await?;
        conn.incr::<_, _, i64>(key, delta)
            .await
            .map_err(|e| DomainError::external(format!("Redis error: {e}")))
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<i64>>, DomainError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        // Explicit MGET: the client helper degrades to GET for a single key.
        let mut conn = self.conn().await?;
        cmd("MGET")
            .arg(keys)
            .query_async(&mut *conn)
            .await
            .map_err(|e| DomainError::external(format!("Redis error: {e}")))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.conn().await?;
        cmd("PING")
            .query_async::<String>(&mut *conn)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::external(format!("Redis error: {e}")))
    }
}
