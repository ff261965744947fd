use crate::domain::errors::DomainError;
use async_trait::async_trait;

/// Named integer counters. Increments are atomic in the backing store.
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64, DomainError>;
    /// Missing keys read as `None`, in the order requested.
    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<i64>>, DomainError>;
    async fn ping(&self) -> Result<(), DomainError>;

    async fn incr(&self, key: &str) -> Result<i64, DomainError> {
        self.incr_by(key, 1).await
    }
}
