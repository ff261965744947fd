use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::{ports::CounterStore, DomainError};

#[derive(Default)]
pub struct InMemoryCounterStore {
    counters: Mutex<HashMap<String, i64>>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        Self {
            counters: Mutex::new(values.into_iter().map(|(k, v)| (k.to_string(), v)).collect()),
        }
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64, DomainError> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let value = counters.entry(key.to_string()).or_insert(0);
        *value = value
            .checked_add(delta)
            .ok_or_else(|| DomainError::internal(format!("counter {key} would overflow")))?;
        Ok(*value)
    }

    async fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<i64>>, DomainError> {
        let counters = self
            .counters
            .lock()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        Ok(keys.iter().map(|k| counters.get(*k).copied()).collect())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_concurrent_increments_are_not_lost() {
        let store = Arc::new(InMemoryCounterStore::new());

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.incr("hits").await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.get_many(&["hits"]).await.unwrap(), vec![Some(50)]);
    }

    #[tokio::test]
    async fn test_overflow_is_an_error_and_keeps_value() {
        let store = InMemoryCounterStore::with_values([("tokens", i64::MAX - 1)]);

        assert_eq!(store.incr("tokens").await.unwrap(), i64::MAX);
        let err = store.incr("tokens").await.unwrap_err();

        assert!(matches!(err, DomainError::Internal(_)));
        assert_eq!(store.get_many(&["tokens"]).await.unwrap(), vec![Some(i64::MAX)]);
    }

    #[tokio::test]
    async fn test_get_many_preserves_order_and_missing() {
        let store = InMemoryCounterStore::with_values([("a", 1), ("c", 3)]);
        let values = store.get_many(&["c", "b", "a"]).await.unwrap();
        assert_eq!(values, vec![Some(3), None, Some(1)]);
    }
}
