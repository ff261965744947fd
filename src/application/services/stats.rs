use std::sync::Arc;
use tracing::instrument;

use crate::domain::{counters, ports::CounterStore, DomainError, StatsSnapshot, TokenUsage};

pub struct StatsService {
    store: Arc<dyn CounterStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Counts a new conversation and returns the updated total.
    #[instrument(skip(self))]
    pub async fn register_visit(&self) -> Result<u64, DomainError> {
        let value = self.store.incr(counters::CONVERSATIONS).await?;
        Ok(non_negative(Some(value)))
    }

    #[instrument(skip(self))]
    pub async fn record_answer(&self, usage: TokenUsage) -> Result<(), DomainError> {
        self.store.incr(counters::MESSAGES_ANSWERED).await?;
        self.store
            .incr_by(counters::PROMPT_TOKENS, to_delta(usage.prompt_tokens))
            .await?;
        self.store
            .incr_by(counters::COMPLETION_TOKENS, to_delta(usage.completion_tokens))
            .await?;
        self.store
            .incr_by(counters::TOTAL_TOKENS, to_delta(usage.total_tokens))
            .await?;
        Ok(())
    }

    /// Missing counters read as zero.
    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<StatsSnapshot, DomainError> {
        let values = self
            .store
            .get_many(&[
                counters::CONVERSATIONS,
                counters::MESSAGES_ANSWERED,
                counters::PROMPT_TOKENS,
                counters::COMPLETION_TOKENS,
                counters::TOTAL_TOKENS,
            ])
            .await?;
        let value = |i: usize| non_negative(values.get(i).copied().flatten());

        Ok(StatsSnapshot {
            conversations: value(0),
            messages: value(1),
            prompt_tokens: value(2),
            completion_tokens: value(3),
            total_tokens: value(4),
        })
    }

    pub async fn ping(&self) -> Result<(), DomainError> {
        self.store.ping().await
    }
}

fn non_negative(value: Option<i64>) -> u64 {
    value.map(|v| v.max(0) as u64).unwrap_or(0)
}

fn to_delta(tokens: u64) -> i64 {
    i64::try_from(tokens).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryCounterStore;

    #[tokio::test]
    async fn test_snapshot_defaults_missing_to_zero() {
        let stats = StatsService::new(Arc::new(InMemoryCounterStore::new()));
        assert_eq!(stats.snapshot().await.unwrap(), StatsSnapshot::default());
    }

    #[tokio::test]
    async fn test_snapshot_clamps_negative_values() {
        let store = InMemoryCounterStore::with_values([
            (counters::CONVERSATIONS, -4),
            (counters::TOTAL_TOKENS, 120),
        ]);
        let stats = StatsService::new(Arc::new(store));

        let snapshot = stats.snapshot().await.unwrap();
        assert_eq!(snapshot.conversations, 0);
        assert_eq!(snapshot.total_tokens, 120);
    }

    #[tokio::test]
    async fn test_register_visit_increments_by_one() {
        let stats = StatsService::new(Arc::new(InMemoryCounterStore::new()));
        assert_eq!(stats.register_visit().await.unwrap(), 1);
        assert_eq!(stats.register_visit().await.unwrap(), 2);
        assert_eq!(stats.snapshot().await.unwrap().conversations, 2);
    }

    #[tokio::test]
    async fn test_record_answer_accumulates_usage() {
        let stats = StatsService::new(Arc::new(InMemoryCounterStore::new()));
        let usage = TokenUsage {
            prompt_tokens: 100,
            completion_tokens: 20,
            total_tokens: 120,
        };

        stats.record_answer(usage).await.unwrap();
        stats.record_answer(usage).await.unwrap();

        let snapshot = stats.snapshot().await.unwrap();
        assert_eq!(snapshot.messages, 2);
        assert_eq!(snapshot.prompt_tokens, 200);
        assert_eq!(snapshot.completion_tokens, 40);
        assert_eq!(snapshot.total_tokens, 240);
    }
}
