use crate::domain::{errors::DomainError, Chunk, Embedding, SearchResult};
use async_trait::async_trait;

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Inserts or replaces records keyed by chunk id, in a single call.
    async fn upsert_batch(&self, records: &[(Chunk, Embedding)]) -> Result<(), DomainError>;
    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError>;
}
