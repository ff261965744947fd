use async_trait::async_trait;
use std::sync::RwLock;

use crate::domain::{ports::VectorStore, Chunk, DomainError, Embedding, SearchResult};

/// Brute-force cosine search over records held in memory.
pub struct InMemoryVectorStore {
    records: RwLock<Vec<(Chunk, Embedding)>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert_batch(&self, records: &[(Chunk, Embedding)]) -> Result<(), DomainError> {
        let mut store = self
            .records
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        for (chunk, embedding) in records {
            store.retain(|(c, _)| c.id != chunk.id);
            store.push((chunk.clone(), embedding.clone()));
        }
        Ok(())
    }

    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let store = self
            .records
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let mut results: Vec<SearchResult> = store
            .iter()
            .map(|(chunk, embedding)| SearchResult {
                chunk: chunk.clone(),
                score: query.cosine_similarity(embedding),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_and_search_ranks_by_similarity() {
        let store = InMemoryVectorStore::new();
        store
            .upsert_batch(&[
                (Chunk::new("far", "far away"), Embedding::new(vec![0.0, 1.0, 0.0])),
                (Chunk::new("near", "close by"), Embedding::new(vec![1.0, 0.1, 0.0])),
            ])
            .await
            .unwrap();

        let query = Embedding::new(vec![1.0, 0.0, 0.0]);
        let results = store.search(&query, 1).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.id, "near");
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let store = InMemoryVectorStore::new();
        let embedding = Embedding::new(vec![1.0, 0.0]);

        store
            .upsert_batch(&[(Chunk::new("a", "old"), embedding.clone())])
            .await
            .unwrap();
        store
            .upsert_batch(&[(Chunk::new("a", "new"), embedding.clone())])
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        let results = store.search(&embedding, 10).await.unwrap();
        assert_eq!(results[0].chunk.text, "new");
    }
}
