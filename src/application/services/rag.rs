use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    Chunk, DomainError, Embedding, SearchResult,
};

pub struct RagService {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
    default_top_k: usize,
}

impl RagService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        vector_store: Arc<dyn VectorStore>,
        default_top_k: usize,
    ) -> Self {
        Self {
            embedding,
            vector_store,
            default_top_k,
        }
    }

    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>, DomainError> {
        self.retrieve_top_k(query, self.default_top_k).await
    }

    #[instrument(skip(self, query), fields(query_len = query.len()))]
    pub async fn retrieve_top_k(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let embedding = self.embedding.embed(query).await?;
        let mut results = self.vector_store.search(&embedding, top_k).await?;
        results.truncate(top_k);
        Ok(results)
    }

    /// Embeds `chunks` in batches of `batch_size` with at most `concurrency`
    /// requests in flight, then upserts every record in one call.
    ///
    /// Batches complete out of order but results keep input order.
    #[instrument(skip(self, chunks), fields(count = chunks.len()))]
    pub async fn index_chunks(
        &self,
        chunks: &[Chunk],
        batch_size: usize,
        concurrency: usize,
    ) -> Result<usize, DomainError> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let batch_size = batch_size.max(1);
        let total_batches = chunks.len().div_ceil(batch_size);

        let batches: Vec<Vec<Embedding>> = stream::iter(chunks.chunks(batch_size).enumerate())
            .map(|(n, batch)| async move {
                let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
                let embeddings = self.embedding.embed_batch(&texts).await?;
                if embeddings.len() != batch.len() {
                    return Err(DomainError::external(format!(
                        "expected {} embeddings, got {}",
                        batch.len(),
                        embeddings.len()
                    )));
                }
                tracing::info!(batch = n + 1, total_batches, size = batch.len(), "embedded batch");
                Ok(embeddings)
            })
            .buffered(concurrency.max(1))
            .try_collect()
            .await?;

        let records: Vec<(Chunk, Embedding)> = chunks
            .iter()
            .cloned()
            .zip(batches.into_iter().flatten())
            .collect();

        self.vector_store.upsert_batch(&records).await?;
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::KeywordEmbedding;
    use crate::infrastructure::InMemoryVectorStore;

    fn chunks(n: usize) -> Vec<Chunk> {
        (0..n)
            .map(|i| Chunk::new(format!("chunk_{i}"), format!("text {i}")))
            .collect()
    }

    #[tokio::test]
    async fn test_index_chunks_batches_and_upserts_all() {
        let embedding = Arc::new(KeywordEmbedding::new(&["text"]));
        let store = Arc::new(InMemoryVectorStore::new());
        let rag = RagService::new(embedding.clone(), store.clone(), 5);

        let indexed = rag.index_chunks(&chunks(7), 3, 2).await.unwrap();

        assert_eq!(indexed, 7);
        assert_eq!(store.len(), 7);
        assert_eq!(embedding.batch_sizes(), vec![3, 3, 1]);
    }

    /// One-hot embedding keyed by the number in "text {i}". Earlier batches
    /// sleep longer, so they complete after later ones.
    struct SlowFirstEmbedding {
        dimension: usize,
        batch_size: usize,
    }

    #[async_trait::async_trait]
    impl EmbeddingService for SlowFirstEmbedding {
        async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
            Ok(self.one_hot(text))
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
            let batch = Self::index(texts[0]) / self.batch_size;
            let delay = 100u64.saturating_sub(10 * batch as u64);
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
            Ok(texts.iter().map(|t| self.one_hot(t)).collect())
        }
    }

    impl SlowFirstEmbedding {
        fn index(text: &str) -> usize {
            text.trim_start_matches("text ").parse().unwrap()
        }

        fn one_hot(&self, text: &str) -> Embedding {
            let mut vec = vec![0.0; self.dimension];
            vec[Self::index(text)] = 1.0;
            Embedding::new(vec)
        }
    }

    #[tokio::test]
    async fn test_index_chunks_keeps_pairing_when_batches_finish_out_of_order() {
        let embedding = Arc::new(SlowFirstEmbedding {
            dimension: 9,
            batch_size: 2,
        });
        let store = Arc::new(InMemoryVectorStore::new());
        let rag = RagService::new(embedding.clone(), store.clone(), 1);

        assert_eq!(rag.index_chunks(&chunks(9), 2, 4).await.unwrap(), 9);

        for i in 0..9 {
            let query = embedding.one_hot(&format!("text {i}"));
            let results = store.search(&query, 1).await.unwrap();
            assert_eq!(results[0].chunk.id, format!("chunk_{i}"));
            assert_eq!(results[0].chunk.text, format!("text {i}"));
            assert!((results[0].score - 1.0).abs() < 1e-6);
        }
    }

    #[tokio::test]
    async fn test_index_chunks_empty_is_noop() {
        let embedding = Arc::new(KeywordEmbedding::new(&["text"]));
        let store = Arc::new(InMemoryVectorStore::new());
        let rag = RagService::new(embedding.clone(), store.clone(), 5);

        assert_eq!(rag.index_chunks(&[], 3, 2).await.unwrap(), 0);
        assert!(store.is_empty());
        assert!(embedding.batch_sizes().is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_caps_at_top_k() {
        let embedding = Arc::new(KeywordEmbedding::new(&["text"]));
        let store = Arc::new(InMemoryVectorStore::new());
        let rag = RagService::new(embedding, store, 5);

        rag.index_chunks(&chunks(9), 4, 1).await.unwrap();
        let results = rag.retrieve("text").await.unwrap();

        assert_eq!(results.len(), 5);
    }
}
