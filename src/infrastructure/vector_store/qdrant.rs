use async_trait::async_trait;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use uuid::Uuid;

use crate::domain::{ports::VectorStore, Chunk, DomainError, Embedding, SearchResult};
use crate::infrastructure::config::VectorStoreConfig;

pub struct QdrantVectorStore {
    client: Qdrant,
    collection: String,
    dimension: usize,
}

impl QdrantVectorStore {
    pub async fn new(config: &VectorStoreConfig, dimension: usize) -> Result<Self, DomainError> {
        let client = Qdrant::from_url(&config.url)
            .api_key(config.api_key.clone())
            .build()
            .map_err(|e| DomainError::external(e.to_string()))?;

        let store = Self {
            client,
            collection: config.collection.clone(),
            dimension,
        };

        store.ensure_collection().await?;

        Ok(store)
    }

    async fn ensure_collection(&self) -> Result<(), DomainError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        if !exists {
            tracing::info!(collection = %self.collection, dimension = self.dimension, "creating collection");
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.collection).vectors_config(
                        VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(|e| DomainError::external(e.to_string()))?;
        }

        Ok(())
    }

    /// Chunk ids are free-form strings; Qdrant point ids must be integers or
    /// UUIDs, so the point id is a name-based UUID of the chunk id.
    pub fn point_id(chunk_id: &str) -> Uuid {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, chunk_id.as_bytes())
    }

    fn to_point(&self, chunk: &Chunk, embedding: &Embedding) -> Result<PointStruct, DomainError> {
        if embedding.dimension() != self.dimension {
            return Err(DomainError::validation(format!(
                "embedding for {} has dimension {}, collection expects {}",
                chunk.id,
                embedding.dimension(),
                self.dimension
            )));
        }

        let payload: Payload = serde_json::json!({
            "chunk_id": chunk.id,
            "text": chunk.text,
        })
        .try_into()
        .map_err(|_| DomainError::internal("Failed to create payload"))?;

        Ok(PointStruct::new(
            Self::point_id(&chunk.id).to_string(),
            embedding.as_slice().to_vec(),
            payload,
        ))
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn upsert_batch(&self, records: &[(Chunk, Embedding)]) -> Result<(), DomainError> {
        if records.is_empty() {
            return Ok(());
        }

        let points = records
            .iter()
            .map(|(chunk, embedding)| self.to_point(chunk, embedding))
            .collect::<Result<Vec<_>, _>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        Ok(())
    }

    async fn search(&self, query: &Embedding, top_k: usize) -> Result<Vec<SearchResult>, DomainError> {
        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, query.as_slice().to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        let search_results = results
            .result
            .into_iter()
            .filter_map(|point| {
                let payload = point.payload;
                let id = payload.get("chunk_id")?.as_str()?.to_string();
                let text = payload.get("text")?.as_str()?.to_string();

                Some(SearchResult {
                    chunk: Chunk { id, text },
                    score: point.score,
                })
            })
            .take(top_k)
            .collect();

        Ok(search_results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_id_is_stable_per_chunk_id() {
        assert_eq!(
            QdrantVectorStore::point_id("identity_1"),
            QdrantVectorStore::point_id("identity_1")
        );
        assert_ne!(
            QdrantVectorStore::point_id("identity_1"),
            QdrantVectorStore::point_id("identity_2")
        );
    }
}
