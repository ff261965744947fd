use async_trait::async_trait;
use rig::client::{EmbeddingsClient, ProviderClient};
use rig::embeddings::EmbeddingModel;
use rig::providers::openai;

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::config::EmbeddingConfig;

pub struct OpenAiEmbedding {
    client: openai::Client,
    model: String,
}

impl OpenAiEmbedding {
    pub fn new(client: openai::Client, config: &EmbeddingConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
        }
    }

    /// Builds a client from `OPENAI_API_KEY`.
    pub fn from_env(config: &EmbeddingConfig) -> Self {
        Self::new(openai::Client::from_env(), config)
    }

    fn to_embedding(emb: rig::embeddings::Embedding) -> Embedding {
        Embedding::new(emb.vec.into_iter().map(|x| x as f32).collect())
    }
}

#[async_trait]
impl EmbeddingService for OpenAiEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        let model = self.client.embedding_model(&self.model);

        model
            .embed_text(text)
            .await
            .map(Self::to_embedding)
            .map_err(|e| DomainError::external(e.to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.client.embedding_model(&self.model);
        let embeddings = model
            .embed_texts(texts.iter().map(|t| t.to_string()))
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        if embeddings.len() != texts.len() {
            return Err(DomainError::external(format!(
                "embedding endpoint returned {} vectors for {} inputs",
                embeddings.len(),
                texts.len()
            )));
        }

        Ok(embeddings.into_iter().map(Self::to_embedding).collect())
    }
}
