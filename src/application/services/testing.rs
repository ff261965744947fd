//! Deterministic stand-ins for the remote model services.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::{
    ports::{EmbeddingService, LlmService},
    Completion, DomainError, Embedding, TokenUsage,
};

/// Embeds text as keyword counts plus a constant bias dimension.
pub struct KeywordEmbedding {
    keywords: Vec<String>,
    batches: Mutex<Vec<usize>>,
}

impl KeywordEmbedding {
    pub fn new(keywords: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            batches: Mutex::new(Vec::new()),
        }
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        let mut sizes = self.batches.lock().unwrap().clone();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes
    }

    fn vectorize(&self, text: &str) -> Embedding {
        let lower = text.to_lowercase();
        let mut vec: Vec<f32> = self
            .keywords
            .iter()
            .map(|k| lower.matches(k.as_str()).count() as f32)
            .collect();
        vec.push(0.1);
        Embedding::new(vec)
    }
}

#[async_trait]
impl EmbeddingService for KeywordEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        self.batches.lock().unwrap().push(texts.len());
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }
}

pub struct FailingEmbedding;

#[async_trait]
impl EmbeddingService for FailingEmbedding {
    async fn embed(&self, _text: &str) -> Result<Embedding, DomainError> {
        Err(DomainError::external("embedding quota exceeded"))
    }

    async fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        Err(DomainError::external("embedding quota exceeded"))
    }
}

/// Replies with a fixed answer and records the last request it saw.
pub struct StubLlm {
    reply: String,
    usage: TokenUsage,
    last_request: Mutex<Option<(String, String, Option<f64>)>>,
}

impl StubLlm {
    pub fn new(reply: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            reply: reply.into(),
            usage,
            last_request: Mutex::new(None),
        }
    }

    pub fn last_request(&self) -> Option<(String, String, Option<f64>)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for StubLlm {
    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
        temperature: Option<f64>,
    ) -> Result<Completion, DomainError> {
        *self.last_request.lock().unwrap() =
            Some((system.to_string(), prompt.to_string(), temperature));
        Ok(Completion {
            text: self.reply.clone(),
            usage: self.usage,
        })
    }
}
