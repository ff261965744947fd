use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

use crate::application::services::{PersonaPrompt, RagService, StatsService};
use crate::domain::{join_context, ports::LlmService, truncate_chars, DomainError};

#[derive(Debug, Clone, Serialize)]
pub struct ChatAnswer {
    pub answer: String,
    /// Ids of the retrieved chunks, in rank order.
    pub sources: Vec<String>,
    /// Leading characters of the context handed to the model.
    pub context_used: String,
}

/// Answers a question: retrieve, assemble the persona prompt, complete,
/// then record usage.
pub struct ChatService {
    rag: Arc<RagService>,
    llm: Arc<dyn LlmService>,
    stats: Arc<StatsService>,
    prompt: PersonaPrompt,
    temperature: f64,
    preview_chars: usize,
}

impl ChatService {
    pub fn new(
        rag: Arc<RagService>,
        llm: Arc<dyn LlmService>,
        stats: Arc<StatsService>,
        prompt: PersonaPrompt,
    ) -> Self {
        Self {
            rag,
            llm,
            stats,
            prompt,
            temperature: 0.7,
            preview_chars: 500,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    pub fn persona_name(&self) -> &str {
        self.prompt.persona_name()
    }

    #[instrument(skip(self, question), fields(question_len = question.len()))]
    pub async fn answer(&self, question: &str) -> Result<ChatAnswer, DomainError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DomainError::validation("question must not be empty"));
        }

        let results = self.rag.retrieve(question).await?;
        let context = join_context(&results);
        let system = self.prompt.render(&context);

        let completion = self
            .llm
            .complete_with_system(&system, question, Some(self.temperature))
            .await?;

        self.stats.record_answer(completion.usage).await?;

        tracing::debug!(
            sources = results.len(),
            total_tokens = completion.usage.total_tokens,
            "answered question"
        );

        Ok(ChatAnswer {
            answer: completion.text,
            sources: results.into_iter().map(|r| r.chunk.id).collect(),
            context_used: truncate_chars(&context, self.preview_chars).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::{FailingEmbedding, KeywordEmbedding, StubLlm};
    use crate::domain::{ports::EmbeddingService, Chunk, TokenUsage};
    use crate::infrastructure::config::PersonaConfig;
    use crate::infrastructure::{InMemoryCounterStore, InMemoryVectorStore};

    const USAGE: TokenUsage = TokenUsage {
        prompt_tokens: 300,
        completion_tokens: 50,
        total_tokens: 350,
    };

    fn persona() -> PersonaPrompt {
        PersonaPrompt::new(
            "You are {name}.\n\nContext:\n{context}",
            PersonaConfig {
                name: "Sam".into(),
                ..Default::default()
            },
        )
    }

    async fn service(
        embedding: Arc<dyn EmbeddingService>,
        chunks: &[Chunk],
    ) -> (ChatService, Arc<StubLlm>, Arc<StatsService>) {
        let store = Arc::new(InMemoryVectorStore::new());
        let rag = Arc::new(RagService::new(embedding, store, 5));
        rag.index_chunks(chunks, 10, 1).await.unwrap();

        let llm = Arc::new(StubLlm::new("yo, I row on weekends", USAGE));
        let stats = Arc::new(StatsService::new(Arc::new(InMemoryCounterStore::new())));
        let chat = ChatService::new(rag, llm.clone(), stats.clone(), persona());
        (chat, llm, stats)
    }

    fn knowledge() -> Vec<Chunk> {
        let mut chunks = vec![
            Chunk::new("hobbies_1", "I row on weekends and love rowing races."),
            Chunk::new("identity_1", "I study mathematics."),
        ];
        chunks.extend((0..6).map(|i| Chunk::new(format!("misc_{i}"), format!("Misc note {i}."))));
        chunks
    }

    #[tokio::test]
    async fn test_answer_returns_sources_in_rank_order() {
        let embedding = Arc::new(KeywordEmbedding::new(&["row", "mathematics"]));
        let (chat, _, _) = service(embedding, &knowledge()).await;

        let answer = chat.answer("Do you row?").await.unwrap();

        assert_eq!(answer.answer, "yo, I row on weekends");
        assert!(answer.sources.len() <= 5);
        assert_eq!(answer.sources[0], "hobbies_1");
    }

    #[tokio::test]
    async fn test_answer_sends_rendered_prompt_and_temperature() {
        let embedding = Arc::new(KeywordEmbedding::new(&["row", "mathematics"]));
        let (chat, llm, _) = service(embedding, &knowledge()).await;

        chat.answer("  Do you row?  ").await.unwrap();

        let (system, prompt, temperature) = llm.last_request().unwrap();
        assert!(system.starts_with("You are Sam.\n\nContext:\nI row on weekends"));
        assert_eq!(prompt, "Do you row?");
        assert_eq!(temperature, Some(0.7));
    }

    #[tokio::test]
    async fn test_context_used_is_truncated_prefix() {
        let embedding = Arc::new(KeywordEmbedding::new(&["row"]));
        let (chat, llm, _) = service(embedding, &knowledge()).await;
        let chat = chat.with_preview_chars(20);

        let answer = chat.answer("row").await.unwrap();

        let (system, _, _) = llm.last_request().unwrap();
        let context = system.trim_start_matches("You are Sam.\n\nContext:\n");
        assert_eq!(answer.context_used.chars().count(), 20);
        assert!(context.starts_with(&answer.context_used));
    }

    #[tokio::test]
    async fn test_answer_records_usage() {
        let embedding = Arc::new(KeywordEmbedding::new(&["row"]));
        let (chat, _, stats) = service(embedding, &knowledge()).await;

        chat.answer("row").await.unwrap();
        chat.answer("row again").await.unwrap();

        let snapshot = stats.snapshot().await.unwrap();
        assert_eq!(snapshot.messages, 2);
        assert_eq!(snapshot.total_tokens, 700);
    }

    #[tokio::test]
    async fn test_empty_knowledge_base_still_answers() {
        let embedding = Arc::new(KeywordEmbedding::new(&["row"]));
        let (chat, _, _) = service(embedding, &[]).await;

        let answer = chat.answer("Who are you?").await.unwrap();
        assert!(answer.sources.is_empty());
        assert_eq!(answer.context_used, "");
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected() {
        let embedding = Arc::new(KeywordEmbedding::new(&["row"]));
        let (chat, llm, _) = service(embedding, &[]).await;

        let err = chat.answer("   ").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(llm.last_request().is_none());
    }

    #[tokio::test]
    async fn test_downstream_failure_does_not_count_message() {
        let (chat, _, stats) = service(Arc::new(FailingEmbedding), &[]).await;

        let err = chat.answer("Do you row?").await.unwrap_err();
        assert!(matches!(err, DomainError::ExternalService(_)));
        assert_eq!(stats.snapshot().await.unwrap().messages, 0);
    }
}
