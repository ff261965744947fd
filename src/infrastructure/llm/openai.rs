use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::{AssistantContent, CompletionModel};
use rig::providers::openai;

use crate::domain::{ports::LlmService, Completion, DomainError, TokenUsage};

pub struct OpenAiLlm {
    client: openai::Client,
    model: String,
}

impl OpenAiLlm {
    pub fn new(client: openai::Client, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Builds a client from `OPENAI_API_KEY`.
    pub fn from_env(model: impl Into<String>) -> Self {
        Self::new(openai::Client::from_env(), model)
    }
}

#[async_trait]
impl LlmService for OpenAiLlm {
    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
        temperature: Option<f64>,
    ) -> Result<Completion, DomainError> {
        let model = self.client.completion_model(&self.model);

        let mut request = model.completion_request(prompt).preamble(system.to_string());
        if let Some(temperature) = temperature {
            request = request.temperature(temperature);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        let text = response
            .choice
            .iter()
            .filter_map(|content| match content {
                AssistantContent::Text(text) => Some(text.text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(DomainError::external("language model returned no text"));
        }

        Ok(Completion {
            text,
            usage: TokenUsage {
                prompt_tokens: response.usage.input_tokens,
                completion_tokens: response.usage.output_tokens,
                total_tokens: response.usage.total_tokens,
            },
        })
    }
}
