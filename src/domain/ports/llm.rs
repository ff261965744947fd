use crate::domain::{errors::DomainError, Completion};
use async_trait::async_trait;

#[async_trait]
pub trait LlmService: Send + Sync {
    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
        temperature: Option<f64>,
    ) -> Result<Completion, DomainError>;
}
