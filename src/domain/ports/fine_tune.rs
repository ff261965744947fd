use crate::domain::{errors::DomainError, FineTuneJob};
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait FineTuneApi: Send + Sync {
    /// Uploads a JSONL training file and returns the remote file id.
    async fn upload_training_file(&self, path: &Path) -> Result<String, DomainError>;
    async fn create_job(&self, training_file: &str, model: &str)
        -> Result<FineTuneJob, DomainError>;
    async fn get_job(&self, job_id: &str) -> Result<FineTuneJob, DomainError>;
}
