use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::domain::{
    ports::{FineTuneApi, LlmService},
    DomainError, FineTuneJob, QaPair, TrainingExample,
};
use crate::infrastructure::files;

pub fn pairs_to_examples(pairs: &[QaPair]) -> Vec<TrainingExample> {
    pairs.iter().map(TrainingExample::from).collect()
}

pub fn examples_to_pairs(examples: Vec<TrainingExample>) -> Result<Vec<QaPair>, DomainError> {
    examples.into_iter().map(QaPair::try_from).collect()
}

/// Drives the fine-tuning workflow: dataset conversion, upload, job
/// submission and polling, and a one-shot check of the resulting model.
pub struct FineTuneService {
    api: Arc<dyn FineTuneApi>,
}

impl FineTuneService {
    pub fn new(api: Arc<dyn FineTuneApi>) -> Self {
        Self { api }
    }

    /// Converts a JSON array of Q/A pairs into a JSONL training file and
    /// returns the number of examples written.
    #[instrument]
    pub async fn prepare(input: &Path, output: &Path) -> Result<usize, DomainError> {
        let pairs: Vec<QaPair> = files::read_json_array(input).await?;
        let examples = pairs_to_examples(&pairs);
        files::write_jsonl(output, &examples).await?;
        Ok(examples.len())
    }

    /// Reads a JSONL training file back into Q/A pairs.
    pub async fn load_training_file(path: &Path) -> Result<Vec<QaPair>, DomainError> {
        let examples: Vec<TrainingExample> = files::read_jsonl(path).await?;
        examples_to_pairs(examples)
    }

    /// Uploads the training file, starts a job on `base_model` and writes the
    /// job id to `job_id_file`.
    #[instrument(skip(self))]
    pub async fn submit(
        &self,
        training_file: &Path,
        base_model: &str,
        job_id_file: &Path,
    ) -> Result<FineTuneJob, DomainError> {
        let file_id = self.api.upload_training_file(training_file).await?;
        tracing::info!(file_id = %file_id, "uploaded training file");

        let job = self.api.create_job(&file_id, base_model).await?;
        tracing::info!(job_id = %job.id, status = ?job.status, "created fine-tuning job");

        files::write_job_id(job_id_file, &job.id).await?;
        Ok(job)
    }

    /// Polls until the job reaches a terminal status and returns it as-is;
    /// a failed or cancelled job is not an error here.
    #[instrument(skip(self))]
    pub async fn wait_for_completion(
        &self,
        job_id: &str,
        poll_interval: Duration,
    ) -> Result<FineTuneJob, DomainError> {
        let mut last_status = None;
        loop {
            let job = self.api.get_job(job_id).await?;
            if last_status != Some(job.status) {
                tracing::info!(job_id, status = ?job.status, "fine-tuning job status");
                last_status = Some(job.status);
            }

            if job.status.is_terminal() {
                return Ok(job);
            }

            tokio::time::sleep(poll_interval).await;
        }
    }

    /// Sends one prompt to a (fine-tuned) model and returns its reply.
    pub async fn smoke_test(
        llm: &dyn LlmService,
        system: &str,
        prompt: &str,
    ) -> Result<String, DomainError> {
        let completion = llm.complete_with_system(system, prompt, None).await?;
        Ok(completion.text)
    }
}
