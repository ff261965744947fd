//! Client for the OpenAI files and fine-tuning job endpoints.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::{ports::FineTuneApi, DomainError, FineTuneJob};

#[derive(Clone)]
pub struct OpenAiFineTune {
    client: Client,
    base_url: String,
}

impl OpenAiFineTune {
    pub fn new(api_key: &str, base_url: &str) -> Result<Self, DomainError> {
        if api_key.trim().is_empty() {
            return Err(DomainError::validation("missing OpenAI API key"));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
                .map_err(|_| DomainError::validation("invalid OpenAI API key"))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DomainError::internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Reads the key from `OPENAI_API_KEY`.
    pub fn from_env(base_url: &str) -> Result<Self, DomainError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| DomainError::validation("OPENAI_API_KEY is not set"))?;
        Self::new(&api_key, base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, DomainError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(DomainError::external(format!(
                "OpenAI request failed ({status}): {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::external(format!("failed to parse OpenAI response: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct FileObject {
    id: String,
}

#[derive(Serialize)]
struct CreateJobRequest<'a> {
    training_file: &'a str,
    model: &'a str,
}

#[async_trait]
impl FineTuneApi for OpenAiFineTune {
    async fn upload_training_file(&self, path: &Path) -> Result<String, DomainError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "fine_tune.jsonl".to_string());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/jsonl")
            .map_err(|e| DomainError::internal(e.to_string()))?;
        let form = Form::new().text("purpose", "fine-tune").part("file", part);

        let response = self
            .client
            .post(self.url("files"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        let file: FileObject = Self::parse(response).await?;
        Ok(file.id)
    }

    async fn create_job(
        &self,
        training_file: &str,
        model: &str,
    ) -> Result<FineTuneJob, DomainError> {
        let response = self
            .client
            .post(self.url("fine_tuning/jobs"))
            .json(&CreateJobRequest {
                training_file,
                model,
            })
            .send()
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        Self::parse(response).await
    }

    async fn get_job(&self, job_id: &str) -> Result<FineTuneJob, DomainError> {
        let response = self
            .client
            .get(self.url(&format!("fine_tuning/jobs/{job_id}")))
            .send()
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        Self::parse(response).await
    }
}
