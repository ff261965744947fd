use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::DomainError;

pub const CONFIG_DIR_ENV: &str = "APP_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = "config";

/// Runtime settings plus the prompt texts, loaded from `config.yaml` and
/// `prompts.yaml` in the config directory.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub config: Config,
    pub prompts: PromptsConfig,
}

impl AppConfig {
    /// Loads from `$APP_CONFIG_DIR` (default `./config`) and applies
    /// environment overrides. Missing files fall back to defaults.
    pub fn load() -> Result<Self, DomainError> {
        let dir = std::env::var(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

        let mut app = Self::from_dir(&dir)?;
        app.config.apply_env(|key| std::env::var(key).ok());
        Ok(app)
    }

    pub fn from_dir(dir: &Path) -> Result<Self, DomainError> {
        Ok(Self {
            config: read_yaml(&dir.join("config.yaml"))?.unwrap_or_default(),
            prompts: read_yaml(&dir.join("prompts.yaml"))?.unwrap_or_default(),
        })
    }
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, DomainError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&raw)
        .map(Some)
        .map_err(|e| DomainError::validation(format!("{}: {e}", path.display())))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub vector_store: VectorStoreConfig,
    pub redis: RedisConfig,
    pub rag: RagConfig,
    pub ingest: IngestConfig,
    pub fine_tune: FineTuneConfig,
}

impl Config {
    /// Overrides connection settings and secrets from the environment.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(host) = var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("SERVER_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(url) = var("REDIS_URL") {
            self.redis.url = url;
        }
        if let Some(url) = var("QDRANT_URL") {
            self.vector_store.url = url;
        }
        if let Some(key) = var("QDRANT_API_KEY") {
            self.vector_store.api_key = Some(key);
        }
        if let Some(model) = var("MODEL_V1") {
            self.fine_tune.model_id = Some(model);
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    pub url: String,
    pub collection: String,
    pub api_key: Option<String>,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6334".to_string(),
            collection: "personal-data".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub top_k: usize,
    pub context_preview_chars: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            context_preview_chars: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub data_dir: PathBuf,
    pub chunk_files: Vec<String>,
    pub batch_size: usize,
    pub concurrency: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("RAG"),
            chunk_files: [
                "identity_chunks.json",
                "projects_chunks.json",
                "experience_chunks.json",
                "hobbies_chunks.json",
                "project_details_chunks.json",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            batch_size: 32,
            concurrency: 4,
        }
    }
}

impl IngestConfig {
    pub fn chunk_paths(&self) -> Vec<PathBuf> {
        self.chunk_files
            .iter()
            .map(|name| self.data_dir.join(name))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FineTuneConfig {
    pub api_base: String,
    pub base_model: String,
    pub training_data: PathBuf,
    pub training_file: PathBuf,
    pub job_id_file: PathBuf,
    pub poll_interval_seconds: u64,
    pub model_id: Option<String>,
}

impl Default for FineTuneConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            base_model: "gpt-4.1-mini-2025-04-14".to_string(),
            training_data: PathBuf::from("data/qa_data.json"),
            training_file: PathBuf::from("data/fine_tune.jsonl"),
            job_id_file: PathBuf::from("data/job_id.txt"),
            poll_interval_seconds: 30,
            model_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub persona: PersonaConfig,
    pub chat: ChatPromptConfig,
    pub smoke_test: SmokeTestPromptConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    pub name: String,
    pub description: String,
    pub constraints: Vec<String>,
    pub style: Vec<String>,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: "the site owner".to_string(),
            description: "the person this website belongs to".to_string(),
            constraints: vec![
                "Do not invent degrees, work experience, or projects".to_string(),
                "If you don't know something, say so".to_string(),
            ],
            style: vec![
                "Be conversational and genuine, not formal or robotic".to_string(),
                "Keep responses flowing and natural, not list-heavy".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatPromptConfig {
    pub system: String,
}

impl Default for ChatPromptConfig {
    fn default() -> Self {
        Self {
            system: "You are a personal assistant representing {persona}.\n\n\
                     Use the following information to answer questions about {name} \
                     accurately and naturally. Speak in first person as if you are {name}.\n\n\
                     IMPORTANT CONSTRAINTS:\n{constraints}\n\n\
                     TONE AND STYLE:\n{style}\n\n\
                     Context about {name}:\n{context}\n\n\
                     Answer naturally and conversationally, as {name} would speak."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmokeTestPromptConfig {
    pub system: String,
    pub user: String,
}

impl Default for SmokeTestPromptConfig {
    fn default() -> Self {
        Self {
            system: "Answer casually and honestly, like on your personal website. \
                     Do not invent a different name, school, or background."
                .to_string(),
            user: "Hi, what's your name? Tell me a little bit about yourself.".to_string(),
        }
    }
}
