pub mod config;
pub mod counter;
pub mod embedding;
pub mod files;
pub mod fine_tune;
pub mod llm;
pub mod telemetry;
pub mod vector_store;

pub use config::{AppConfig, Config, PromptsConfig};
pub use counter::{create_pool, InMemoryCounterStore, RedisCounterStore, RedisPool};
pub use embedding::OpenAiEmbedding;
pub use fine_tune::OpenAiFineTune;
pub use llm::OpenAiLlm;
pub use vector_store::{InMemoryVectorStore, QdrantVectorStore};
