mod counter_store;
mod embedding;
mod fine_tune;
mod llm;
mod vector_store;

pub use counter_store::CounterStore;
pub use embedding::EmbeddingService;
pub use fine_tune::FineTuneApi;
pub use llm::LlmService;
pub use vector_store::VectorStore;
