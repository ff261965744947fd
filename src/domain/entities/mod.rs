mod chunk;
mod embedding;
mod message;
mod training;
mod usage;

pub use chunk::{ensure_unique_ids, join_context, Chunk, SearchResult};
pub use embedding::Embedding;
pub use message::{Message, MessageRole};
pub use training::{FineTuneJob, FineTuneStatus, QaPair, TrainingExample};
pub use usage::{counters, Completion, StatsSnapshot, TokenUsage};
