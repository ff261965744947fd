mod chat;
mod fine_tune;
mod prompt;
mod rag;
mod stats;
mod upload;

pub use chat::{ChatAnswer, ChatService};
pub use fine_tune::{examples_to_pairs, pairs_to_examples, FineTuneService};
pub use prompt::PersonaPrompt;
pub use rag::RagService;
pub use stats::StatsService;
pub use upload::{UploadPipeline, UploadReport};

#[cfg(test)]
pub(crate) mod testing;
