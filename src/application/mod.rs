//! Application layer - Use cases and orchestration.
//!
//! Services depend on domain ports (traits) rather than concrete
//! implementations, so every client handle is injected by the caller.

pub mod services;

pub use services::{
    ChatAnswer, ChatService, FineTuneService, PersonaPrompt, RagService, StatsService,
    UploadPipeline, UploadReport,
};
