use std::sync::Arc;

use crate::application::{ChatService, StatsService};
use crate::infrastructure::AppConfig;

/// Service handles shared by every request. Everything here is constructed
/// by the caller and injected, so tests can swap in in-memory adapters.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    pub stats: Arc<StatsService>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(chat: Arc<ChatService>, stats: Arc<StatsService>, config: AppConfig) -> Self {
        Self {
            chat,
            stats,
            config: Arc::new(config),
        }
    }
}
