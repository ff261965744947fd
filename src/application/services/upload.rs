use std::path::PathBuf;
use std::sync::Arc;
use tracing::instrument;

use crate::application::services::RagService;
use crate::domain::{ensure_unique_ids, DomainError};
use crate::infrastructure::files;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadReport {
    pub files: usize,
    pub chunks: usize,
}

/// Loads the knowledge-base chunk files and pushes them into the index.
///
/// There is no checkpointing: a failed run is simply re-run, and records
/// already uploaded are replaced by id.
pub struct UploadPipeline {
    rag: Arc<RagService>,
    batch_size: usize,
    concurrency: usize,
}

impl UploadPipeline {
    pub fn new(rag: Arc<RagService>, batch_size: usize, concurrency: usize) -> Self {
        Self {
            rag,
            batch_size,
            concurrency,
        }
    }

    #[instrument(skip(self, paths), fields(files = paths.len()))]
    pub async fn run(&self, paths: &[PathBuf]) -> Result<UploadReport, DomainError> {
        let chunks = files::load_chunk_files(paths).await?;
        ensure_unique_ids(&chunks)?;
        tracing::info!(total = chunks.len(), "chunks to upload");

        let uploaded = self
            .rag
            .index_chunks(&chunks, self.batch_size, self.concurrency)
            .await?;

        Ok(UploadReport {
            files: paths.len(),
            chunks: uploaded,
        })
    }
}
