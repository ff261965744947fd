use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use persona_rag::application::{RagService, UploadPipeline};
use persona_rag::infrastructure::{telemetry, AppConfig, OpenAiEmbedding, QdrantVectorStore};

#[derive(Parser, Debug)]
#[command(name = "upload", about = "Embed the knowledge-base chunk files into the vector index")]
struct UploadCli {
    /// Directory holding the chunk files (overrides `ingest.data_dir`)
    #[arg(long, env = "INGEST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Chunks per embedding request
    #[arg(long, env = "INGEST_BATCH_SIZE")]
    batch_size: Option<usize>,

    /// Embedding requests allowed in flight at once
    #[arg(long, env = "INGEST_CONCURRENCY")]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("upload=info,persona_rag=info");

    let cli = UploadCli::parse();
    let app_config = AppConfig::load()?;
    let config = &app_config.config;

    let mut ingest = config.ingest.clone();
    if let Some(dir) = cli.data_dir {
        ingest.data_dir = dir;
    }
    let batch_size = cli.batch_size.unwrap_or(ingest.batch_size);
    let concurrency = cli.concurrency.unwrap_or(ingest.concurrency);

    let vector_store = Arc::new(
        QdrantVectorStore::new(&config.vector_store, config.embedding.dimension)
            .await
            .context("failed to connect to the vector index")?,
    );
    let embedding = Arc::new(OpenAiEmbedding::from_env(&config.embedding));
    let rag = Arc::new(RagService::new(embedding, vector_store, config.rag.top_k));

    let report = UploadPipeline::new(rag, batch_size, concurrency)
        .run(&ingest.chunk_paths())
        .await
        .context("upload failed")?;

    info!(
        files = report.files,
        chunks = report.chunks,
        collection = %config.vector_store.collection,
        "upload complete"
    );
    Ok(())
}
