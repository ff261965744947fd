use persona_rag::api::{create_router, AppState};
use persona_rag::application::{ChatService, PersonaPrompt, RagService, StatsService};
use persona_rag::infrastructure::{
    create_pool, telemetry, AppConfig, OpenAiEmbedding, OpenAiLlm, QdrantVectorStore,
    RedisCounterStore,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init("api=debug,persona_rag=debug,tower_http=debug");

    let app_config = AppConfig::load()?;
    let config = &app_config.config;

    let redis_pool = create_pool(&config.redis.url)?;
    let stats = Arc::new(StatsService::new(Arc::new(RedisCounterStore::new(
        redis_pool,
    ))));
    info!("Redis pool initialized");

    let vector_store =
        Arc::new(QdrantVectorStore::new(&config.vector_store, config.embedding.dimension).await?);
    info!(collection = %config.vector_store.collection, "Qdrant connected");

    let embedding = Arc::new(OpenAiEmbedding::from_env(&config.embedding));
    let rag = Arc::new(RagService::new(embedding, vector_store, config.rag.top_k));
    let llm = Arc::new(OpenAiLlm::from_env(&config.llm.model));

    let chat = ChatService::new(
        rag,
        llm,
        stats.clone(),
        PersonaPrompt::from_config(&app_config.prompts),
    )
    .with_temperature(config.llm.temperature)
    .with_preview_chars(config.rag.context_preview_chars);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let app = create_router(AppState::new(Arc::new(chat), stats, app_config));

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
