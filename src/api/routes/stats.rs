use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::api::state::AppState;
use crate::domain::StatsSnapshot;

#[derive(Debug, Serialize)]
pub struct VisitResponse {
    pub conversations: u64,
}

pub async fn register_visit(
    State(state): State<AppState>,
) -> Result<Json<VisitResponse>, StatusCode> {
    let conversations = state.stats.register_visit().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to register visit");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(VisitResponse { conversations }))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsSnapshot>, StatusCode> {
    let snapshot = state.stats.snapshot().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to read stats");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(snapshot))
}
