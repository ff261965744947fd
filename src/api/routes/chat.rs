use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::application::ChatAnswer;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: String,
}

/// Either the answer or a single error message; every failure is reported
/// with status 200.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Answer(ChatAnswer),
    Error { error: String },
}

pub async fn chat_handler(
    State(state): State<AppState>,
    request: Result<Json<ChatRequest>, JsonRejection>,
) -> Json<ChatResponse> {
    let request = match request {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected chat request body");
            return Json(ChatResponse::Error {
                error: rejection.body_text(),
            });
        }
    };

    match state.chat.answer(&request.question).await {
        Ok(answer) => Json(ChatResponse::Answer(answer)),
        Err(e) => {
            tracing::error!(error = %e, "Chat failed");
            Json(ChatResponse::Error {
                error: e.to_string(),
            })
        }
    }
}
