//! Chat endpoint.
//!
//! POST /chat - One conversational turn, optionally continuing a session.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Continue this session; a new one is started when absent.
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: Uuid,
}

/// POST /chat - Append the message to the session and return the reply.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be blank".to_string()));
    }

    let turn = state.chat.send(request.session_id, &request.message).await?;

    Ok(Json(ChatResponse {
        response: turn.reply,
        session_id: turn.session_id,
    }))
}
