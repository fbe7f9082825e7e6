//! Journal-entry insights endpoint.
//!
//! POST /entry-insights - Stateless transform; the body is the raw reply
//! encoded as a JSON string.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InsightsRequest {
    pub message: String,
}

pub async fn entry_insights(
    State(state): State<AppState>,
    Json(request): Json<InsightsRequest>,
) -> Result<Json<String>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message must not be blank".to_string()));
    }

    let insights = state.insights.generate(&request.message).await?;
    Ok(Json(insights))
}
