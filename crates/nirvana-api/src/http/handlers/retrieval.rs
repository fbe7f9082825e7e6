//! Retrieval store endpoints.
//!
//! POST /retrieval/documents - Add a document with optional metadata.
//! POST /retrieval/query     - Two-tier similarity search.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nirvana_types::retrieval::{Document, Metadata};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddDocumentRequest {
    pub document: Document,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddDocumentResponse {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub documents: Vec<Document>,
}

/// POST /retrieval/documents - Responds once the document is queryable.
pub async fn add_document(
    State(state): State<AppState>,
    Json(request): Json<AddDocumentRequest>,
) -> Result<(StatusCode, Json<AddDocumentResponse>), AppError> {
    let id = state
        .retrieval
        .add(request.document, request.metadata)
        .await?;
    Ok((StatusCode::CREATED, Json(AddDocumentResponse { id })))
}

/// POST /retrieval/query - Up to `result_limit` documents, best first.
pub async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, AppError> {
    let documents = state
        .retrieval
        .query(&request.text, &request.metadata)
        .await?;
    Ok(Json(QueryResponse { documents }))
}
