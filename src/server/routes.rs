//! API route handlers

use axum::{extract::State, routing::get, routing::post, Json, Router};
use serde::Serialize;

use crate::error::Result;
use crate::types::{DocCategory, QueryRequest, QueryResponse};

use super::state::AppState;

/// Routes mounted under /api
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/info", get(info))
        .route("/query", post(query))
}

#[derive(Serialize)]
struct InfoResponse {
    model: String,
    embedding_model: String,
    chunks_indexed: usize,
    categories: Vec<DocCategory>,
    top_n: usize,
    semantic_weight: f32,
}

/// GET /api/info - corpus and model summary
async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    let engine = state.engine();
    let config = engine.config();
    Json(InfoResponse {
        model: engine.model().to_string(),
        embedding_model: config.embeddings.model.clone(),
        chunks_indexed: engine.corpus_len(),
        categories: DocCategory::ALL.to_vec(),
        top_n: config.retrieval.top_n,
        semantic_weight: config.retrieval.semantic_weight,
    })
}

/// POST /api/query - answer a question against the corpus
async fn query(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>> {
    tracing::info!("Query: \"{}\"", request.question);
    let response = state.engine().ask(&request).await?;
    Ok(Json(response))
}
