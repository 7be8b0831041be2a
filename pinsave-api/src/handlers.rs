//! API route handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use pinsave_core::types::PostMetadata;

use crate::dto::{ChainDto, HealthResponse};
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /chains
pub async fn list_chains() -> Json<Vec<ChainDto>> {
    let chains = pinsave_chain::supported_chains()
        .into_iter()
        .map(ChainDto::from)
        .collect();
    Json(chains)
}

/// GET /posts/:chain_id
///
/// One full linear scan of the chain's contract per request. Any failure in
/// enumeration or metadata resolution fails the whole request.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Path(chain_id): Path<u64>,
) -> Result<Json<Vec<PostMetadata>>> {
    let posts = state.service.list_posts(chain_id).await?;

    info!(chain_id, posts = posts.len(), "Served post listing");
    Ok(Json(posts))
}
