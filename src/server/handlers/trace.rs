use axum::{
    extract::{Path, State},
    response::Json,
};
use tracing::{error, info};

use super::ApiError;
use crate::graph::NodeProperties;
use crate::server::app::AppState;
use crate::services::{NodeDetail, SearchRequest};
use crate::trace::Trace;

pub async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NodeDetail>, ApiError> {
    info!("Node detail requested: {}", id);
    state
        .graph_service()
        .node_detail(&id)
        .map(Json)
        .map_err(|e| {
            error!("Node lookup failed: {}", e);
            ApiError::from(e)
        })
}

pub async fn get_trace(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Trace>, ApiError> {
    info!("Trace requested: {}", id);
    let trace = state.graph_service().trace(&id).map_err(|e| {
        error!("Trace failed: {}", e);
        ApiError::from(e)
    })?;
    info!(
        "Trace {}: {} upstream, {} downstream",
        id,
        trace.upstream.len(),
        trace.downstream.len()
    );
    Ok(Json(trace))
}

pub async fn search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Json<Vec<NodeProperties>> {
    let results = state.graph_service().search(&request);
    info!("Search on {}: {} results", request.layer, results.len());
    Json(results)
}
