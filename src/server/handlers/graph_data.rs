use axum::{extract::State, response::Json};
use tracing::info;

use crate::graph::LayerMap;
use crate::server::app::AppState;
use crate::services::{GraphData, GraphStats};

pub async fn get_graph(State(state): State<AppState>) -> Json<GraphData> {
    let data = state.graph_service().graph_data();
    info!("Serving graph: {} nodes, {} edges", data.nodes.len(), data.edges.len());
    Json(data)
}

pub async fn get_layers(State(state): State<AppState>) -> Json<LayerMap> {
    Json(state.layers.as_ref().clone())
}

pub async fn get_stats(State(state): State<AppState>) -> Json<GraphStats> {
    Json(state.graph_service().stats())
}
