use anyhow::{Context, Result};
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{graph_data, health, records, trace};
use crate::graph::LayerMap;
use crate::repository::RecordRepository;
use crate::services::GraphService;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn RecordRepository>,
    pub layers: Arc<LayerMap>,
    /// Where the records came from: `sample` or `file`.
    pub mode: String,
}

impl AppState {
    pub fn new(repository: Arc<dyn RecordRepository>, layers: LayerMap, mode: &str) -> Self {
        Self {
            repository,
            layers: Arc::new(layers),
            mode: mode.to_string(),
        }
    }

    pub fn graph_service(&self) -> GraphService {
        GraphService::new(self.repository.clone(), self.layers.clone())
    }
}

pub fn create_app(state: AppState, cors_origin: Option<&str>) -> Result<Router> {
    let cors = match cors_origin {
        Some(origin) if origin != "*" => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin: {}", origin))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Graph
        .route("/nodes", get(graph_data::get_graph))
        .route("/layers", get(graph_data::get_layers))
        .route("/stats", get(graph_data::get_stats))
        // Raw collections
        .route("/materials", get(records::list_materials))
        .route("/heat-treatments", get(records::list_heat_treatments))
        .route("/products", get(records::list_products))
        .route("/test-pieces", get(records::list_test_pieces))
        .route("/analysis-samples", get(records::list_analysis_samples))
        .route("/processes", get(records::list_processes))
        // Lookup and traversal
        .route("/node/:id", get(trace::get_node))
        .route("/trace/:id", get(trace::get_trace))
        .route("/search", post(trace::search))
}
