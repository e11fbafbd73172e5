pub mod app;
pub mod handlers;

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::graph::{build_graph, GraphInput, LayerMap};
use crate::repository::RecordRepository;

pub async fn start_server(
    port: u16,
    repository: Arc<dyn RecordRepository>,
    layers: LayerMap,
    mode: &str,
    cors_origin: Option<&str>,
) -> Result<()> {
    let graph = build_graph(GraphInput::from_repository(repository.as_ref()), &layers);
    match graph.verify_graph_integrity() {
        Ok(()) => info!("Graph loaded: {}", graph.stats()),
        Err(violations) => {
            for violation in &violations {
                warn!("Integrity: {}", violation);
            }
            warn!("Serving graph with {} integrity violations", violations.len());
        }
    }

    let state = app::AppState::new(repository, layers, mode);
    let app = app::create_app(state, cors_origin)?;

    log_routes();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server running on http://0.0.0.0:{} ({} data)", port, mode);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("API Endpoints:");
    info!("  /health                     - Health check");
    info!("  /api/nodes                  - Graph nodes, edges and layers");
    info!("  /api/layers                 - Layer descriptor");
    info!("  /api/stats                  - Record counts");
    info!("  /api/materials etc.         - Raw record collections");
    info!("  /api/node/:id               - Record detail");
    info!("  /api/trace/:id              - Upstream/downstream trace");
    info!("  /api/search                 - Filter materials or heat treatments (POST)");
}
