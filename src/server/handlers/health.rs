use axum::{extract::State, response::Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::server::app::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "labtrace",
        "version": env!("CARGO_PKG_VERSION"),
        "mode": state.mode,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
