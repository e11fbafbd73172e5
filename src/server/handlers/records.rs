use axum::{extract::State, response::Json};

use crate::records::{AnalysisSample, HeatTreatment, Material, Process, Product, TestPiece};
use crate::server::app::AppState;

pub async fn list_materials(State(state): State<AppState>) -> Json<Vec<Material>> {
    Json(state.repository.materials().to_vec())
}

pub async fn list_heat_treatments(State(state): State<AppState>) -> Json<Vec<HeatTreatment>> {
    Json(state.repository.heat_treatments().to_vec())
}

pub async fn list_products(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.repository.products().to_vec())
}

pub async fn list_test_pieces(State(state): State<AppState>) -> Json<Vec<TestPiece>> {
    Json(state.repository.test_pieces().to_vec())
}

pub async fn list_analysis_samples(State(state): State<AppState>) -> Json<Vec<AnalysisSample>> {
    Json(state.repository.analysis_samples().to_vec())
}

pub async fn list_processes(State(state): State<AppState>) -> Json<Vec<Process>> {
    Json(state.repository.processes().to_vec())
}
