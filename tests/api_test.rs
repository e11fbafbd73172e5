//! API integration tests
//!
//! Exercises the REST surface against the bundled sample dataset.

#![cfg(feature = "server")]

use anyhow::Result;
use axum::http::StatusCode;
use axum_test::TestServer;
use labtrace::config::default_layer_map;
use labtrace::repository::Dataset;
use labtrace::server::app::{create_app, AppState};
use serde_json::{json, Value};
use std::sync::Arc;

fn setup_test_server() -> Result<TestServer> {
    let state = AppState::new(
        Arc::new(Dataset::sample()?),
        default_layer_map()?,
        "sample",
    );
    let app = create_app(state, Some("*"))?;
    let server = TestServer::new(app)?;

    Ok(server)
}

fn ids(entries: &Value) -> Vec<String> {
    entries
        .as_array()
        .map(|list| {
            list.iter()
                .filter_map(|e| e["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[tokio::test]
async fn test_health_endpoint() -> Result<()> {
    let server = setup_test_server()?;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "labtrace");
    assert_eq!(body["mode"], "sample");
    assert!(body["version"].is_string());
    assert!(body["timestamp"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_nodes_endpoint() -> Result<()> {
    let server = setup_test_server()?;

    let response = server.get("/api/nodes").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["nodes"].as_array().map(Vec::len), Some(46));
    assert_eq!(body["edges"].as_array().map(Vec::len), Some(46));
    assert_eq!(body["layers"]["material"]["level"], 0);
    assert_eq!(body["layers"]["analysisSample"]["level"], 4);

    let first = &body["nodes"][0];
    assert_eq!(first["id"], "M001");
    assert_eq!(first["layerId"], "material");
    assert_eq!(first["label"], "SCM435\nA Steel");

    Ok(())
}

#[tokio::test]
async fn test_layers_and_stats() -> Result<()> {
    let server = setup_test_server()?;

    // Layer order is preserved in the raw body.
    let text = server.get("/api/layers").await.text();
    let positions: Vec<usize> = ["\"material\"", "\"heatTreatment\"", "\"product\"", "\"testPiece\"", "\"analysisSample\""]
        .iter()
        .filter_map(|key| text.find(key))
        .collect();
    assert_eq!(positions.len(), 5);
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let stats: Value = server.get("/api/stats").await.json();
    assert_eq!(
        stats,
        json!({
            "materials": 5,
            "heatTreatments": 8,
            "products": 13,
            "testPieces": 15,
            "analysisSamples": 5
        })
    );

    Ok(())
}

#[tokio::test]
async fn test_collection_endpoints() -> Result<()> {
    let server = setup_test_server()?;

    for (path, count) in [
        ("/api/materials", 5),
        ("/api/heat-treatments", 8),
        ("/api/products", 13),
        ("/api/test-pieces", 15),
        ("/api/analysis-samples", 5),
        ("/api/processes", 4),
    ] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::OK, "{}", path);
        let body: Value = response.json();
        assert_eq!(body.as_array().map(Vec::len), Some(count), "{}", path);
    }

    Ok(())
}

#[tokio::test]
async fn test_trace_material_downstream() -> Result<()> {
    let server = setup_test_server()?;

    let response = server.get("/api/trace/M001").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["upstream"], json!([]));
    assert_eq!(body["downstream"][0], json!({"type": "product", "id": "Z001"}));
    assert_eq!(body["downstream"][1], json!({"type": "heatTreatment", "id": "H001"}));

    let downstream = ids(&body["downstream"]);
    assert_eq!(
        &downstream[..6],
        &["Z001", "H001", "TP001", "AS001", "TP002", "Z002"]
    );
    assert_eq!(
        &downstream[downstream.len() - 4..],
        &["Z010", "H004", "TP014", "TP015"]
    );

    Ok(())
}

#[tokio::test]
async fn test_trace_analysis_sample_upstream() -> Result<()> {
    let server = setup_test_server()?;

    let body: Value = server.get("/api/trace/AS001").await.json();
    assert_eq!(
        body["upstream"],
        json!([
            {"type": "testPiece", "id": "TP001"},
            {"type": "product", "id": "Z001"},
            {"type": "material", "id": "M001"},
            {"type": "heatTreatment", "id": "H001"}
        ])
    );
    assert_eq!(body["downstream"], json!([]));

    Ok(())
}

#[tokio::test]
async fn test_trace_unknown_id_is_404() -> Result<()> {
    let server = setup_test_server()?;

    let response = server.get("/api/trace/NOPE").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["error"].as_str().unwrap_or_default().contains("NOPE"));

    Ok(())
}

#[tokio::test]
async fn test_node_detail() -> Result<()> {
    let server = setup_test_server()?;

    let response = server.get("/api/node/TP001").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["type"], "testPiece");
    assert_eq!(body["data"]["productId"], "Z001");
    assert_eq!(body["data"]["processInfo"]["category"], "Tensile");
    assert_eq!(body["data"]["tensileTest"]["yieldStrength"], 1650);

    let body: Value = server.get("/api/node/H004").await.json();
    assert_eq!(body["type"], "heatTreatment");
    assert_eq!(body["data"]["note"], "IH Temper");

    let response = server.get("/api/node/NOPE").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_search() -> Result<()> {
    let server = setup_test_server()?;

    let response = server
        .post("/api/search")
        .json(&json!({"layer": "material", "filters": {"steelGrade": "SCM4", "maker": "A Steel"}}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(ids(&body), vec!["M001", "M005"]);

    let body: Value = server
        .post("/api/search")
        .json(&json!({"layer": "heatTreatment", "filters": {"method": "IH"}}))
        .await
        .json();
    assert_eq!(body.as_array().map(Vec::len), Some(3));

    let body: Value = server
        .post("/api/search")
        .json(&json!({"layer": "product", "filters": {}}))
        .await
        .json();
    assert_eq!(body, json!([]));

    Ok(())
}

#[tokio::test]
async fn test_invalid_cors_origin_is_rejected() -> Result<()> {
    let state = AppState::new(
        Arc::new(Dataset::sample()?),
        default_layer_map()?,
        "sample",
    );
    assert!(create_app(state, Some("bad\norigin")).is_err());

    Ok(())
}
