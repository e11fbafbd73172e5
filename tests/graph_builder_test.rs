//! Graph building over the bundled sample dataset.

use anyhow::Result;
use labtrace::config::{default_layer_map, load_layer_map};
use labtrace::graph::{build_graph, Graph, GraphInput, LayerKind};
use labtrace::repository::Dataset;
use std::collections::HashSet;
use std::io::Write;
use tempfile::NamedTempFile;

fn sample_graph() -> Result<Graph> {
    let dataset = Dataset::sample()?;
    Ok(build_graph(
        GraphInput::from_repository(&dataset),
        &default_layer_map()?,
    ))
}

#[test]
fn test_every_edge_points_to_a_deeper_layer() -> Result<()> {
    let graph = sample_graph()?;

    for edge in &graph.edges {
        let from = graph.get_node_by_id(&edge.from).map(|n| n.level);
        let to = graph.get_node_by_id(&edge.to).map(|n| n.level);
        match (from, to) {
            (Some(from), Some(to)) => assert!(from < to, "{:?}", edge),
            _ => panic!("edge {:?} has a missing endpoint", edge),
        }
    }
    assert!(graph.verify_graph_integrity().is_ok());

    Ok(())
}

#[test]
fn test_nodes_are_grouped_by_layer() -> Result<()> {
    let graph = sample_graph()?;

    let levels: Vec<u8> = graph.nodes.iter().map(|n| n.level).collect();
    assert!(levels.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(graph.get_layer_nodes(LayerKind::Material).len(), 5);
    assert_eq!(graph.get_layer_nodes(LayerKind::HeatTreatment).len(), 8);
    assert_eq!(graph.get_layer_nodes(LayerKind::Product).len(), 13);
    assert_eq!(graph.get_layer_nodes(LayerKind::TestPiece).len(), 15);
    assert_eq!(graph.get_layer_nodes(LayerKind::AnalysisSample).len(), 5);

    Ok(())
}

#[test]
fn test_material_heat_treatment_pairs_are_unique() -> Result<()> {
    let graph = sample_graph()?;

    let pairs: Vec<_> = graph
        .edges
        .iter()
        .filter(|e| e.from.starts_with('M') && e.to.starts_with('H'))
        .collect();
    let unique: HashSet<_> = pairs.iter().collect();
    assert_eq!(pairs.len(), unique.len());
    assert_eq!(graph.edges.len(), 46);

    Ok(())
}

#[test]
fn test_build_is_idempotent() -> Result<()> {
    assert_eq!(sample_graph()?, sample_graph()?);
    Ok(())
}

#[test]
fn test_custom_layer_colors_flow_into_nodes() -> Result<()> {
    let mut file = NamedTempFile::new()?;
    let mut yaml = String::new();
    for (kind, color) in [
        ("material", "#000001"),
        ("heatTreatment", "#000002"),
        ("product", "#000003"),
        ("testPiece", "#000004"),
        ("analysisSample", "#000005"),
    ] {
        let level = kind.parse::<LayerKind>()?.level();
        yaml.push_str(&format!(
            "{}: {{ level: {}, color: \"{}\", icon: X, name: {} }}\n",
            kind, level, color, kind
        ));
    }
    file.write_all(yaml.as_bytes())?;

    let layers = load_layer_map(Some(file.path()))?;
    let dataset = Dataset::sample()?;
    let graph = build_graph(GraphInput::from_repository(&dataset), &layers);

    assert_eq!(graph.get_node_by_id("M001").map(|n| n.color.as_str()), Some("#000001"));
    assert_eq!(graph.get_node_by_id("AS005").map(|n| n.color.as_str()), Some("#000005"));

    Ok(())
}
