use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::errors::GraphError;
use crate::records::{
    AnalysisSample, HeatTreatment, Material, Process, Product, TestPiece, TestPieceDetail,
};
use crate::repository::RecordRepository;

/// The five pipeline layers, in dependency order.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum LayerKind {
    Material,
    HeatTreatment,
    Product,
    TestPiece,
    AnalysisSample,
}

impl LayerKind {
    pub const ALL: [LayerKind; 5] = [
        LayerKind::Material,
        LayerKind::HeatTreatment,
        LayerKind::Product,
        LayerKind::TestPiece,
        LayerKind::AnalysisSample,
    ];

    pub fn level(self) -> u8 {
        match self {
            LayerKind::Material => 0,
            LayerKind::HeatTreatment => 1,
            LayerKind::Product => 2,
            LayerKind::TestPiece => 3,
            LayerKind::AnalysisSample => 4,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            LayerKind::Material => "material",
            LayerKind::HeatTreatment => "heatTreatment",
            LayerKind::Product => "product",
            LayerKind::TestPiece => "testPiece",
            LayerKind::AnalysisSample => "analysisSample",
        }
    }

    // Used when the layer descriptor has no entry for this layer.
    fn fallback_color(self) -> &'static str {
        match self {
            LayerKind::Material => "#22d3ee",
            LayerKind::HeatTreatment => "#f59e0b",
            LayerKind::Product => "#10b981",
            LayerKind::TestPiece => "#a78bfa",
            LayerKind::AnalysisSample => "#f472b6",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for LayerKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerKind::ALL
            .into_iter()
            .find(|kind| kind.key() == s)
            .ok_or_else(|| GraphError::InvalidLayer(s.to_string()))
    }
}

/// Presentation descriptor for a layer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Layer {
    pub level: u8,
    pub color: String,
    pub icon: String,
    pub name: String,
}

pub type LayerMap = IndexMap<LayerKind, Layer>;

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum NodeProperties {
    Material(Material),
    HeatTreatment(HeatTreatment),
    Product(Product),
    TestPiece(TestPieceDetail),
    AnalysisSample(AnalysisSample),
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub layer_id: LayerKind,
    pub level: u8,
    pub label: String,
    pub color: String,
    pub properties: NodeProperties,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn get_node_by_id(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_layer_nodes(&self, layer: LayerKind) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.layer_id == layer).collect()
    }

    pub fn stats(&self) -> String {
        let per_layer = LayerKind::ALL
            .iter()
            .map(|kind| format!("{}={}", kind, self.get_layer_nodes(*kind).len()))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Nodes: {} ({}), Edges: {}",
            self.nodes.len(),
            per_layer,
            self.edges.len()
        )
    }

    /// Collects every structural problem instead of stopping at the first one.
    ///
    /// Reported: duplicate node ids, edges whose endpoints are not nodes, and
    /// edges that do not point to a deeper layer.
    pub fn verify_graph_integrity(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let mut levels: HashMap<&str, (u8, LayerKind)> = HashMap::new();

        for node in &self.nodes {
            if let Some((_, existing)) = levels.get(node.id.as_str()) {
                errors.push(format!(
                    "Node id {} is used by both {} and {}",
                    node.id, existing, node.layer_id
                ));
                continue;
            }
            levels.insert(node.id.as_str(), (node.level, node.layer_id));
        }

        for edge in &self.edges {
            let source = levels.get(edge.from.as_str());
            let target = levels.get(edge.to.as_str());

            if source.is_none() {
                errors.push(format!(
                    "Edge {} -> {}: source {} not found in nodes",
                    edge.from, edge.to, edge.from
                ));
            }
            if target.is_none() {
                errors.push(format!(
                    "Edge {} -> {}: target {} not found in nodes",
                    edge.from, edge.to, edge.to
                ));
            }

            if let (Some((from_level, _)), Some((to_level, _))) = (source, target) {
                if to_level <= from_level {
                    errors.push(format!(
                        "Edge {} -> {} goes from level {} to level {}",
                        edge.from, edge.to, from_level, to_level
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Borrowed view over the collections the builder reads.
#[derive(Clone, Copy, Debug)]
pub struct GraphInput<'a> {
    pub materials: &'a [Material],
    pub heat_treatments: &'a [HeatTreatment],
    pub products: &'a [Product],
    pub processes: &'a [Process],
    pub test_pieces: &'a [TestPiece],
    pub analysis_samples: &'a [AnalysisSample],
}

impl<'a> GraphInput<'a> {
    pub fn from_repository<R: RecordRepository + ?Sized>(repository: &'a R) -> Self {
        Self {
            materials: repository.materials(),
            heat_treatments: repository.heat_treatments(),
            products: repository.products(),
            processes: repository.processes(),
            test_pieces: repository.test_pieces(),
            analysis_samples: repository.analysis_samples(),
        }
    }
}

/// Builds the layered dependency graph.
///
/// Nodes come out layer by layer in input order and edges in emission order.
/// The only suppressed edge is a repeated material -> heat treatment pair.
/// Foreign keys pointing at missing records still produce edges.
pub fn build_graph(input: GraphInput<'_>, layers: &LayerMap) -> Graph {
    let color = |kind: LayerKind| {
        layers
            .get(&kind)
            .map(|layer| layer.color.clone())
            .unwrap_or_else(|| kind.fallback_color().to_string())
    };
    let node = |id: &str, kind: LayerKind, label: String, properties: NodeProperties| Node {
        id: id.to_string(),
        layer_id: kind,
        level: kind.level(),
        label,
        color: color(kind),
        properties,
    };

    let mut graph = Graph::default();

    for m in input.materials {
        graph.nodes.push(node(
            &m.id,
            LayerKind::Material,
            format!("{}\n{}", m.steel_grade, m.maker),
            NodeProperties::Material(m.clone()),
        ));
    }

    for h in input.heat_treatments {
        graph.nodes.push(node(
            &h.id,
            LayerKind::HeatTreatment,
            format!(
                "{} {}C\nTemper {}C",
                h.quench_method, h.quench_temp, h.temper_temp
            ),
            NodeProperties::HeatTreatment(h.clone()),
        ));
    }

    let mut seen_pairs: HashSet<(&str, &str)> = HashSet::new();
    for p in input.products {
        graph.nodes.push(node(
            &p.id,
            LayerKind::Product,
            format!("{}\n{}", p.id, p.created_at),
            NodeProperties::Product(p.clone()),
        ));

        match (p.material(), p.heat_treatment()) {
            (Some(material), Some(heat_treatment)) => {
                if seen_pairs.insert((material, heat_treatment)) {
                    graph.edges.push(Edge::new(material, heat_treatment));
                }
                graph.edges.push(Edge::new(heat_treatment, &p.id));
            }
            (Some(material), None) => graph.edges.push(Edge::new(material, &p.id)),
            (None, Some(heat_treatment)) => graph.edges.push(Edge::new(heat_treatment, &p.id)),
            (None, None) => debug!("Product {} has no material or heat treatment", p.id),
        }
    }

    for tp in input.test_pieces {
        let process = tp
            .process()
            .and_then(|id| input.processes.iter().find(|k| k.id == id));
        let category = process.map(|k| k.category.as_str()).unwrap_or("");

        graph.nodes.push(node(
            &tp.id,
            LayerKind::TestPiece,
            format!("{}\n{}", tp.id, category),
            NodeProperties::TestPiece(TestPieceDetail {
                piece: tp.clone(),
                process_info: process.cloned(),
                tensile_test: None,
            }),
        ));

        match tp.product() {
            Some(product) => graph.edges.push(Edge::new(product, &tp.id)),
            None => warn!("Test piece {} has no product; edge skipped", tp.id),
        }
    }

    for sample in input.analysis_samples {
        graph.nodes.push(node(
            &sample.id,
            LayerKind::AnalysisSample,
            format!("{}\nHRC {}", sample.id, sample.hardness),
            NodeProperties::AnalysisSample(sample.clone()),
        ));

        match sample.test_piece() {
            Some(test_piece) => graph.edges.push(Edge::new(test_piece, &sample.id)),
            None => warn!(
                "Analysis sample {} has no test piece; edge skipped",
                sample.id
            ),
        }
    }

    debug!("Built graph: {}", graph.stats());
    graph
}
