use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::errors::{GraphError, GraphResult};
use crate::graph::{build_graph, Edge, GraphInput, LayerKind, LayerMap, Node, NodeProperties};
use crate::records::TestPieceDetail;
use crate::repository::RecordRepository;
use crate::trace::{RecordIndex, RecordRef, Trace, TraceEngine};

/// Request-scoped facade over the record store and the layer descriptor.
#[derive(Clone)]
pub struct GraphService {
    repository: Arc<dyn RecordRepository>,
    layers: Arc<LayerMap>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GraphData {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub layers: LayerMap,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub materials: usize,
    pub heat_treatments: usize,
    pub products: usize,
    pub test_pieces: usize,
    pub analysis_samples: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeDetail {
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub data: NodeProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    pub steel_grade: Option<String>,
    pub maker: Option<String>,
    pub method: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub layer: String,
    #[serde(default)]
    pub filters: SearchFilters,
}

impl GraphService {
    pub fn new(repository: Arc<dyn RecordRepository>, layers: Arc<LayerMap>) -> Self {
        Self { repository, layers }
    }

    pub fn layers(&self) -> &LayerMap {
        &self.layers
    }

    pub fn graph_data(&self) -> GraphData {
        let graph = build_graph(
            GraphInput::from_repository(self.repository.as_ref()),
            &self.layers,
        );
        GraphData {
            nodes: graph.nodes,
            edges: graph.edges,
            layers: self.layers.as_ref().clone(),
        }
    }

    pub fn stats(&self) -> GraphStats {
        let repository = self.repository.as_ref();
        GraphStats {
            materials: repository.materials().len(),
            heat_treatments: repository.heat_treatments().len(),
            products: repository.products().len(),
            test_pieces: repository.test_pieces().len(),
            analysis_samples: repository.analysis_samples().len(),
        }
    }

    pub fn trace(&self, node_id: &str) -> GraphResult<Trace> {
        TraceEngine::new(self.repository.as_ref()).trace(node_id)
    }

    /// The record behind `node_id`. Test pieces are joined with their process
    /// and tensile result.
    pub fn node_detail(&self, node_id: &str) -> GraphResult<NodeDetail> {
        let repository = self.repository.as_ref();
        let index = RecordIndex::new(repository);
        let record = index
            .resolve(node_id)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))?;

        let data = match record {
            RecordRef::Material(m) => NodeProperties::Material(m.clone()),
            RecordRef::HeatTreatment(h) => NodeProperties::HeatTreatment(h.clone()),
            RecordRef::Product(p) => NodeProperties::Product(p.clone()),
            RecordRef::TestPiece(tp) => {
                let process_info = tp
                    .process()
                    .and_then(|id| repository.processes().iter().find(|k| k.id == id))
                    .cloned();
                let tensile_test = repository
                    .tensile_tests()
                    .iter()
                    .find(|t| t.test_piece_id == tp.id)
                    .cloned();
                NodeProperties::TestPiece(TestPieceDetail {
                    piece: tp.clone(),
                    process_info,
                    tensile_test,
                })
            }
            RecordRef::AnalysisSample(s) => NodeProperties::AnalysisSample(s.clone()),
        };

        Ok(NodeDetail {
            kind: record.kind(),
            data,
        })
    }

    /// Filters one layer's records. Only materials (grade/maker substring) and
    /// heat treatments (exact quench method) are searchable; any other layer
    /// yields no results.
    pub fn search(&self, request: &SearchRequest) -> Vec<NodeProperties> {
        let repository = self.repository.as_ref();
        let filters = &request.filters;

        match request.layer.parse::<LayerKind>() {
            Ok(LayerKind::Material) => repository
                .materials()
                .iter()
                .filter(|m| wanted(&filters.steel_grade).map_or(true, |g| m.steel_grade.contains(g)))
                .filter(|m| wanted(&filters.maker).map_or(true, |mk| m.maker.contains(mk)))
                .cloned()
                .map(NodeProperties::Material)
                .collect(),
            Ok(LayerKind::HeatTreatment) => repository
                .heat_treatments()
                .iter()
                .filter(|h| wanted(&filters.method).map_or(true, |method| h.quench_method == method))
                .cloned()
                .map(NodeProperties::HeatTreatment)
                .collect(),
            Ok(layer) => {
                debug!("Search on layer {} is not supported", layer);
                Vec::new()
            }
            Err(e) => {
                debug!("Search on unknown layer: {}", e);
                Vec::new()
            }
        }
    }
}

fn wanted(filter: &Option<String>) -> Option<&str> {
    filter.as_deref().filter(|v| !v.is_empty())
}
