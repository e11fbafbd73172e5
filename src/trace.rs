//! Upstream/downstream reachability over the record collections.
//!
//! Each layer has its own expansion rule (see [`TraceEngine::traverse`]). The
//! traversal runs on an explicit stack that reproduces depth-first pre-order,
//! so results list a node's children right after the node that led to them.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::errors::{GraphError, GraphResult};
use crate::graph::LayerKind;
use crate::records::{AnalysisSample, HeatTreatment, Material, Product, TestPiece};
use crate::repository::RecordRepository;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TraceEntry {
    #[serde(rename = "type")]
    pub kind: LayerKind,
    pub id: String,
}

impl TraceEntry {
    pub fn new(kind: LayerKind, id: &str) -> Self {
        Self {
            kind,
            id: id.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Trace {
    pub upstream: Vec<TraceEntry>,
    pub downstream: Vec<TraceEntry>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Upstream,
    Downstream,
}

/// A record from any traced collection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordRef<'a> {
    Material(&'a Material),
    HeatTreatment(&'a HeatTreatment),
    Product(&'a Product),
    TestPiece(&'a TestPiece),
    AnalysisSample(&'a AnalysisSample),
}

impl<'a> RecordRef<'a> {
    pub fn kind(&self) -> LayerKind {
        match self {
            RecordRef::Material(_) => LayerKind::Material,
            RecordRef::HeatTreatment(_) => LayerKind::HeatTreatment,
            RecordRef::Product(_) => LayerKind::Product,
            RecordRef::TestPiece(_) => LayerKind::TestPiece,
            RecordRef::AnalysisSample(_) => LayerKind::AnalysisSample,
        }
    }

    pub fn id(&self) -> &'a str {
        match self {
            RecordRef::Material(r) => &r.id,
            RecordRef::HeatTreatment(r) => &r.id,
            RecordRef::Product(r) => &r.id,
            RecordRef::TestPiece(r) => &r.id,
            RecordRef::AnalysisSample(r) => &r.id,
        }
    }
}

/// id -> record lookup across the five traced collections.
///
/// Collections are indexed in layer order and the first record claiming an id
/// keeps it, so a colliding id resolves to the shallower layer.
pub struct RecordIndex<'a> {
    by_id: HashMap<&'a str, RecordRef<'a>>,
}

impl<'a> RecordIndex<'a> {
    pub fn new<R: RecordRepository + ?Sized>(repository: &'a R) -> Self {
        let records = repository
            .materials()
            .iter()
            .map(RecordRef::Material)
            .chain(repository.heat_treatments().iter().map(RecordRef::HeatTreatment))
            .chain(repository.products().iter().map(RecordRef::Product))
            .chain(repository.test_pieces().iter().map(RecordRef::TestPiece))
            .chain(repository.analysis_samples().iter().map(RecordRef::AnalysisSample));

        let mut by_id = HashMap::new();
        for record in records {
            by_id.entry(record.id()).or_insert(record);
        }
        Self { by_id }
    }

    pub fn resolve(&self, id: &str) -> Option<RecordRef<'a>> {
        self.by_id.get(id).copied()
    }

    pub fn kind_of(&self, id: &str) -> Option<LayerKind> {
        self.resolve(id).map(|record| record.kind())
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

// Work items. Emission is deferred so that checks against the visited set see
// the same state a recursive walk would at that point.
enum Step<'a> {
    Emit(LayerKind, &'a str),
    EmitUnvisited(LayerKind, &'a str),
    Expand(&'a str),
}

pub struct TraceEngine<'a, R: ?Sized> {
    repository: &'a R,
    index: RecordIndex<'a>,
}

impl<'a, R: RecordRepository + ?Sized> TraceEngine<'a, R> {
    pub fn new(repository: &'a R) -> Self {
        Self {
            repository,
            index: RecordIndex::new(repository),
        }
    }

    pub fn index(&self) -> &RecordIndex<'a> {
        &self.index
    }

    /// Upstream and downstream of `node_id`, each deduplicated by id in
    /// first-seen order. The start node never appears in its own trace.
    pub fn trace(&self, node_id: &str) -> GraphResult<Trace> {
        if self.index.resolve(node_id).is_none() {
            return Err(GraphError::NodeNotFound(node_id.to_string()));
        }

        let trace = Trace {
            upstream: dedup_entries(self.traverse(node_id, Direction::Upstream), node_id),
            downstream: dedup_entries(self.traverse(node_id, Direction::Downstream), node_id),
        };
        debug!(
            "Trace {}: {} upstream, {} downstream",
            node_id,
            trace.upstream.len(),
            trace.downstream.len()
        );
        Ok(trace)
    }

    /// Raw traversal in one direction, duplicates included.
    ///
    /// Upstream: an analysis sample leads to its test piece, a test piece to its
    /// product, a product to its material and heat treatment (both terminal).
    ///
    /// Downstream: a material leads to every product made from it, and each of
    /// those products also surfaces its heat treatment; a heat treatment does the
    /// same with materials. A product leads to its test pieces and a test piece
    /// to its analysis samples (terminal).
    ///
    /// Ids are expanded at most once, which bounds the walk on cyclic input. An
    /// unknown start id yields an empty list.
    pub fn traverse(&self, start: &str, direction: Direction) -> Vec<TraceEntry> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut entries = Vec::new();
        let mut stack = vec![Step::Expand(start)];

        while let Some(step) = stack.pop() {
            match step {
                Step::Emit(kind, id) => entries.push(TraceEntry::new(kind, id)),
                Step::EmitUnvisited(kind, id) => {
                    if !visited.contains(id) {
                        entries.push(TraceEntry::new(kind, id));
                    }
                }
                Step::Expand(id) => {
                    if !visited.insert(id) {
                        continue;
                    }
                    let Some(record) = self.index.resolve(id) else {
                        continue;
                    };
                    let children = match direction {
                        Direction::Upstream => self.upstream_steps(record),
                        Direction::Downstream => self.downstream_steps(record),
                    };
                    stack.extend(children.into_iter().rev());
                }
            }
        }

        entries
    }

    fn upstream_steps(&self, record: RecordRef<'a>) -> Vec<Step<'a>> {
        let mut steps = Vec::new();
        match record {
            RecordRef::AnalysisSample(sample) => {
                if let Some(test_piece) = sample.test_piece() {
                    steps.push(Step::Emit(LayerKind::TestPiece, test_piece));
                    steps.push(Step::Expand(test_piece));
                }
            }
            RecordRef::TestPiece(piece) => {
                if let Some(product) = piece.product() {
                    steps.push(Step::Emit(LayerKind::Product, product));
                    steps.push(Step::Expand(product));
                }
            }
            RecordRef::Product(product) => {
                if let Some(material) = product.material() {
                    steps.push(Step::Emit(LayerKind::Material, material));
                }
                if let Some(heat_treatment) = product.heat_treatment() {
                    steps.push(Step::Emit(LayerKind::HeatTreatment, heat_treatment));
                }
            }
            RecordRef::Material(_) | RecordRef::HeatTreatment(_) => {}
        }
        steps
    }

    fn downstream_steps(&self, record: RecordRef<'a>) -> Vec<Step<'a>> {
        let repository: &'a R = self.repository;
        let mut steps = Vec::new();
        match record {
            RecordRef::Material(material) => {
                for product in repository
                    .products()
                    .iter()
                    .filter(|p| p.material() == Some(material.id.as_str()))
                {
                    steps.push(Step::Emit(LayerKind::Product, &product.id));
                    if let Some(heat_treatment) = product.heat_treatment() {
                        steps.push(Step::EmitUnvisited(LayerKind::HeatTreatment, heat_treatment));
                    }
                    steps.push(Step::Expand(&product.id));
                }
            }
            RecordRef::HeatTreatment(heat_treatment) => {
                for product in repository
                    .products()
                    .iter()
                    .filter(|p| p.heat_treatment() == Some(heat_treatment.id.as_str()))
                {
                    steps.push(Step::Emit(LayerKind::Product, &product.id));
                    if let Some(material) = product.material() {
                        steps.push(Step::EmitUnvisited(LayerKind::Material, material));
                    }
                    steps.push(Step::Expand(&product.id));
                }
            }
            RecordRef::Product(product) => {
                for piece in repository
                    .test_pieces()
                    .iter()
                    .filter(|tp| tp.product() == Some(product.id.as_str()))
                {
                    steps.push(Step::Emit(LayerKind::TestPiece, &piece.id));
                    steps.push(Step::Expand(&piece.id));
                }
            }
            RecordRef::TestPiece(piece) => {
                for sample in repository
                    .analysis_samples()
                    .iter()
                    .filter(|s| s.test_piece() == Some(piece.id.as_str()))
                {
                    steps.push(Step::Emit(LayerKind::AnalysisSample, &sample.id));
                }
            }
            RecordRef::AnalysisSample(_) => {}
        }
        steps
    }
}

/// Runs a trace against `repository`.
pub fn trace<R: RecordRepository + ?Sized>(node_id: &str, repository: &R) -> GraphResult<Trace> {
    TraceEngine::new(repository).trace(node_id)
}

fn dedup_entries(entries: Vec<TraceEntry>, start: &str) -> Vec<TraceEntry> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| entry.id != start && seen.insert(entry.id.clone()))
        .collect()
}
