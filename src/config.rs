//! Layer descriptor configuration.
//!
//! The descriptor is presentation data (colors, icons, display names) keyed by
//! layer. Levels are fixed by the pipeline ordering, so a descriptor that
//! disagrees with them is rejected rather than silently reordering the graph.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::errors::{GraphError, GraphResult};
use crate::graph::{LayerKind, LayerMap};
use crate::resources::{resource_str, LAYERS};

pub fn default_layer_map() -> Result<LayerMap> {
    parse_layer_map(resource_str(LAYERS)?)
}

/// Loads the descriptor from `path`, or the embedded default when `None`.
pub fn load_layer_map(path: Option<&Path>) -> Result<LayerMap> {
    match path {
        Some(path) => {
            info!("Loading layer descriptor from {}", path.display());
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading layer descriptor {}", path.display()))?;
            parse_layer_map(&content)
                .with_context(|| format!("parsing layer descriptor {}", path.display()))
        }
        None => default_layer_map(),
    }
}

/// Parses and validates a YAML descriptor, returning it in pipeline order.
pub fn parse_layer_map(yaml: &str) -> Result<LayerMap> {
    let layers: LayerMap = serde_yaml::from_str(yaml)?;
    validate_layer_map(&layers)?;

    Ok(LayerKind::ALL
        .iter()
        .filter_map(|kind| layers.get(kind).map(|layer| (*kind, layer.clone())))
        .collect())
}

pub fn validate_layer_map(layers: &LayerMap) -> GraphResult<()> {
    for kind in LayerKind::ALL {
        let layer = layers
            .get(&kind)
            .ok_or_else(|| GraphError::LayerNotFound(kind.key().to_string()))?;
        if layer.level != kind.level() {
            return Err(GraphError::LayerLevelMismatch {
                layer: kind.key().to_string(),
                expected: kind.level(),
                found: layer.level,
            });
        }
    }
    Ok(())
}
