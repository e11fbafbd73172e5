//! Read-only access to the record collections.
//!
//! The graph builder and trace engine only ever see [`RecordRepository`]. The
//! in-memory [`Dataset`] is the only implementation shipped; a database-backed
//! store would load a snapshot per request and hand out the same slices.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::errors::{DataSetError, DataSetResult};
use crate::records::{
    AnalysisSample, HeatTreatment, Material, Process, Product, TensileTest, TestPiece,
};
use crate::resources::{resource_str, SAMPLE_DATA};

pub trait RecordRepository: Send + Sync {
    fn materials(&self) -> &[Material];
    fn heat_treatments(&self) -> &[HeatTreatment];
    fn products(&self) -> &[Product];
    fn processes(&self) -> &[Process];
    fn test_pieces(&self) -> &[TestPiece];
    fn analysis_samples(&self) -> &[AnalysisSample];
    fn tensile_tests(&self) -> &[TensileTest];
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub heat_treatments: Vec<HeatTreatment>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub processes: Vec<Process>,
    #[serde(default)]
    pub test_pieces: Vec<TestPiece>,
    #[serde(default)]
    pub analysis_samples: Vec<AnalysisSample>,
    #[serde(default)]
    pub tensile_tests: Vec<TensileTest>,
}

impl Dataset {
    /// The dataset bundled with the binary.
    pub fn sample() -> DataSetResult<Self> {
        Ok(serde_yaml::from_str(resource_str(SAMPLE_DATA)?)?)
    }

    /// Loads a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> DataSetResult<Self> {
        if !path.exists() {
            return Err(DataSetError::FileNotFound(path.display().to_string()));
        }

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let content = fs::read_to_string(path)?;

        let dataset: Dataset = match extension.as_str() {
            "json" => serde_json::from_str(&content)?,
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            other => return Err(DataSetError::UnsupportedFormat(other.to_string())),
        };

        info!(
            "Loaded {} from {}",
            dataset.summary(),
            path.display()
        );
        Ok(dataset)
    }

    pub fn to_yaml(&self) -> DataSetResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} materials, {} heat treatments, {} products, {} test pieces, {} analysis samples",
            self.materials.len(),
            self.heat_treatments.len(),
            self.products.len(),
            self.test_pieces.len(),
            self.analysis_samples.len()
        )
    }
}

impl RecordRepository for Dataset {
    fn materials(&self) -> &[Material] {
        &self.materials
    }

    fn heat_treatments(&self) -> &[HeatTreatment] {
        &self.heat_treatments
    }

    fn products(&self) -> &[Product] {
        &self.products
    }

    fn processes(&self) -> &[Process] {
        &self.processes
    }

    fn test_pieces(&self) -> &[TestPiece] {
        &self.test_pieces
    }

    fn analysis_samples(&self) -> &[AnalysisSample] {
        &self.analysis_samples
    }

    fn tensile_tests(&self) -> &[TensileTest] {
        &self.tensile_tests
    }
}
