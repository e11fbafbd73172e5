//! Flat records for the materials-testing pipeline.
//!
//! These are the rows the record store hands out. Foreign keys are optional and
//! an empty string counts as "not set", which is how spreadsheet-sourced data
//! tends to arrive.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub steel_grade: String,
    pub maker: String,
    #[serde(default)]
    pub shape: String,
    #[serde(default)]
    pub dimension: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeatTreatment {
    pub id: String,
    pub quench_method: String,
    pub quench_temp: u32,
    pub quench_time: u32,
    #[serde(default)]
    pub quench_cool: String,
    #[serde(default)]
    pub temper_method: String,
    pub temper_temp: u32,
    #[serde(default)]
    pub temper_time: u32,
    #[serde(default)]
    pub note: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub material_id: Option<String>,
    #[serde(default)]
    pub heat_treat_id: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub note: String,
}

impl Product {
    pub fn material(&self) -> Option<&str> {
        foreign_key(&self.material_id)
    }

    pub fn heat_treatment(&self) -> Option<&str> {
        foreign_key(&self.heat_treat_id)
    }
}

/// Test procedure lookup. Not a graph layer.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: String,
    pub category: String,
    #[serde(default)]
    pub standard: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestPiece {
    pub id: String,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub process_id: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub stamp: String,
    #[serde(default)]
    pub note: String,
}

impl TestPiece {
    pub fn product(&self) -> Option<&str> {
        foreign_key(&self.product_id)
    }

    pub fn process(&self) -> Option<&str> {
        foreign_key(&self.process_id)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSample {
    pub id: String,
    #[serde(default)]
    pub test_piece_id: Option<String>,
    // Denormalised copy of the test piece's product, kept for display only.
    #[serde(default)]
    pub product_id: Option<String>,
    pub hardness: f64,
    #[serde(default)]
    pub note: String,
}

impl AnalysisSample {
    pub fn test_piece(&self) -> Option<&str> {
        foreign_key(&self.test_piece_id)
    }
}

/// Tensile measurements attached to a test piece, surfaced by node detail.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TensileTest {
    pub test_piece_id: String,
    pub tensile_strength: u32,
    pub yield_strength: u32,
    pub reduction: u32,
}

/// A test piece joined with its process and tensile result.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestPieceDetail {
    #[serde(flatten)]
    pub piece: TestPiece,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_info: Option<Process>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tensile_test: Option<TensileTest>,
}

fn foreign_key(key: &Option<String>) -> Option<&str> {
    key.as_deref().filter(|k| !k.is_empty())
}
