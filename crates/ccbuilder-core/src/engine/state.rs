use serde::{Deserialize, Serialize};

/// A realized bundle model: what a build returns and what a promoted cache
/// record stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
    /// PDB text of the packed bundle.
    pub structure_encoding: String,
    pub mean_residues_per_turn: f64,
    pub total_energy: f64,
}
