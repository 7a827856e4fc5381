use super::coords::Coordinate;
use serde::{Deserialize, Serialize};

/// One protein-ligand interaction reported by an external profiler (PLIP).
///
/// Records are read-only inputs; they are filtered and counted but never
/// modified by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Display name of the interaction kind (e.g., "Hydrogen Bonds").
    pub interaction_type: String,
    /// Ligand-side anchor point.
    pub ligcoo: Coordinate,
    /// Protein-side anchor point.
    pub protcoo: Coordinate,
    /// Interaction distance in Angstroms, if reported.
    pub dist: Option<f64>,
    pub restype: String,
    pub resnr: String,
    pub reschain: String,
    /// Binding-site position identifier; compared against 1-based pose numbers.
    pub position: Option<String>,
}
