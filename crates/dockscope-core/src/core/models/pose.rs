use super::atom::AtomRecord;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Whether a rotatable bond was left free during the docking search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TorsionStatus {
    /// `A` in the torsion remark block.
    Active,
    /// `I` in the torsion remark block.
    Inactive,
}

impl TorsionStatus {
    pub fn is_active(self) -> bool {
        self == TorsionStatus::Active
    }
}

impl FromStr for TorsionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" => Ok(TorsionStatus::Active),
            "I" => Ok(TorsionStatus::Inactive),
            _ => Err(()),
        }
    }
}

/// A rotatable bond declared in a `REMARK ... between atoms:` line.
///
/// Atom indices refer to `AtomRecord::serial` values of the same model. They
/// are not validated at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorsionRecord {
    pub index: u32,
    pub status: TorsionStatus,
    pub atom1_index: u32,
    pub atom2_index: u32,
    pub atom1_name: String,
    pub atom2_name: String,
}

/// A `BRANCH <from> <to>` record of the PDBQT torsion tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub from: u32,
    pub to: u32,
}

/// One docked pose with its atoms and docking metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseModel {
    /// 1-based ordinal of the model within the file.
    pub model_number: u32,
    pub atoms: Vec<AtomRecord>,
    pub torsions: Vec<TorsionRecord>,
    pub branches: Vec<Branch>,
    /// Vina affinity or AutoDock4 estimated free energy of binding (kcal/mol).
    pub vina_score: Option<f64>,
    pub inter_energy: Option<f64>,
    pub intra_energy: Option<f64>,
    pub total_energy: Option<f64>,
    /// Torsion count declared by the `active torsions:` remark.
    pub total_torsions: u32,
    /// Number of torsion records with status `A`.
    pub active_torsions: u32,
    #[serde(rename = "rmsd_lb")]
    pub rmsd_lb: Option<f64>,
    #[serde(rename = "rmsd_ub")]
    pub rmsd_ub: Option<f64>,
}

impl PoseModel {
    pub fn new(model_number: u32) -> Self {
        Self {
            model_number,
            ..Default::default()
        }
    }

    /// Returns `true` if no record of any kind has been attached to the model.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
            && self.torsions.is_empty()
            && self.branches.is_empty()
            && self.vina_score.is_none()
            && self.inter_energy.is_none()
            && self.intra_energy.is_none()
            && self.total_energy.is_none()
            && self.total_torsions == 0
            && self.rmsd_lb.is_none()
            && self.rmsd_ub.is_none()
    }

    /// Looks up an atom by its serial number.
    pub fn atom_by_serial(&self, serial: u32) -> Option<&AtomRecord> {
        self.atoms.iter().find(|a| a.serial == serial)
    }

    /// Iterates over torsions with status `A`.
    pub fn active_torsion_records(&self) -> impl Iterator<Item = &TorsionRecord> {
        self.torsions.iter().filter(|t| t.status.is_active())
    }
}

/// Score statistics over all models of one parsed file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockingSummary {
    /// Number of models, scored or not.
    pub total_models: usize,
    /// Number of models that carried a score.
    pub scored_models: usize,
    /// Lowest (best) score; `+inf` when no model is scored.
    pub best_score: f64,
    /// Highest (worst) score; `-inf` when no model is scored.
    pub worst_score: f64,
    /// Mean score; 0.0 when no model is scored.
    pub avg_score: f64,
}

impl Default for DockingSummary {
    fn default() -> Self {
        Self {
            total_models: 0,
            scored_models: 0,
            best_score: f64::INFINITY,
            worst_score: f64::NEG_INFINITY,
            avg_score: 0.0,
        }
    }
}

impl DockingSummary {
    /// Computes the summary over `models`.
    ///
    /// Only models with a `vina_score` contribute to the score statistics;
    /// `total_models` counts every model.
    pub fn from_models(models: &[PoseModel]) -> Self {
        let mut summary = Self {
            total_models: models.len(),
            ..Default::default()
        };
        let mut sum = 0.0;
        for score in models.iter().filter_map(|m| m.vina_score) {
            summary.best_score = summary.best_score.min(score);
            summary.worst_score = summary.worst_score.max(score);
            sum += score;
            summary.scored_models += 1;
        }
        if summary.scored_models > 0 {
            summary.avg_score = sum / summary.scored_models as f64;
        }
        summary
    }

    pub fn has_scores(&self) -> bool {
        self.scored_models > 0
    }
}
