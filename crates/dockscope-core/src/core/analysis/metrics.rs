use crate::core::models::coords::Coordinate;
use crate::core::models::pose::{PoseModel, TorsionRecord};
use crate::core::utils::geometry::{centroid, rmsd};
use serde::Serialize;
use tracing::{debug, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// An active rotatable bond resolved to the atoms of its pose.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TorsionBond {
    pub index: u32,
    pub atom1_index: u32,
    pub atom2_index: u32,
    pub atom1_name: String,
    pub atom2_name: String,
    pub atom1: Coordinate,
    pub atom2: Coordinate,
    /// Bond length in Angstroms.
    pub length: f64,
}

/// Derived geometry and ranking for one pose.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseMetrics {
    pub model_number: u32,
    pub atom_count: usize,
    pub centroid: Option<Coordinate>,
    pub active_torsions: Vec<TorsionBond>,
    pub rmsd_to_reference: Option<f64>,
    /// 1-based rank by score (best first); `None` for unscored poses.
    pub vina_rank: Option<usize>,
}

fn resolve_torsion(model: &PoseModel, torsion: &TorsionRecord) -> Option<TorsionBond> {
    let a = model.atom_by_serial(torsion.atom1_index)?;
    let b = model.atom_by_serial(torsion.atom2_index)?;
    Some(TorsionBond {
        index: torsion.index,
        atom1_index: torsion.atom1_index,
        atom2_index: torsion.atom2_index,
        atom1_name: torsion.atom1_name.clone(),
        atom2_name: torsion.atom2_name.clone(),
        atom1: a.position().into(),
        atom2: b.position().into(),
        length: (a.position() - b.position()).norm(),
    })
}

/// Active torsions of `model` whose atom serials exist in the model.
///
/// Torsions naming a serial that is not present are left out.
pub fn active_torsion_bonds(model: &PoseModel) -> Vec<TorsionBond> {
    model
        .active_torsion_records()
        .filter_map(|torsion| {
            let bond = resolve_torsion(model, torsion);
            if bond.is_none() {
                debug!(
                    model = model.model_number,
                    torsion = torsion.index,
                    "Torsion references atoms missing from the pose; skipped."
                );
            }
            bond
        })
        .collect()
}

/// 1-based score ranks aligned with `models`.
///
/// The lowest score ranks first; equal scores keep file order. Unscored
/// models get `None`.
pub fn vina_ranks(models: &[PoseModel]) -> Vec<Option<usize>> {
    let mut scored: Vec<(usize, f64)> = models
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.vina_score.map(|s| (i, s)))
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut ranks = vec![None; models.len()];
    for (rank, (i, _)) in scored.into_iter().enumerate() {
        ranks[i] = Some(rank + 1);
    }
    ranks
}

fn pose_metrics(
    model: &PoseModel,
    reference: Option<&PoseModel>,
    vina_rank: Option<usize>,
) -> PoseMetrics {
    let rmsd_to_reference = reference.and_then(|r| match rmsd(&r.atoms, &model.atoms) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(model = model.model_number, error = %e, "No RMSD to reference pose.");
            None
        }
    });

    PoseMetrics {
        model_number: model.model_number,
        atom_count: model.atoms.len(),
        centroid: centroid(&model.atoms).map(Coordinate::from),
        active_torsions: active_torsion_bonds(model),
        rmsd_to_reference,
        vina_rank,
    }
}

/// Computes [`PoseMetrics`] for every model.
///
/// `reference_index` is the 0-based position of the pose RMSD is measured
/// against. An out-of-range index is reported once and leaves every
/// `rmsd_to_reference` empty, as do poses whose atom count differs from the
/// reference.
#[instrument(skip_all, fields(models = models.len(), reference = ?reference_index))]
pub fn analyze_poses(models: &[PoseModel], reference_index: Option<usize>) -> Vec<PoseMetrics> {
    let reference = reference_index.and_then(|i| {
        let found = models.get(i);
        if found.is_none() {
            warn!(
                index = i,
                models = models.len(),
                "Reference pose index is out of range; RMSD will not be computed."
            );
        }
        found
    });
    let ranks = vina_ranks(models);

    #[cfg(not(feature = "parallel"))]
    let iterator = models.iter().zip(ranks);

    #[cfg(feature = "parallel")]
    let iterator = models.par_iter().zip(ranks);

    iterator
        .map(|(model, rank)| pose_metrics(model, reference, rank))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomRecord;
    use crate::core::models::pose::TorsionStatus;

    fn pose(number: u32, score: Option<f64>, dx: f64) -> PoseModel {
        let mut model = PoseModel::new(number);
        model.vina_score = score;
        model.atoms = vec![
            AtomRecord::at(1, "C1", dx, 0.0, 0.0),
            AtomRecord::at(2, "C2", dx + 1.5, 0.0, 0.0),
            AtomRecord::at(3, "N1", dx + 1.5, 1.5, 0.0),
        ];
        model
    }

    fn torsion(index: u32, status: TorsionStatus, a: u32, b: u32) -> TorsionRecord {
        TorsionRecord {
            index,
            status,
            atom1_index: a,
            atom2_index: b,
            atom1_name: "C".to_string(),
            atom2_name: "N".to_string(),
        }
    }

    #[test]
    fn ranks_follow_ascending_score_and_skip_unscored() {
        let models = vec![
            pose(1, Some(-6.0), 0.0),
            pose(2, None, 0.0),
            pose(3, Some(-8.0), 0.0),
            pose(4, Some(-6.0), 0.0),
        ];
        assert_eq!(vina_ranks(&models), vec![Some(2), None, Some(1), Some(3)]);
    }

    #[test]
    fn metrics_include_centroid_and_rmsd_to_reference() {
        let models = vec![pose(1, Some(-7.5), 0.0), pose(2, Some(-6.2), 1.0)];
        let metrics = analyze_poses(&models, Some(0));

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].rmsd_to_reference, Some(0.0));
        assert!((metrics[1].rmsd_to_reference.unwrap() - 1.0).abs() < 1e-9);
        assert_eq!(metrics[1].atom_count, 3);
        assert_eq!(metrics[1].vina_rank, Some(2));
        let c = metrics[0].centroid.unwrap();
        assert!((c.x - 1.0).abs() < 1e-9);
        assert!((c.y - 0.5).abs() < 1e-9);
    }

    #[test]
    fn mismatched_or_missing_reference_leaves_rmsd_empty() {
        let mut short = pose(2, None, 0.0);
        short.atoms.pop();
        let models = vec![pose(1, None, 0.0), short];

        let metrics = analyze_poses(&models, Some(0));
        assert_eq!(metrics[1].rmsd_to_reference, None);

        let metrics = analyze_poses(&models, Some(9));
        assert!(metrics.iter().all(|m| m.rmsd_to_reference.is_none()));

        let metrics = analyze_poses(&models, None);
        assert!(metrics.iter().all(|m| m.rmsd_to_reference.is_none()));
    }

    #[test]
    fn only_resolvable_active_torsions_are_reported() {
        let mut model = pose(1, None, 0.0);
        model.torsions = vec![
            torsion(1, TorsionStatus::Active, 1, 2),
            torsion(2, TorsionStatus::Inactive, 2, 3),
            torsion(3, TorsionStatus::Active, 2, 3),
            torsion(4, TorsionStatus::Active, 3, 42),
        ];

        let bonds = active_torsion_bonds(&model);
        let indices: Vec<u32> = bonds.iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![1, 3]);
        assert!((bonds[0].length - 1.5).abs() < 1e-9);
        assert_eq!(bonds[1].atom2, Coordinate::new(1.5, 1.5, 0.0));
    }

    #[test]
    fn empty_pose_has_no_centroid() {
        let metrics = analyze_poses(&[PoseModel::new(1)], Some(0));
        assert_eq!(metrics[0].centroid, None);
        assert_eq!(metrics[0].atom_count, 0);
        assert_eq!(metrics[0].rmsd_to_reference, None);
    }
}
