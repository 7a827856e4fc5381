use crate::core::models::coords::Coordinate;
use crate::core::models::interaction::InteractionRecord;
use phf::{OrderedSet, phf_ordered_set};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Display names PLIP reports, in its usual order.
pub static PLIP_INTERACTION_TYPES: OrderedSet<&'static str> = phf_ordered_set! {
    "Hydrophobic Interactions",
    "Hydrogen Bonds",
    "Water Bridges",
    "Salt Bridges",
    "Pi Stacks",
    "Pi Cation Interactions",
    "Halogen Bonds",
    "Metal Complexes",
};

/// Returns `true` for one of the eight PLIP interaction type names.
pub fn is_plip_type(name: &str) -> bool {
    PLIP_INTERACTION_TYPES.contains(name)
}

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("Invalid interaction JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// How interactions are matched to poses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PoseScope {
    /// Every pose sees every interaction.
    #[default]
    Global,
    /// Only interactions whose `position` equals the 1-based pose number.
    ByPosition,
}

/// Filters applied when aligning interactions to a pose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignerConfig {
    pub scope: PoseScope,
    pub enabled_types: HashSet<String>,
}

impl Default for AlignerConfig {
    /// Global scope with every PLIP type enabled.
    fn default() -> Self {
        Self {
            scope: PoseScope::Global,
            enabled_types: all_plip_types(),
        }
    }
}

impl AlignerConfig {
    pub fn align<'a>(
        &self,
        interactions: &'a [InteractionRecord],
        pose_index: usize,
    ) -> Vec<&'a InteractionRecord> {
        align_interactions(interactions, pose_index, &self.enabled_types, self.scope)
    }
}

/// The set of all PLIP type names, owned.
pub fn all_plip_types() -> HashSet<String> {
    PLIP_INTERACTION_TYPES
        .iter()
        .map(|name| name.to_string())
        .collect()
}

fn matches_pose(record: &InteractionRecord, pose_index: usize, scope: PoseScope) -> bool {
    match scope {
        PoseScope::Global => true,
        PoseScope::ByPosition => {
            let wanted = pose_index + 1;
            record.position.as_deref().is_some_and(|p| {
                let p = p.trim();
                p.parse::<usize>().map_or(p == wanted.to_string(), |n| n == wanted)
            })
        }
    }
}

/// Selects the interactions shown for the pose at `pose_index` (0-based).
///
/// An interaction is kept when its type is in `enabled_types` and it matches
/// the pose under `scope`. Input order is preserved.
pub fn align_interactions<'a>(
    interactions: &'a [InteractionRecord],
    pose_index: usize,
    enabled_types: &HashSet<String>,
    scope: PoseScope,
) -> Vec<&'a InteractionRecord> {
    interactions
        .iter()
        .filter(|r| enabled_types.contains(&r.interaction_type))
        .filter(|r| matches_pose(r, pose_index, scope))
        .collect()
}

/// Number of interactions [`align_interactions`] would return.
pub fn count_for_pose(
    interactions: &[InteractionRecord],
    pose_index: usize,
    enabled_types: &HashSet<String>,
    scope: PoseScope,
) -> usize {
    align_interactions(interactions, pose_index, enabled_types, scope).len()
}

/// Number of interactions per type, sorted by type name.
pub fn count_by_type(interactions: &[InteractionRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in interactions {
        *counts.entry(record.interaction_type.clone()).or_insert(0) += 1;
    }
    counts
}

/// A JSON scalar that PLIP exports may write either as a number or a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Scalar::Number(v) => Some(*v),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value.filter(|v| v.is_finite())
    }

    fn into_text(self) -> String {
        match self {
            Scalar::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
            Scalar::Number(v) => v.to_string(),
            Scalar::Text(s) => s.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawInteraction {
    interaction_type: String,
    ligcoo_x: Option<Scalar>,
    ligcoo_y: Option<Scalar>,
    ligcoo_z: Option<Scalar>,
    protcoo_x: Option<Scalar>,
    protcoo_y: Option<Scalar>,
    protcoo_z: Option<Scalar>,
    #[serde(alias = "distance")]
    dist: Option<Scalar>,
    restype: Option<Scalar>,
    resnr: Option<Scalar>,
    reschain: Option<Scalar>,
    position: Option<Scalar>,
}

fn coordinate(x: &Option<Scalar>, y: &Option<Scalar>, z: &Option<Scalar>) -> Option<Coordinate> {
    let get = |s: &Option<Scalar>| s.as_ref().and_then(Scalar::as_f64);
    Some(Coordinate::new(get(x)?, get(y)?, get(z)?))
}

impl RawInteraction {
    fn into_record(self) -> Option<InteractionRecord> {
        let ligcoo = coordinate(&self.ligcoo_x, &self.ligcoo_y, &self.ligcoo_z)?;
        let protcoo = coordinate(&self.protcoo_x, &self.protcoo_y, &self.protcoo_z)?;
        let text = |s: Option<Scalar>| s.map(Scalar::into_text).unwrap_or_default();

        Some(InteractionRecord {
            interaction_type: self.interaction_type,
            ligcoo,
            protcoo,
            dist: self.dist.as_ref().and_then(Scalar::as_f64),
            restype: text(self.restype),
            resnr: text(self.resnr),
            reschain: text(self.reschain),
            position: self
                .position
                .map(Scalar::into_text)
                .filter(|p| !p.is_empty()),
        })
    }
}

/// Parses a PLIP-style interaction list.
///
/// The document must be a JSON array of flat objects. Numeric fields may be
/// numbers or numeric strings, and `distance` is accepted for `dist`.
/// Entries that are not objects, lack `interaction_type`, or have incomplete
/// ligand or protein coordinates are skipped with a warning.
///
/// # Errors
///
/// Returns [`InteractionError::Json`] if the text is not a JSON array.
pub fn parse_interactions_json(text: &str) -> Result<Vec<InteractionRecord>, InteractionError> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(text)?;
    let total = entries.len();

    let records: Vec<InteractionRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value::<RawInteraction>(entry) {
            Ok(raw) => {
                let kind = raw.interaction_type.clone();
                let record = raw.into_record();
                if record.is_none() {
                    warn!(
                        entry = i,
                        interaction_type = %kind,
                        "Skipping interaction with incomplete coordinates."
                    );
                }
                record
            }
            Err(e) => {
                warn!(entry = i, error = %e, "Skipping unreadable interaction entry.");
                None
            }
        })
        .collect();

    for record in records.iter().filter(|r| !is_plip_type(&r.interaction_type)) {
        debug!(
            interaction_type = %record.interaction_type,
            "Interaction type is not a PLIP display name."
        );
    }
    info!(
        parsed = records.len(),
        skipped = total - records.len(),
        "Loaded interactions."
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: &str, position: Option<&str>) -> InteractionRecord {
        InteractionRecord {
            interaction_type: kind.to_string(),
            ligcoo: Coordinate::new(0.0, 0.0, 0.0),
            protcoo: Coordinate::new(1.0, 1.0, 1.0),
            dist: Some(3.1),
            restype: "ASP".to_string(),
            resnr: "45".to_string(),
            reschain: "A".to_string(),
            position: position.map(str::to_string),
        }
    }

    fn types(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn sample() -> Vec<InteractionRecord> {
        vec![
            record("Hydrogen Bonds", Some("1")),
            record("Hydrophobic Interactions", Some("2")),
            record("Hydrogen Bonds", Some("2")),
            record("Salt Bridges", None),
        ]
    }

    #[test]
    fn global_scope_filters_by_type_only() {
        let all = sample();
        let enabled = types(&["Hydrogen Bonds"]);
        for pose in 0..3 {
            let aligned = align_interactions(&all, pose, &enabled, PoseScope::Global);
            assert_eq!(aligned.len(), 2);
            assert!(aligned.iter().all(|r| r.interaction_type == "Hydrogen Bonds"));
        }
    }

    #[test]
    fn by_position_scope_matches_one_based_pose_number() {
        let all = sample();
        let enabled = all_plip_types();

        let first = align_interactions(&all, 0, &enabled, PoseScope::ByPosition);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].position.as_deref(), Some("1"));

        let second = align_interactions(&all, 1, &enabled, PoseScope::ByPosition);
        assert_eq!(second.len(), 2);
        assert_eq!(count_for_pose(&all, 1, &enabled, PoseScope::ByPosition), 2);
        assert!(align_interactions(&all, 5, &enabled, PoseScope::ByPosition).is_empty());
    }

    #[test]
    fn count_for_pose_agrees_with_alignment() {
        let all = sample();
        let enabled = types(&["Hydrogen Bonds", "Salt Bridges"]);
        for scope in [PoseScope::Global, PoseScope::ByPosition] {
            for pose in 0..3 {
                assert_eq!(
                    count_for_pose(&all, pose, &enabled, scope),
                    align_interactions(&all, pose, &enabled, scope).len()
                );
            }
        }
    }

    #[test]
    fn empty_enabled_set_selects_nothing() {
        let all = sample();
        assert!(align_interactions(&all, 0, &HashSet::new(), PoseScope::Global).is_empty());
    }

    #[test]
    fn default_aligner_config_is_global_with_all_types() {
        let config = AlignerConfig::default();
        assert_eq!(config.scope, PoseScope::Global);
        assert_eq!(config.enabled_types.len(), 8);
        assert_eq!(config.align(&sample(), 0).len(), 4);
    }

    #[test]
    fn count_by_type_is_sorted_by_name() {
        let counts = count_by_type(&sample());
        let keys: Vec<&str> = counts.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["Hydrogen Bonds", "Hydrophobic Interactions", "Salt Bridges"]
        );
        assert_eq!(counts["Hydrogen Bonds"], 2);
    }

    #[test]
    fn plip_type_table_has_eight_names_in_order() {
        assert_eq!(PLIP_INTERACTION_TYPES.len(), 8);
        assert_eq!(
            PLIP_INTERACTION_TYPES.iter().next().copied(),
            Some("Hydrophobic Interactions")
        );
        assert!(is_plip_type("Pi Cation Interactions"));
        assert!(!is_plip_type("Van der Waals"));
    }

    #[test]
    fn parses_string_and_numeric_fields() {
        let json = r#"[
            {"interaction_type": "Hydrogen Bonds",
             "ligcoo_x": "1.5", "ligcoo_y": "2.0", "ligcoo_z": "-3.25",
             "protcoo_x": 4, "protcoo_y": 5, "protcoo_z": 6,
             "distance": "2.91", "restype": "SER", "resnr": 195,
             "reschain": "A", "position": 1},
            {"interaction_type": "Salt Bridges",
             "ligcoo_x": 0, "ligcoo_y": 0, "ligcoo_z": 0,
             "protcoo_x": 1, "protcoo_y": 1, "protcoo_z": 1,
             "dist": 3.5, "restype": "ASP", "resnr": "45", "reschain": "B"}
        ]"#;
        let records = parse_interactions_json(json).unwrap();

        assert_eq!(records.len(), 2);
        let hb = &records[0];
        assert_eq!(hb.ligcoo, Coordinate::new(1.5, 2.0, -3.25));
        assert_eq!(hb.protcoo, Coordinate::new(4.0, 5.0, 6.0));
        assert_eq!(hb.dist, Some(2.91));
        assert_eq!(hb.resnr, "195");
        assert_eq!(hb.position.as_deref(), Some("1"));
        assert_eq!(records[1].dist, Some(3.5));
        assert_eq!(records[1].position, None);
    }

    #[test]
    fn skips_entries_with_missing_coordinates_or_type() {
        let json = r#"[
            {"interaction_type": "Pi Stacks", "ligcoo_x": 1, "ligcoo_y": 2,
             "protcoo_x": 1, "protcoo_y": 1, "protcoo_z": 1},
            {"ligcoo_x": 1, "ligcoo_y": 2, "ligcoo_z": 3,
             "protcoo_x": 1, "protcoo_y": 1, "protcoo_z": 1},
            "not an object",
            {"interaction_type": "Pi Stacks", "ligcoo_x": 1, "ligcoo_y": 2, "ligcoo_z": 3,
             "protcoo_x": 1, "protcoo_y": 1, "protcoo_z": "n/a"}
        ]"#;
        assert!(parse_interactions_json(json).unwrap().is_empty());
    }

    #[test]
    fn non_array_document_is_json_error() {
        assert!(matches!(
            parse_interactions_json(r#"{"interactions": []}"#),
            Err(InteractionError::Json(_))
        ));
        assert!(matches!(
            parse_interactions_json("not json"),
            Err(InteractionError::Json(_))
        ));
    }
}
