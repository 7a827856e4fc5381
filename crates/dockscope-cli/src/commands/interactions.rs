use super::{read_text, write_json};
use crate::cli::InteractionsArgs;
use crate::config::{CliOverrides, PartialAnalysisConfig};
use crate::error::{CliError, Result};
use dockscope::core::analysis::interactions::{
    AlignerConfig, PoseScope, count_by_type, is_plip_type, parse_interactions_json,
};
use dockscope::core::models::interaction::InteractionRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AlignedInteractions {
    pose_index: usize,
    interactions: Vec<InteractionRecord>,
    counts_by_type: BTreeMap<String, usize>,
    total: usize,
}

pub async fn run(
    args: InteractionsArgs,
    partial_config: PartialAnalysisConfig,
    set_values: &[String],
) -> Result<()> {
    for unknown in args.types.iter().filter(|t| !is_plip_type(t)) {
        warn!("'{}' is not a PLIP interaction type; it will match nothing from PLIP.", unknown);
    }

    let overrides = CliOverrides {
        pose_scope: args.by_position.then_some(PoseScope::ByPosition),
        enabled_types: (!args.types.is_empty()).then(|| args.types.clone()),
        ..Default::default()
    };
    let config = partial_config.merge_with_cli(&overrides, set_values)?;

    let text = read_text(&args.input).await?;
    let records =
        parse_interactions_json(&text).map_err(|e| CliError::interactions(args.input.clone(), e))?;

    let report = align_report(&records, &config.aligner, args.pose);
    info!(
        pose = args.pose,
        kept = report.total,
        read = records.len(),
        "Aligned interactions."
    );
    write_json(None, &report).await
}

fn align_report(
    records: &[InteractionRecord],
    aligner: &AlignerConfig,
    pose_index: usize,
) -> AlignedInteractions {
    let interactions: Vec<InteractionRecord> = aligner
        .align(records, pose_index)
        .into_iter()
        .cloned()
        .collect();
    AlignedInteractions {
        pose_index,
        counts_by_type: count_by_type(&interactions),
        total: interactions.len(),
        interactions,
    }
}
