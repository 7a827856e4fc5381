use super::{model_index, read_docking, write_json};
use crate::cli::BoxArgs;
use crate::config::{CliOverrides, PartialAnalysisConfig};
use crate::error::{CliError, Result};
use dockscope::core::io::pdbqt::ParsedDocking;
use dockscope::core::models::pose::PoseModel;
use dockscope::core::utils::geometry::{DockingBox, docking_box};
use tracing::info;

const OUTPUT_DECIMALS: i32 = 2;

fn select_pose(parsed: &ParsedDocking, model: Option<u64>) -> Result<&PoseModel> {
    match model {
        Some(model) => {
            let index = model_index(model)?;
            parsed.models.get(index).ok_or_else(|| {
                CliError::Argument(format!(
                    "model {} requested but the file holds {} model(s)",
                    model,
                    parsed.models.len()
                ))
            })
        }
        None => parsed
            .best_model()
            .or_else(|| parsed.models.first())
            .ok_or_else(|| CliError::Argument("the file holds no poses".to_string())),
    }
}

fn compute(parsed: &ParsedDocking, model: Option<u64>, padding: f64) -> Result<DockingBox> {
    let pose = select_pose(parsed, model)?;
    let search_box = docking_box(&pose.atoms, padding).ok_or_else(|| {
        CliError::Argument(format!("model {} has no atoms", pose.model_number))
    })?;
    info!(
        model = pose.model_number,
        atoms = pose.atoms.len(),
        padding,
        "Computed docking box."
    );
    Ok(search_box.rounded(OUTPUT_DECIMALS))
}

pub async fn run(
    args: BoxArgs,
    partial_config: PartialAnalysisConfig,
    set_values: &[String],
) -> Result<()> {
    let overrides = CliOverrides {
        box_padding: args.padding,
        ..Default::default()
    };
    let config = partial_config.merge_with_cli(&overrides, set_values)?;

    let parsed = read_docking(&args.input).await?;
    let search_box = compute(&parsed, args.model, config.box_padding)?;
    write_json(None, &search_box).await
}
