use super::{read_text, write_json};
use crate::cli::SummaryArgs;
use crate::config::{CliOverrides, PartialAnalysisConfig};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use dockscope::engine::progress::ProgressReporter;
use dockscope::workflows::analyze::{DockingReport, analyze, analyze_many};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Serialize)]
struct FileReport {
    file: String,
    #[serde(flatten)]
    report: DockingReport,
}

pub async fn run(
    args: SummaryArgs,
    partial_config: PartialAnalysisConfig,
    set_values: &[String],
) -> Result<()> {
    let overrides = CliOverrides {
        reference_model: args
            .reference
            .map(|m| usize::try_from(m).map_err(|e| CliError::Argument(e.to_string())))
            .transpose()?,
        ..Default::default()
    };
    let config = partial_config.merge_with_cli(&overrides, set_values)?;

    let mut inputs = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        inputs.push((path.display().to_string(), read_text(path).await?));
    }

    if let [(name, text)] = inputs.as_slice() {
        info!("Analyzing {}", name);
        let report = tokio::task::block_in_place(|| analyze(text, &config));
        warn_if_empty(name, &report);
        return write_json(args.output.as_deref(), &report).await;
    }

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Analyzing {} docking files...", inputs.len());
    let reports = tokio::task::block_in_place(|| analyze_many(&inputs, &config, &reporter));

    let reports: Vec<FileReport> = reports
        .into_iter()
        .map(|(file, report)| {
            warn_if_empty(&file, &report);
            FileReport { file, report }
        })
        .collect();
    write_json(args.output.as_deref(), &reports).await
}

fn warn_if_empty(name: &str, report: &DockingReport) {
    if report.summary.total_models == 0 {
        warn!("No poses found in {}.", name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TWO_POSES;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread")]
    async fn single_file_writes_one_report() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("lig_out.pdbqt");
        let output = dir.path().join("summary.json");
        fs::write(&input, TWO_POSES).unwrap();

        let args = SummaryArgs {
            inputs: vec![input],
            reference: Some(2),
            output: Some(output.clone()),
        };
        run(args, PartialAnalysisConfig::default(), &[]).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(json["summary"]["totalModels"], 2);
        assert_eq!(json["summary"]["bestScore"], -7.5);
        assert_eq!(json["metrics"][1]["rmsdToReference"], 0.0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn several_files_keep_input_order() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.pdbqt");
        let second = dir.path().join("b.pdbqt");
        let output = dir.path().join("summary.json");
        fs::write(&first, TWO_POSES).unwrap();
        fs::write(&second, "").unwrap();

        let args = SummaryArgs {
            inputs: vec![first.clone(), second],
            reference: None,
            output: Some(output.clone()),
        };
        run(args, PartialAnalysisConfig::default(), &[]).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[0]["file"], first.display().to_string());
        assert_eq!(json[0]["summary"]["totalModels"], 2);
        assert_eq!(json[1]["summary"]["totalModels"], 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn bad_set_value_fails_before_reading_inputs() {
        let args = SummaryArgs {
            inputs: vec!["/no/such/file.pdbqt".into()],
            reference: None,
            output: None,
        };
        let result = run(
            args,
            PartialAnalysisConfig::default(),
            &["analysis.box-padding=-1".to_string()],
        )
        .await;
        assert!(matches!(result, Err(CliError::InvalidConfig(_))));
    }
}
