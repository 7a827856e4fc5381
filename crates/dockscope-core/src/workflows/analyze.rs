use crate::core::analysis::metrics::{PoseMetrics, analyze_poses};
use crate::core::io::layout::ModelLayout;
use crate::core::io::pdbqt::{ParsedDocking, parse_docking_file};
use crate::core::models::pose::{DockingSummary, PoseModel};
use crate::core::utils::geometry::{DockingBox, docking_box};
use crate::engine::config::AnalysisConfig;
use crate::engine::progress::{Progress, ProgressReporter};
use serde::Serialize;
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Everything derived from one docking output file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DockingReport {
    pub layout: ModelLayout,
    pub summary: DockingSummary,
    pub poses: Vec<PoseModel>,
    pub metrics: Vec<PoseMetrics>,
    /// Box around the best-scoring pose (the first pose if none is scored).
    pub docking_box: Option<DockingBox>,
}

fn box_pose(parsed: &ParsedDocking) -> Option<&PoseModel> {
    parsed.best_model().or_else(|| parsed.models.first())
}

/// Parses `text` and computes per-pose metrics and the docking box.
#[instrument(skip_all, name = "analyze_workflow")]
pub fn analyze(text: &str, config: &AnalysisConfig) -> DockingReport {
    let parsed = parse_docking_file(text);
    let metrics = analyze_poses(&parsed.models, config.reference_pose);
    let search_box =
        box_pose(&parsed).and_then(|pose| docking_box(&pose.atoms, config.box_padding));

    let ParsedDocking {
        layout,
        models,
        summary,
    } = parsed;

    DockingReport {
        layout,
        summary,
        poses: models,
        metrics,
        docking_box: search_box,
    }
}

/// Analyzes several named files; results keep the input order.
#[instrument(skip_all, name = "analyze_many_workflow", fields(files = inputs.len()))]
pub fn analyze_many(
    inputs: &[(String, String)],
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Vec<(String, DockingReport)> {
    reporter.report(Progress::BatchStart {
        total_files: inputs.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = inputs.iter();

    #[cfg(feature = "parallel")]
    let iterator = inputs.par_iter();

    let reports: Vec<(String, DockingReport)> = iterator
        .map(|(name, text)| {
            let report = analyze(text, config);
            reporter.report(Progress::FileAnalyzed {
                name: name.clone(),
                models: report.summary.total_models,
            });
            (name.clone(), report)
        })
        .collect();

    reporter.report(Progress::BatchFinish);
    info!(files = reports.len(), "Batch analysis complete.");
    reports
}
