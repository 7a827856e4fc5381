use super::{read_docking, write_json};
use crate::cli::PlayArgs;
use crate::config::{CliOverrides, PartialAnalysisConfig};
use crate::error::{CliError, Result};
use crate::ui::PlaybackView;
use dockscope::engine::sequencer::PoseSequencer;
use tracing::{info, warn};

pub async fn run(
    args: PlayArgs,
    partial_config: PartialAnalysisConfig,
    set_values: &[String],
) -> Result<()> {
    let overrides = CliOverrides {
        interval_ms: args.interval_ms,
        ..Default::default()
    };
    let config = partial_config.merge_with_cli(&overrides, set_values)?;

    let parsed = read_docking(&args.input).await?;
    if parsed.models.is_empty() {
        return Err(CliError::Argument(format!(
            "{} holds no poses to play",
            args.input.display()
        )));
    }
    let ticks = args.ticks.unwrap_or(parsed.models.len());

    let mut sequencer = PoseSequencer::new(parsed.models.len());
    let (view, shutdown_sender) = PlaybackView::new(&parsed.models, sequencer.subscribe());

    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received; stopping playback.");
            if shutdown_sender.send(true).is_err() {
                warn!("Playback view exited before the interrupt was delivered.");
            }
        }
    });

    sequencer.play(config.autoplay_interval_ms)?;
    info!(
        poses = parsed.models.len(),
        ticks,
        interval_ms = config.autoplay_interval_ms,
        "Playing poses."
    );

    let last_shown = view.run(ticks).await;
    sequencer.stop();
    interrupt.abort();

    info!(index = last_shown, "Playback finished.");
    write_json(None, &sequencer.state()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::TWO_POSES;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    #[tokio::test(start_paused = true)]
    async fn plays_a_full_cycle_and_stops() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("out.pdbqt");
        fs::write(&input, TWO_POSES).unwrap();

        let args = PlayArgs {
            input,
            interval_ms: Some(10),
            ticks: None,
        };
        run(args, PartialAnalysisConfig::default(), &[]).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn single_pose_file_finishes() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("ligand.pdbqt");
        fs::write(
            &input,
            "REMARK VINA RESULT:    -5.10  0.000  0.000\n\
             ATOM      1  C1  UNL     1       0.000   0.000   0.000  0.00  0.00    +0.000 C\n",
        )
        .unwrap();

        let args = PlayArgs {
            input,
            interval_ms: Some(10),
            ticks: None,
        };
        tokio::time::timeout(
            Duration::from_secs(60),
            run(args, PartialAnalysisConfig::default(), &[]),
        )
        .await
        .expect("playing a single pose should stop after one tick")
        .unwrap();
    }

    #[tokio::test]
    async fn empty_file_is_rejected() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("empty.pdbqt");
        fs::write(&input, "").unwrap();

        let args = PlayArgs {
            input,
            interval_ms: None,
            ticks: Some(1),
        };
        let result = run(args, PartialAnalysisConfig::default(), &[]).await;
        assert!(matches!(result, Err(CliError::Argument(_))));
    }
}
