use dockscope::core::models::pose::PoseModel;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Renders the active pose of a running sequencer as a stderr bar.
pub struct PlaybackView {
    bar: ProgressBar,
    labels: Vec<String>,
    index_receiver: watch::Receiver<usize>,
    shutdown_receiver: watch::Receiver<bool>,
}

/// One-line description of a pose shown next to the bar.
pub fn pose_label(pose: &PoseModel, total: usize) -> String {
    let mut label = format!("Pose {}/{}", pose.model_number, total);
    if let Some(score) = pose.vina_score {
        label.push_str(&format!("  {score:.2} kcal/mol"));
    }
    if let (Some(lb), Some(ub)) = (pose.rmsd_lb, pose.rmsd_ub) {
        label.push_str(&format!("  rmsd {lb:.3}/{ub:.3}"));
    }
    label
}

impl PlaybackView {
    pub fn new(
        poses: &[PoseModel],
        index_receiver: watch::Receiver<usize>,
    ) -> (Self, watch::Sender<bool>) {
        Self::with_draw_target(poses, index_receiver, ProgressDrawTarget::stderr_with_hz(12))
    }

    fn with_draw_target(
        poses: &[PoseModel],
        index_receiver: watch::Receiver<usize>,
        target: ProgressDrawTarget,
    ) -> (Self, watch::Sender<bool>) {
        let (shutdown_sender, shutdown_receiver) = watch::channel(false);
        let labels: Vec<String> = poses.iter().map(|p| pose_label(p, poses.len())).collect();

        let bar = ProgressBar::new(poses.len() as u64);
        bar.set_draw_target(target);
        match ProgressStyle::with_template("[{bar:30.cyan/blue}] {msg}") {
            Ok(style) => bar.set_style(style.progress_chars("━╸ ")),
            Err(e) => warn!("Invalid playback bar template: {}", e),
        }

        let view = Self {
            bar,
            labels,
            index_receiver,
            shutdown_receiver,
        };
        view.show(*view.index_receiver.borrow());
        (view, shutdown_sender)
    }

    fn show(&self, index: usize) {
        self.bar.set_position(index as u64 + 1);
        if let Some(label) = self.labels.get(index) {
            self.bar.set_message(label.clone());
        }
    }

    /// Follows sequencer notifications until `ticks` have been seen or until
    /// shutdown. Also returns when the sequencer is dropped. Returns the last
    /// index shown.
    pub async fn run(mut self, ticks: usize) -> usize {
        let mut seen = 0usize;
        let mut last = *self.index_receiver.borrow_and_update();

        while seen < ticks {
            tokio::select! {
                result = self.index_receiver.changed() => {
                    if result.is_err() {
                        debug!("Sequencer closed its index channel.");
                        break;
                    }
                    last = *self.index_receiver.borrow_and_update();
                    self.show(last);
                    seen += 1;
                }
                result = self.shutdown_receiver.changed() => {
                    if result.is_err() || *self.shutdown_receiver.borrow() {
                        break;
                    }
                }
            }
        }

        self.bar.finish_and_clear();
        last
    }
}
