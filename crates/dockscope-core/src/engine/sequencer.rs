use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

/// Auto-advance period used until a caller picks one.
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequencerError {
    #[error("Pose index {index} is out of range ({max_poses} poses)")]
    IndexOutOfRange { index: usize, max_poses: usize },
    #[error("Auto-advance interval must be at least 1 ms")]
    InvalidInterval,
    #[error("Auto-advance requires a running tokio runtime")]
    NoRuntime,
}

/// Inputs to [`PoseSequencerState::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    SetMaxPoses(usize),
    Next,
    Prev,
    Jump(usize),
    Play(u64),
    Stop,
}

/// Which pose is active and whether auto-advance is on.
///
/// `current_index < max_poses` whenever `max_poses > 0`; with no poses the
/// index is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseSequencerState {
    pub current_index: usize,
    pub max_poses: usize,
    pub playing: bool,
    pub interval_ms: u64,
}

impl Default for PoseSequencerState {
    fn default() -> Self {
        Self {
            current_index: 0,
            max_poses: 0,
            playing: false,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl PoseSequencerState {
    pub fn new(max_poses: usize) -> Self {
        Self {
            max_poses,
            ..Default::default()
        }
    }

    /// Applies one event. On error the state is left unchanged.
    pub fn apply(&mut self, event: SequencerEvent) -> Result<(), SequencerError> {
        match event {
            SequencerEvent::SetMaxPoses(n) => {
                self.max_poses = n;
                if self.current_index >= n {
                    self.current_index = n.saturating_sub(1);
                }
            }
            SequencerEvent::Next => {
                if self.max_poses > 0 {
                    self.current_index = (self.current_index + 1) % self.max_poses;
                }
            }
            SequencerEvent::Prev => {
                if self.max_poses > 0 {
                    self.current_index =
                        (self.current_index + self.max_poses - 1) % self.max_poses;
                }
            }
            SequencerEvent::Jump(index) => {
                if index >= self.max_poses {
                    return Err(SequencerError::IndexOutOfRange {
                        index,
                        max_poses: self.max_poses,
                    });
                }
                self.current_index = index;
            }
            SequencerEvent::Play(ms) => {
                if ms == 0 {
                    return Err(SequencerError::InvalidInterval);
                }
                self.playing = true;
                self.interval_ms = ms;
            }
            SequencerEvent::Stop => self.playing = false,
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Shared {
    state: PoseSequencerState,
    /// Bumped on every play/stop; a timer task only ticks while it matches.
    generation: u64,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Always notifies, even when the index is unchanged. Call with the state lock
/// held so notifications follow the order events were applied.
fn publish(tx: &watch::Sender<usize>, index: usize) {
    tx.send_replace(index);
}

/// Tracks the active pose and drives optional auto-advance on a tokio timer.
///
/// Dropping the sequencer cancels its timer task.
#[derive(Debug)]
pub struct PoseSequencer {
    shared: Arc<Mutex<Shared>>,
    index_tx: Arc<watch::Sender<usize>>,
    task: Option<JoinHandle<()>>,
}

impl PoseSequencer {
    pub fn new(max_poses: usize) -> Self {
        let (index_tx, _) = watch::channel(0);
        Self {
            shared: Arc::new(Mutex::new(Shared {
                state: PoseSequencerState::new(max_poses),
                generation: 0,
            })),
            index_tx: Arc::new(index_tx),
            task: None,
        }
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> PoseSequencerState {
        lock(&self.shared).state
    }

    pub fn current_index(&self) -> usize {
        self.state().current_index
    }

    pub fn is_playing(&self) -> bool {
        self.state().playing
    }

    /// Receives the active index after every applied navigation event or
    /// auto-advance tick.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.index_tx.subscribe()
    }

    fn dispatch(&self, event: SequencerEvent) -> Result<usize, SequencerError> {
        let mut shared = lock(&self.shared);
        shared.state.apply(event)?;
        let index = shared.state.current_index;
        publish(&self.index_tx, index);
        Ok(index)
    }

    pub fn set_max_poses(&self, max_poses: usize) -> usize {
        self.dispatch(SequencerEvent::SetMaxPoses(max_poses))
            .unwrap_or_else(|_| self.current_index())
    }

    /// Advances cyclically; a no-op with zero poses.
    pub fn next(&self) -> usize {
        self.dispatch(SequencerEvent::Next)
            .unwrap_or_else(|_| self.current_index())
    }

    /// Steps back cyclically; a no-op with zero poses.
    pub fn prev(&self) -> usize {
        self.dispatch(SequencerEvent::Prev)
            .unwrap_or_else(|_| self.current_index())
    }

    /// # Errors
    ///
    /// Returns [`SequencerError::IndexOutOfRange`] unless `index < max_poses`.
    pub fn jump(&self, index: usize) -> Result<usize, SequencerError> {
        self.dispatch(SequencerEvent::Jump(index))
    }

    /// Starts advancing every `interval_ms`, replacing any running timer.
    ///
    /// The first advance happens one full interval after the call.
    ///
    /// # Errors
    ///
    /// * [`SequencerError::InvalidInterval`] if `interval_ms` is 0.
    /// * [`SequencerError::NoRuntime`] if called outside a tokio runtime.
    pub fn play(&mut self, interval_ms: u64) -> Result<(), SequencerError> {
        if interval_ms == 0 {
            return Err(SequencerError::InvalidInterval);
        }
        let handle = Handle::try_current().map_err(|_| SequencerError::NoRuntime)?;

        let generation = {
            let mut shared = lock(&self.shared);
            shared.state.apply(SequencerEvent::Play(interval_ms))?;
            shared.generation += 1;
            shared.generation
        };
        if let Some(previous) = self.task.take() {
            previous.abort();
        }

        let shared = Arc::clone(&self.shared);
        let index_tx = Arc::clone(&self.index_tx);
        let period = Duration::from_millis(interval_ms);
        self.task = Some(handle.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let index = {
                    let mut guard = lock(&shared);
                    if guard.generation != generation || !guard.state.playing {
                        break;
                    }
                    // Next cannot fail.
                    let _ = guard.state.apply(SequencerEvent::Next);
                    publish(&index_tx, guard.state.current_index);
                    guard.state.current_index
                };
                trace!(index, "Auto-advanced pose.");
            }
            debug!(generation, "Auto-advance task finished.");
        }));

        info!(interval_ms, "Pose auto-advance started.");
        Ok(())
    }

    /// Stops auto-advance. No tick is applied after this returns.
    pub fn stop(&mut self) {
        {
            let mut shared = lock(&self.shared);
            // Stop cannot fail.
            let _ = shared.state.apply(SequencerEvent::Stop);
            shared.generation += 1;
        }
        if let Some(task) = self.task.take() {
            task.abort();
            info!("Pose auto-advance stopped.");
        }
    }
}

impl Drop for PoseSequencer {
    fn drop(&mut self) {
        lock(&self.shared).generation += 1;
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_cycles_back_to_start_after_max_poses_steps() {
        let mut state = PoseSequencerState::new(4);
        state.apply(SequencerEvent::Jump(2)).unwrap();
        for _ in 0..4 {
            state.apply(SequencerEvent::Next).unwrap();
        }
        assert_eq!(state.current_index, 2);
    }

    #[test]
    fn prev_wraps_from_first_to_last() {
        let mut state = PoseSequencerState::new(3);
        state.apply(SequencerEvent::Prev).unwrap();
        assert_eq!(state.current_index, 2);
    }

    #[test]
    fn navigation_is_noop_without_poses() {
        let mut state = PoseSequencerState::new(0);
        state.apply(SequencerEvent::Next).unwrap();
        state.apply(SequencerEvent::Prev).unwrap();
        assert_eq!(state.current_index, 0);
    }

    #[test]
    fn jump_out_of_range_leaves_state_unchanged() {
        let mut state = PoseSequencerState::new(3);
        state.apply(SequencerEvent::Jump(1)).unwrap();
        let before = state;

        assert_eq!(
            state.apply(SequencerEvent::Jump(3)),
            Err(SequencerError::IndexOutOfRange {
                index: 3,
                max_poses: 3
            })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn shrinking_max_poses_clamps_index() {
        let mut state = PoseSequencerState::new(9);
        state.apply(SequencerEvent::Jump(8)).unwrap();
        state.apply(SequencerEvent::SetMaxPoses(5)).unwrap();
        assert_eq!(state.current_index, 4);
        state.apply(SequencerEvent::SetMaxPoses(0)).unwrap();
        assert_eq!(state.current_index, 0);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut state = PoseSequencerState::new(2);
        assert_eq!(
            state.apply(SequencerEvent::Play(0)),
            Err(SequencerError::InvalidInterval)
        );
        assert!(!state.playing);
        assert_eq!(state.interval_ms, DEFAULT_INTERVAL_MS);
    }

    #[test]
    fn play_outside_runtime_fails_without_side_effects() {
        let mut sequencer = PoseSequencer::new(3);
        assert_eq!(sequencer.play(100), Err(SequencerError::NoRuntime));
        assert!(!sequencer.is_playing());
    }

    #[test]
    fn manual_navigation_without_runtime() {
        let sequencer = PoseSequencer::new(3);
        assert_eq!(sequencer.next(), 1);
        assert_eq!(sequencer.prev(), 0);
        assert_eq!(sequencer.jump(2), Ok(2));
        assert!(sequencer.jump(7).is_err());
        assert_eq!(sequencer.current_index(), 2);
        assert_eq!(sequencer.set_max_poses(2), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_advance_ticks_once_per_interval() {
        let mut sequencer = PoseSequencer::new(5);
        sequencer.play(100).unwrap();

        time::sleep(Duration::from_millis(350)).await;
        assert_eq!(sequencer.current_index(), 3);
        assert!(sequencer.is_playing());
        assert_eq!(sequencer.state().interval_ms, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_pending_ticks() {
        let mut sequencer = PoseSequencer::new(5);
        sequencer.play(100).unwrap();
        time::sleep(Duration::from_millis(150)).await;
        sequencer.stop();

        time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(sequencer.current_index(), 1);
        assert!(!sequencer.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn replaying_replaces_the_running_timer() {
        let mut sequencer = PoseSequencer::new(5);
        sequencer.play(100).unwrap();
        time::sleep(Duration::from_millis(50)).await;
        sequencer.play(1000).unwrap();

        time::sleep(Duration::from_millis(500)).await;
        assert_eq!(sequencer.current_index(), 0);
        time::sleep(Duration::from_millis(600)).await;
        assert_eq!(sequencer.current_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_auto_advanced_index() {
        let mut sequencer = PoseSequencer::new(2);
        let mut rx = sequencer.subscribe();
        sequencer.play(250).unwrap();

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 1);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn single_pose_ticks_still_notify_subscribers() {
        let mut sequencer = PoseSequencer::new(1);
        let mut rx = sequencer.subscribe();
        sequencer.play(100).unwrap();

        for _ in 0..3 {
            time::timeout(Duration::from_millis(150), rx.changed())
                .await
                .expect("tick should notify within one interval")
                .unwrap();
            assert_eq!(*rx.borrow_and_update(), 0);
        }
    }

    #[test]
    fn manual_navigation_publishes_latest_index() {
        let sequencer = PoseSequencer::new(4);
        let mut rx = sequencer.subscribe();

        sequencer.next();
        sequencer.next();
        sequencer.prev();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), sequencer.current_index());

        sequencer.set_max_poses(4);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 1);
    }

    #[test]
    fn concurrent_navigation_leaves_channel_in_sync() {
        let sequencer = Arc::new(PoseSequencer::new(7));
        let rx = sequencer.subscribe();

        let workers: Vec<_> = (0..4)
            .map(|i| {
                let sequencer = Arc::clone(&sequencer);
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        if i % 2 == 0 {
                            sequencer.next();
                        } else {
                            sequencer.prev();
                        }
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(*rx.borrow(), sequencer.current_index());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_sequencer_closes_the_channel() {
        let mut sequencer = PoseSequencer::new(2);
        let mut rx = sequencer.subscribe();
        sequencer.play(100).unwrap();
        drop(sequencer);

        assert!(rx.changed().await.is_err());
    }
}
