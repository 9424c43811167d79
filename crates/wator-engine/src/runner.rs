//! Background step loop with a snapshot channel.
//!
//! [`WorldRunner::spawn`] moves a [`WatorWorld`] onto a dedicated thread
//! that steps it until a step budget is spent, a step fails, or the
//! runner is cancelled. Cancellation is only observed between steps, so
//! the world handed back by [`stop()`](WorldRunner::stop) is always in a
//! post-commit state.
//!
//! Snapshots go out on a bounded crossbeam channel. The loop never blocks
//! on it: when the channel is full the frame is dropped and counted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError};
use tracing::{info, warn};
use wator_core::{StepError, StepId};

use crate::config::ConfigError;
use crate::metrics::Population;
use crate::snapshot::WorldSnapshot;
use crate::world::WatorWorld;

/// How a [`WorldRunner`] drives its world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Stop after this many steps. `None` runs until cancelled or failed.
    pub max_steps: Option<u64>,
    /// Publish a snapshot every N completed steps. 0 disables publishing.
    pub snapshot_every: u64,
    /// Snapshot channel capacity (at least 1).
    pub channel_capacity: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            snapshot_every: 1,
            channel_capacity: 4,
        }
    }
}

/// What happened during a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps completed by the runner.
    pub steps: u64,
    /// World step counter when the loop exited.
    pub final_step: StepId,
    /// Snapshots dropped because the channel was full.
    pub dropped_snapshots: u64,
    /// The error that ended the run, if any.
    pub error: Option<StepError>,
    /// Population when the loop exited.
    pub population: Population,
}

/// Handle to a world stepping on a background thread.
///
/// Dropping the handle cancels the run and joins the thread.
pub struct WorldRunner {
    cancel: Arc<AtomicBool>,
    snapshots: Receiver<WorldSnapshot>,
    handle: Option<JoinHandle<(WatorWorld, RunSummary)>>,
}

impl WorldRunner {
    /// Start stepping `world` on a new thread named `wator-runner`.
    pub fn spawn(world: WatorWorld, config: RunnerConfig) -> Result<Self, ConfigError> {
        let (tx, rx) = crossbeam_channel::bounded(config.channel_capacity.max(1));
        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let handle = thread::Builder::new()
            .name("wator-runner".into())
            .spawn(move || run_loop(world, &config, &tx, &flag))
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: format!("wator-runner: {e}"),
            })?;
        Ok(Self {
            cancel,
            snapshots: rx,
            handle: Some(handle),
        })
    }

    /// Receiving end of the snapshot channel.
    pub fn snapshots(&self) -> &Receiver<WorldSnapshot> {
        &self.snapshots
    }

    /// Ask the loop to exit after the step in progress.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// Whether the background thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Cancel the run and wait for the thread, returning the world.
    pub fn stop(self) -> Result<(WatorWorld, RunSummary), StepError> {
        self.cancel();
        self.join()
    }

    /// Wait for the run to end on its own, returning the world.
    ///
    /// Blocks forever if `max_steps` is `None` and no step fails.
    pub fn join(mut self) -> Result<(WatorWorld, RunSummary), StepError> {
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| StepError::WorkerPanicked),
            None => Err(StepError::WorkerPanicked),
        }
    }
}

impl Drop for WorldRunner {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.cancel.store(true, Ordering::Release);
            let _ = handle.join();
        }
    }
}

fn run_loop(
    mut world: WatorWorld,
    config: &RunnerConfig,
    tx: &Sender<WorldSnapshot>,
    cancel: &AtomicBool,
) -> (WatorWorld, RunSummary) {
    info!(
        max_steps = ?config.max_steps,
        snapshot_every = config.snapshot_every,
        start_step = world.step_id().0,
        "runner started"
    );
    let mut summary = RunSummary::default();
    loop {
        if cancel.load(Ordering::Acquire) {
            break;
        }
        if config.max_steps.is_some_and(|max| summary.steps >= max) {
            break;
        }
        match world.execute_step() {
            Ok(report) => {
                summary.steps += 1;
                if config.snapshot_every > 0 && report.step.0 % config.snapshot_every == 0 {
                    match tx.try_send(world.snapshot()) {
                        Ok(()) | Err(TrySendError::Disconnected(_)) => {}
                        Err(TrySendError::Full(_)) => summary.dropped_snapshots += 1,
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "runner stopping on step error");
                summary.error = Some(e);
                break;
            }
        }
    }
    summary.final_step = world.step_id();
    summary.population = world.population();
    info!(
        steps = summary.steps,
        dropped_snapshots = summary.dropped_snapshots,
        "runner stopped"
    );
    (world, summary)
}
