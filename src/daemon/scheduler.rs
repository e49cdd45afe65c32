//! Worker - the ingest control loop
//!
//! Cycles run strictly one after another: a new invocation never starts
//! before the previous child has exited. The shutdown flag is checked
//! before each invocation and again right after it, never mid-invocation
//! or mid-sleep.

use std::time::Duration;

use log::{debug, error, info, warn};
use tokio::time::Instant;

use crate::daemon::shutdown::ShutdownFlag;
use crate::daemon::tick::{CycleOutcome, CycleStats, RunState, Schedule};
use crate::task::IngestTask;

/// Drives an `IngestTask` on a fixed schedule until shutdown
pub struct Worker<T> {
    task: T,
    schedule: Schedule,
    shutdown: ShutdownFlag,
    state: RunState,
    stats: CycleStats,
}

impl<T: IngestTask> Worker<T> {
    /// Create a new worker
    pub fn new(task: T, schedule: Schedule, shutdown: ShutdownFlag) -> Self {
        Self {
            task,
            schedule,
            shutdown,
            state: RunState::Idle,
            stats: CycleStats::new(),
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    fn transition(&mut self, next: RunState) {
        if self.state != next {
            debug!("State {} -> {}", self.state, next);
            self.state = next;
        }
    }

    /// Invoke the task once, classify the result and record it
    ///
    /// Never fails: launch and wait errors become `CycleOutcome::Error`.
    /// Returns the outcome and how long the invocation took.
    pub async fn run_cycle(&mut self) -> (CycleOutcome, Duration) {
        self.transition(RunState::Running);
        debug!("Invoking {}", self.task.describe());

        let start = Instant::now();
        let outcome = CycleOutcome::from(self.task.run().await);
        let elapsed = start.elapsed();

        match &outcome {
            CycleOutcome::Success(_) => {
                info!("Ingest cycle completed in {:.1}s", elapsed.as_secs_f64());
            }
            CycleOutcome::Failed(exit) => {
                warn!(
                    "Non-zero exit from ingest ({}) after {:.1}s",
                    exit,
                    elapsed.as_secs_f64()
                );
            }
            CycleOutcome::Error(e) => {
                error!("ERROR running ingest: {}", e);
            }
        }

        self.stats.record(&outcome);
        (outcome, elapsed)
    }

    /// Run a single cycle without sleeping, then stop
    pub async fn run_once(&mut self) -> CycleOutcome {
        let (outcome, _) = self.run_cycle().await;
        self.transition(RunState::Stopping);
        self.transition(RunState::Stopped);
        outcome
    }

    /// Run cycles until shutdown is requested
    pub async fn run(&mut self) -> CycleStats {
        info!(
            "Launching with interval={}s backoff={}s",
            self.schedule.interval().as_secs(),
            self.schedule.backoff().as_secs()
        );

        while !self.shutdown.is_requested() {
            let (outcome, elapsed) = self.run_cycle().await;

            // An in-flight invocation finishes and is counted, but nothing follows it
            if self.shutdown.is_requested() {
                break;
            }

            let delay = self.schedule.next_delay(&outcome, elapsed);
            if delay.is_zero() {
                debug!("Cycle overran the interval, starting next cycle immediately");
                continue;
            }

            self.transition(RunState::Sleeping);
            if outcome.is_success() {
                debug!("Sleeping {:.1}s until next cycle", delay.as_secs_f64());
            } else {
                warn!(
                    "Backing off {}s before retry (consecutive_failures={})",
                    delay.as_secs(),
                    self.stats.consecutive_failures
                );
            }
            tokio::time::sleep(delay).await;
        }

        self.transition(RunState::Stopping);
        info!("Stopped ({})", self.stats);
        self.transition(RunState::Stopped);
        self.stats.clone()
    }
}
