//! Tick bookkeeping - schedule, run state, and cycle counters
//!
//! One tick of the worker is one cycle:
//! - Run the ingest task to completion
//! - Classify the result
//! - Wait until the next cycle is due

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::error::{Result, WorkerError};
use crate::task::TaskExit;

/// Interval and failure backoff for the worker loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    interval: Duration,
    backoff_cap: Duration,
}

impl Schedule {
    /// Create a new schedule; both durations must be non-zero
    pub fn new(interval: Duration, backoff_cap: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(WorkerError::InvalidSchedule("interval must be positive".to_string()));
        }
        if backoff_cap.is_zero() {
            return Err(WorkerError::InvalidSchedule("backoff cap must be positive".to_string()));
        }
        Ok(Self { interval, backoff_cap })
    }

    /// Time between the starts of two successful cycles
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait after a failed cycle: `min(backoff_cap, interval)`
    pub fn backoff(&self) -> Duration {
        self.backoff_cap.min(self.interval)
    }

    /// Delay before the next cycle given how this one ended and how long it took
    ///
    /// Failures always wait the backoff, independent of `elapsed`.
    pub fn next_delay(&self, outcome: &CycleOutcome, elapsed: Duration) -> Duration {
        if outcome.is_success() {
            self.interval.saturating_sub(elapsed)
        } else {
            self.backoff()
        }
    }
}

/// Where the worker loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Constructed, no cycle started yet
    #[default]
    Idle,
    /// Ingest task in flight
    Running,
    /// Waiting for the next cycle (interval remainder or backoff)
    Sleeping,
    /// Shutdown observed, leaving the loop
    Stopping,
    /// Loop exited
    Stopped,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Sleeping => "sleeping",
            RunState::Stopping => "stopping",
            RunState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Result of one cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Task exited with code 0
    Success(TaskExit),
    /// Task exited non-zero or was killed
    Failed(TaskExit),
    /// Task could not be launched or awaited
    Error(String),
}

impl CycleOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CycleOutcome::Success(_))
    }
}

impl From<Result<TaskExit>> for CycleOutcome {
    fn from(result: Result<TaskExit>) -> Self {
        match result {
            Ok(exit) if exit.success() => CycleOutcome::Success(exit),
            Ok(exit) => CycleOutcome::Failed(exit),
            Err(e) => CycleOutcome::Error(e.to_string()),
        }
    }
}

/// Counters kept across cycles for the lifetime of the worker
#[derive(Debug, Clone, Default)]
pub struct CycleStats {
    /// Number of cycles run
    pub cycles: u64,
    /// Cycles where the task exited 0
    pub succeeded: u64,
    /// Cycles where the task exited non-zero or was killed
    pub failed: u64,
    /// Cycles where the task could not be run at all
    pub errored: u64,
    /// Failures (of either kind) since the last success
    pub consecutive_failures: u64,
    /// Wall-clock time of the most recent success
    pub last_success: Option<DateTime<Local>>,
}

impl CycleStats {
    /// Create empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a finished cycle
    pub fn record(&mut self, outcome: &CycleOutcome) {
        self.cycles += 1;
        match outcome {
            CycleOutcome::Success(_) => {
                self.succeeded += 1;
                self.consecutive_failures = 0;
                self.last_success = Some(Local::now());
            }
            CycleOutcome::Failed(_) => {
                self.failed += 1;
                self.consecutive_failures += 1;
            }
            CycleOutcome::Error(_) => {
                self.errored += 1;
                self.consecutive_failures += 1;
            }
        }
    }
}

impl fmt::Display for CycleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cycles={} succeeded={} failed={} errored={} consecutive_failures={}",
            self.cycles, self.succeeded, self.failed, self.errored, self.consecutive_failures
        )?;
        match &self.last_success {
            Some(at) => write!(f, " last_success={}", at.format("%Y-%m-%d %H:%M:%S")),
            None => write!(f, " last_success=never"),
        }
    }
}
