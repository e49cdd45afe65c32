//! Daemon Core - the ingest worker loop and its control inputs
//!
//! The daemon is the long-running process that:
//! - Runs the external ingest task once per cycle
//! - Sleeps out the rest of the interval, or backs off after a failure
//! - Stops gracefully on SIGINT/SIGTERM

pub mod scheduler;
pub mod shutdown;
pub mod signals;
pub mod tick;

pub use scheduler::Worker;
pub use shutdown::ShutdownFlag;
pub use tick::{CycleOutcome, CycleStats, RunState, Schedule};
