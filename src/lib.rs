//! pcpp-worker - periodic ingestion worker for the PC parts catalog
//!
//! Runs the external PCPartPicker scraper on a fixed interval, backs off
//! after failures, and shuts down gracefully on SIGINT/SIGTERM.

pub mod config;
pub mod daemon;
pub mod error;
pub mod task;

pub use error::{Result, WorkerError};
