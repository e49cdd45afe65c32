//! CLI module for pcpp-worker - command-line interface and subcommands.
//!
//! Provides the main entry point with subcommands for running the worker
//! loop, a single ingest, or printing the effective configuration.

pub mod commands;

pub use commands::Cli;
