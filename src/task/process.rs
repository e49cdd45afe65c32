//! Ingest task backed by an external process

use crate::config::TaskConfig;
use crate::error::{Result, WorkerError};
use crate::task::traits::{IngestTask, TaskExit};
use async_trait::async_trait;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Runs a fixed command with fixed arguments from a fixed directory
///
/// The child inherits stdin/stdout/stderr and the full environment so its
/// output shows up directly in the worker's console.
#[derive(Debug, Clone)]
pub struct ProcessTask {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl ProcessTask {
    /// Create a new process task
    pub fn new(program: impl Into<String>, args: Vec<String>, working_dir: Option<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir,
        }
    }

    /// Create a process task from the `task` config section
    ///
    /// The working directory is always pinned, so the default relative
    /// script path works no matter where the worker was launched from.
    pub fn from_config(config: &TaskConfig) -> Self {
        Self::new(
            config.program.clone(),
            config.args.clone(),
            Some(config.resolved_working_dir()),
        )
    }

    /// Get the program name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Get the arguments
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Get the configured working directory, if any
    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    fn display_cwd(&self) -> String {
        match &self.working_dir {
            Some(dir) => dir.display().to_string(),
            None => std::env::current_dir()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|_| ".".to_string()),
        }
    }
}

#[async_trait]
impl IngestTask for ProcessTask {
    async fn run(&self) -> Result<TaskExit> {
        info!("Starting ingest (cwd={})", self.display_cwd());

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = cmd.spawn().map_err(|source| WorkerError::Launch {
            program: self.program.clone(),
            source,
        })?;
        debug!("Spawned ingest pid={:?}", child.id());

        let status = child.wait().await.map_err(WorkerError::Wait)?;
        let exit = TaskExit::from(status);
        info!("Ingest exited {}", exit);
        Ok(exit)
    }

    fn describe(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}
