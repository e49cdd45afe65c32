//! Ingest task interface

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;

/// How one run of the ingestion task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskExit {
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    /// Terminating signal number, if the process was killed (unix only)
    pub signal: Option<i32>,
}

impl TaskExit {
    /// Exit with a plain status code
    pub fn code(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    /// Termination by signal
    pub fn signaled(signal: i32) -> Self {
        Self {
            code: None,
            signal: Some(signal),
        }
    }

    /// Only exit code 0 counts as success
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<std::process::ExitStatus> for TaskExit {
    fn from(status: std::process::ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }
}

impl fmt::Display for TaskExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "code={}", code),
            (None, Some(signal)) => write!(f, "signal={}", signal),
            (None, None) => write!(f, "code=unknown"),
        }
    }
}

/// Something the worker can run once per cycle
///
/// Implementations block (asynchronously) until the task has finished.
/// An `Err` means the task could not be started or awaited; the worker
/// treats it the same as a non-zero exit.
#[async_trait]
pub trait IngestTask: Send + Sync {
    /// Run the task to completion
    async fn run(&self) -> Result<TaskExit>;

    /// Short human-readable description for log lines
    fn describe(&self) -> String;
}
