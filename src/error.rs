//! Error types for pcpp-worker
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in the worker library
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The external ingestion task could not be started
    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Waiting on a started ingestion task failed
    #[error("Failed to wait for ingest task: {0}")]
    Wait(#[source] std::io::Error),

    /// Interval or backoff values that cannot drive the loop
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// Signal handler registration failed
    #[error("Signal error: {0}")]
    Signal(String),
}

/// Result type alias for worker operations
pub type Result<T> = std::result::Result<T, WorkerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_error() {
        let err = WorkerError::Launch {
            program: "python".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(err.to_string(), "Failed to launch 'python': No such file or directory");
    }

    #[test]
    fn test_invalid_schedule_error() {
        let err = WorkerError::InvalidSchedule("interval must be positive".to_string());
        assert_eq!(err.to_string(), "Invalid schedule: interval must be positive");
    }

    #[test]
    fn test_signal_error() {
        let err = WorkerError::Signal("SIGTERM handler unavailable".to_string());
        assert_eq!(err.to_string(), "Signal error: SIGTERM handler unavailable");
    }

    #[test]
    fn test_wait_error_keeps_source() {
        let err = WorkerError::Wait(std::io::Error::new(std::io::ErrorKind::Interrupted, "interrupted"));
        assert_eq!(err.to_string(), "Failed to wait for ingest task: interrupted");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<u64> {
            Ok(900)
        }

        fn returns_err() -> Result<u64> {
            Err(WorkerError::Signal("test".to_string()))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }
}
