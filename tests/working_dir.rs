//! Working directory resolution for the default ingest task
//!
//! Changes the process working directory, so it lives in its own binary.

use std::path::PathBuf;

use pcpp_worker::config::{TaskConfig, install_root};
use pcpp_worker::task::{IngestTask, ProcessTask};
use tempfile::tempdir;

fn task_config(script: &str, working_dir: Option<PathBuf>) -> TaskConfig {
    TaskConfig {
        program: "sh".to_string(),
        args: vec!["-c".to_string(), script.to_string()],
        working_dir,
    }
}

#[tokio::test]
async fn test_default_task_runs_from_install_root_regardless_of_cwd() {
    // Relative paths in the task resolve against the install root (the crate dir here)
    let config = task_config("test -f Cargo.toml && test -f src/lib.rs", None);

    let from_root = ProcessTask::from_config(&config).run().await.unwrap();
    assert!(from_root.success());

    let elsewhere = tempdir().unwrap();
    std::env::set_current_dir(elsewhere.path()).unwrap();

    let from_elsewhere = ProcessTask::from_config(&config).run().await.unwrap();
    assert!(from_elsewhere.success(), "task lost its root after cwd change: {}", from_elsewhere);

    // Relative override is anchored the same way
    let nested = task_config("test -f lib.rs", Some(PathBuf::from("src")));
    assert!(ProcessTask::from_config(&nested).run().await.unwrap().success());

    std::env::set_current_dir(install_root()).unwrap();
}
