//! Exit status and output of the pcpp-worker binary

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::{NamedTempFile, TempDir, tempdir};

fn write_config(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", yaml).unwrap();
    file
}

fn worker(cwd: &TempDir, config: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pcpp-worker"));
    cmd.current_dir(cwd.path())
        .env_remove("RUST_LOG")
        .env_remove("PCPP_INTERVAL_SEC")
        .arg("-c")
        .arg(config)
        .args(args);
    cmd
}

fn run(mut cmd: Command) -> Output {
    cmd.output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn task_yaml(script: &str) -> String {
    format!(
        "worker:\n  interval_secs: 300\ntask:\n  program: sh\n  args: [\"-c\", \"{}\"]\n",
        script
    )
}

#[test]
fn test_missing_config_file_exits_nonzero() {
    let cwd = tempdir().unwrap();
    let output = run(worker(&cwd, Path::new("/nonexistent/pcpp-worker.yml"), &["show-config"]));

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Failed to load configuration"), "stderr: {}", err);
    // Reported once, not again by the runtime
    assert_eq!(err.matches("Failed to load configuration").count(), 1, "stderr: {}", err);
}

#[test]
fn test_show_config_exits_zero() {
    let cwd = tempdir().unwrap();
    let config = write_config(&task_yaml("exit 0"));
    let output = run(worker(&cwd, config.path(), &["show-config"]));

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("interval_secs: 300"), "stdout: {}", out);
    assert!(out.contains("backoff_cap_secs: 60"), "stdout: {}", out);
}

#[test]
fn test_interval_env_overrides_config() {
    let cwd = tempdir().unwrap();
    let config = write_config(&task_yaml("exit 0"));

    let mut cmd = worker(&cwd, config.path(), &["show-config"]);
    cmd.env("PCPP_INTERVAL_SEC", "42");
    let output = run(cmd);
    assert!(output.status.success());
    assert!(stdout(&output).contains("interval_secs: 42"));
}

#[test]
fn test_invalid_interval_env_keeps_config_value() {
    let cwd = tempdir().unwrap();
    let config = write_config(&task_yaml("exit 0"));

    for value in ["abc", "0", "-5"] {
        let mut cmd = worker(&cwd, config.path(), &["show-config"]);
        cmd.env("PCPP_INTERVAL_SEC", value);
        let output = run(cmd);
        assert!(output.status.success());
        assert!(
            stdout(&output).contains("interval_secs: 300"),
            "PCPP_INTERVAL_SEC={} changed the interval",
            value
        );
    }
}

#[cfg(unix)]
#[test]
fn test_once_with_failing_task_exits_nonzero() {
    let cwd = tempdir().unwrap();
    let config = write_config(&task_yaml("exit 3"));
    let output = run(worker(&cwd, config.path(), &["once"]));

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Ingest failed (code=3)"), "stderr: {}", err);
}

#[cfg(unix)]
#[test]
fn test_once_with_passing_task_exits_zero() {
    let cwd = tempdir().unwrap();
    let config = write_config(&task_yaml("exit 0"));
    let output = run(worker(&cwd, config.path(), &["once"]));

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Ingest completed"));
}

#[test]
fn test_zero_backoff_cap_is_fatal() {
    let cwd = tempdir().unwrap();
    let config = write_config("worker:\n  backoff_cap_secs: 0\ntask:\n  program: sh\n  args: [\"-c\", \"exit 0\"]\n");
    let output = run(worker(&cwd, config.path(), &["run"]));

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid worker schedule"));
}
