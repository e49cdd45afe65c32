use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::daemon::Schedule;

/// Environment variable that overrides the ingest interval, in seconds
pub const INTERVAL_ENV: &str = "PCPP_INTERVAL_SEC";

/// Interval used when nothing valid is configured
pub const DEFAULT_INTERVAL_SECS: u64 = 900;

/// Upper bound on the wait after a failed cycle
pub const DEFAULT_BACKOFF_CAP_SECS: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub worker: WorkerConfig,
    pub task: TaskConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub interval_secs: u64,
    pub backoff_cap_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
            backoff_cap_secs: DEFAULT_BACKOFF_CAP_SECS,
        }
    }
}

/// How to launch the external ingestion task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    pub program: String,
    pub args: Vec<String>,
    /// None runs the task from the install root; relative paths are resolved against it
    pub working_dir: Option<PathBuf>,
}

impl TaskConfig {
    /// Directory the task runs in, independent of where the worker was started
    pub fn resolved_working_dir(&self) -> PathBuf {
        let root = install_root();
        match &self.working_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => root.join(dir),
            None => root,
        }
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            program: "python".to_string(),
            args: vec!["scripts/python/ingest_pcpartpicker.py".to_string()],
            working_dir: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            worker: WorkerConfig::default(),
            task: TaskConfig::default(),
        }
    }
}

/// Root directory of the worker install, derived from the running executable
///
/// Falls back to the crate directory when the executable path is unavailable.
pub fn install_root() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| install_root_from(&exe))
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")))
}

/// Map an executable path to its install root
///
/// - `<root>/target/<profile>/[deps/]<exe>` -> `<root>`
/// - `<root>/bin/<exe>` -> `<root>`
/// - `<dir>/<exe>` -> `<dir>`
pub fn install_root_from(exe: &Path) -> Option<PathBuf> {
    let exe_dir = exe.parent()?;
    if let Some(target) = exe_dir.ancestors().find(|dir| dir.file_name().is_some_and(|n| n == "target")) {
        return target.parent().map(Path::to_path_buf);
    }
    if exe_dir.file_name().is_some_and(|n| n == "bin") {
        return exe_dir.parent().map(Path::to_path_buf);
    }
    Some(exe_dir.to_path_buf())
}

/// Parse an interval override; anything that is not a positive integer is rejected
pub fn parse_interval(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok()).filter(|secs| *secs > 0)
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply the PCPP_INTERVAL_SEC override from the process environment
    pub fn apply_env(&mut self) {
        let raw = std::env::var(INTERVAL_ENV).ok();
        self.apply_interval_override(raw.as_deref());
    }

    /// Apply a raw interval override; absent or invalid values keep the configured interval
    pub fn apply_interval_override(&mut self, raw: Option<&str>) {
        match parse_interval(raw) {
            Some(secs) => self.worker.interval_secs = secs,
            None => {
                if let Some(value) = raw {
                    log::warn!(
                        "Ignoring invalid {}={:?}, keeping interval={}s",
                        INTERVAL_ENV,
                        value,
                        self.worker.interval_secs
                    );
                }
            }
        }
    }

    /// Build the loop schedule, falling back to the default interval when zero is configured
    pub fn schedule(&self) -> crate::Result<Schedule> {
        let interval_secs = if self.worker.interval_secs == 0 {
            log::warn!("Configured interval of 0s is invalid, using {}s", DEFAULT_INTERVAL_SECS);
            DEFAULT_INTERVAL_SECS
        } else {
            self.worker.interval_secs
        };
        Schedule::new(
            Duration::from_secs(interval_secs),
            Duration::from_secs(self.worker.backoff_cap_secs),
        )
    }
}
