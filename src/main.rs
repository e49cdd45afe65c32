use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::{LevelFilter, error, info, warn};
use std::io::Write;

use pcpp_worker::config::Config;
use pcpp_worker::daemon::{CycleOutcome, ShutdownFlag, Worker, signals};
use pcpp_worker::task::{IngestTask, ProcessTask};

mod cli;

use cli::Cli;
use cli::commands::Commands;

/// Prefix tag on every log line
const LOG_TAG: &str = "pcpp-worker";

fn level_pinned(cli: &Cli) -> bool {
    cli.is_verbose() || std::env::var_os("RUST_LOG").is_some()
}

fn setup_logging(cli: &Cli) -> Result<()> {
    // Accept everything here and narrow with log::set_max_level once config is known
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Trace).parse_default_env();
    if cli.is_verbose() {
        builder.filter_level(LevelFilter::Debug);
    }

    builder
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {:<5} {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                LOG_TAG,
                record.level(),
                record.args()
            )
        })
        .try_init()
        .context("Failed to initialize logger")?;

    if !level_pinned(cli) {
        log::set_max_level(LevelFilter::Info);
    }
    Ok(())
}

fn apply_log_level(cli: &Cli, config: &Config) {
    if level_pinned(cli) {
        return;
    }
    if let Some(level) = &config.log_level {
        match level.parse::<LevelFilter>() {
            Ok(filter) => log::set_max_level(filter),
            Err(_) => warn!("Unknown log_level '{}' in config, keeping info", level),
        }
    }
}

async fn run_application(cli: &Cli, config: Config) -> Result<()> {
    match &cli.command {
        None => run_worker(config, None).await,
        Some(Commands::Run { interval }) => run_worker(config, *interval).await,
        Some(Commands::Once) => run_once(config).await,
        Some(Commands::ShowConfig) => show_config(&config),
    }
}

async fn run_worker(mut config: Config, interval: Option<u64>) -> Result<()> {
    if let Some(secs) = interval {
        config.worker.interval_secs = secs;
    }
    let schedule = config.schedule().context("Invalid worker schedule")?;

    let shutdown = ShutdownFlag::new();
    let listener = signals::listen(shutdown.clone()).context("Failed to install signal handlers")?;

    let task = ProcessTask::from_config(&config.task);
    info!("Ingest command: {}", task.describe());

    let mut worker = Worker::new(task, schedule, shutdown);
    worker.run().await;

    listener.abort();
    Ok(())
}

async fn run_once(config: Config) -> Result<()> {
    let schedule = config.schedule().context("Invalid worker schedule")?;
    let task = ProcessTask::from_config(&config.task);
    info!("Running single ingest: {}", task.describe());

    let mut worker = Worker::new(task, schedule, ShutdownFlag::new());
    match worker.run_once().await {
        CycleOutcome::Success(_) => {
            println!("{}", "Ingest completed".green());
            Ok(())
        }
        CycleOutcome::Failed(exit) => Err(eyre!("Ingest failed ({})", exit)),
        CycleOutcome::Error(e) => Err(eyre!("Ingest could not run: {}", e)),
    }
}

fn show_config(config: &Config) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize config")?;
    println!("{}", "Effective configuration:".cyan());
    print!("{}", yaml);
    Ok(())
}

async fn start(cli: &Cli) -> Result<()> {
    // Load configuration, then let the environment override the interval
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    apply_log_level(cli, &config);
    config.apply_env();

    run_application(cli, config).await
}

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging next so config loading is visible
    if let Err(e) = setup_logging(&cli) {
        eprintln!("[{}] Fatal error: {:#}", LOG_TAG, e);
        std::process::exit(1);
    }

    if let Err(e) = start(&cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}
