//! geotrace - background location telemetry agent
//!
//! Samples the device position on a fixed cadence, gates each sample on
//! battery level, enriches it with cellular metadata, and pushes the result
//! to a remote collector.
//!
//! Uses XDG Base Directory specification for file locations:
//! - Config: $XDG_CONFIG_HOME/geotrace/config.toml (~/.config/geotrace/config.toml)
//! - Logs: $XDG_STATE_HOME/geotrace/ (~/.local/state/geotrace/)

mod platform;
mod replay;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use geotrace_core::agent::Agent;
use geotrace_core::power::{PowerMonitor, SysfsPowerMonitor};
use geotrace_core::upload::HttpUploader;
use geotrace_core::Config;

use platform::{LogStatusSurface, NoCellProbe, StaticPermissions};
use replay::ReplayFeed;

#[derive(Parser)]
#[command(name = "geotrace")]
#[command(about = "Background location telemetry agent")]
#[command(version)]
struct Args {
    /// Path to the config file (defaults to the XDG location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the tracking agent until interrupted
    Run {
        /// JSON Lines trace of fixes standing in for the platform feed
        #[arg(long)]
        trace: PathBuf,

        /// Treat the location capability as not granted
        #[arg(long)]
        no_location_grant: bool,
    },

    /// Show the resolved configuration and platform readings
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    Config::ensure_xdg_env();

    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    match args.command {
        Command::Run {
            trace,
            no_location_grant,
        } => cmd_run(config, trace, no_location_grant).await,
        Command::Status => cmd_status(&config),
    }
}

async fn cmd_run(config: Config, trace: PathBuf, no_location_grant: bool) -> Result<()> {
    // The session config is rejected here, at the caller; the pipeline
    // assumes it is valid.
    config
        .agent
        .validate()
        .context("invalid agent configuration")?;

    let _log_guard = geotrace_core::logging::init(&config.logging)
        .context("failed to initialize logging")?;

    let feed = Arc::new(ReplayFeed::from_path(&trace)?);
    let uploader =
        Arc::new(HttpUploader::new(&config.agent).context("failed to build uploader")?);
    tracing::info!(endpoint = uploader.endpoint(), "collector endpoint resolved");

    let agent = Agent::new(
        config.agent,
        feed,
        Arc::new(SysfsPowerMonitor::discover()),
        Arc::new(NoCellProbe),
        uploader,
        Arc::new(StaticPermissions {
            location: !no_location_grant,
        }),
        Arc::new(LogStatusSurface),
    );

    agent.start().await;

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    agent.stop().await;
    Ok(())
}

fn cmd_status(config: &Config) -> Result<()> {
    println!("geotrace configuration");
    println!("======================");
    println!();
    println!("Device ID:         {}", display_or(&config.agent.device_id));
    println!("Server URL:        {}", display_or(&config.agent.server_url));
    println!("Interval:          {} ms", config.agent.interval_ms);
    println!("Battery threshold: {}%", config.agent.battery_threshold);

    match config.agent.validate() {
        Ok(()) => println!("Config:            ok"),
        Err(e) => println!("Config:            invalid ({e})"),
    }

    println!();
    println!("Battery level:     {}%", SysfsPowerMonitor::discover().level());
    println!();
    println!("Config path:       {}", Config::config_path().display());
    println!("Log path:          {}", Config::log_path().display());

    Ok(())
}

fn display_or(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}
