//! Deskwatch CLI
//!
//! Run the desktop folder check once, on an interval, or inspect its state.

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use deskwatch::{run_cycle, Config, EmissionLog, MetricsSink, StateStore, StatsdSink, TracingSink};

#[derive(Parser)]
#[command(name = "deskwatch")]
#[command(about = "Desktop folder monitoring check with change-or-heartbeat emissions")]
#[command(version)]
struct Cli {
    /// Config file path (default: ~/.config/deskwatch/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one poll cycle
    Check {
        /// Print the cycle outcome as JSON
        #[arg(long)]
        json: bool,
        /// Log the gauge instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Run poll cycles on an interval until interrupted
    Watch {
        /// Seconds between cycles
        #[arg(long, default_value_t = 300)]
        interval: u64,
    },
    /// Show the persisted state and recent emissions
    Status {
        /// Output JSON format
        #[arg(long)]
        json: bool,
        /// How many recent emissions to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Print the effective configuration
    Config,
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("deskwatch=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();
}

fn build_sink(config: &Config, dry_run: bool) -> Box<dyn MetricsSink> {
    if dry_run {
        return Box::new(TracingSink);
    }
    match &config.statsd_addr {
        Some(addr) => match StatsdSink::new(addr) {
            Ok(sink) => Box::new(sink),
            Err(e) => {
                warn!(addr = %addr, error = %e, "Could not open statsd socket, logging gauges instead");
                Box::new(TracingSink)
            }
        },
        None => Box::new(TracingSink),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path);

    match cli.command {
        Commands::Check { json, dry_run } => {
            let sink = build_sink(&config, dry_run);
            let outcome = run_cycle(&config, sink.as_ref(), Utc::now().timestamp());

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else if let Some(reason) = &outcome.reason {
                println!("{} [{}] {}", outcome.host, outcome.status, reason);
            } else {
                println!(
                    "{} [{}] count={}, nothing to report",
                    outcome.host, outcome.status, outcome.observed_count
                );
            }
        }
        Commands::Watch { interval } => {
            let sink = build_sink(&config, false);
            info!(interval_secs = interval, "Starting watch loop");

            let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let outcome = run_cycle(&config, sink.as_ref(), Utc::now().timestamp());
                        if let Some(e) = &outcome.state_write_error {
                            error!(error = %e, "State not persisted; change will be re-detected next cycle");
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("Interrupted, stopping watch loop");
                        break;
                    }
                }
            }
        }
        Commands::Status { json, limit } => {
            let state = StateStore::new(&config.state_file).load();
            let log = EmissionLog::new(&config.emission_log, config.log_format);
            let recent = log.read_recent(limit);

            if json {
                let out = serde_json::json!({
                    "state": state,
                    "recent_emissions": recent,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                match &state {
                    Some(s) => println!(
                        "last_count={}, last_logged={}",
                        s.last_count
                            .map(|c| c.to_string())
                            .unwrap_or_else(|| "unset".to_string()),
                        s.last_logged
                    ),
                    None => println!("No state recorded yet"),
                }
                if recent.is_empty() {
                    println!("No recent emissions");
                } else {
                    for record in &recent {
                        println!("{}", record.render_line());
                    }
                }
            }
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
