//! `nudge` command-line entry point.
//!
//! # Architecture Overview
//!
//! ```text
//!   run / daemon tick
//!          │
//!          ▼
//!   ┌─────────────┐  not due / quiet   ┌──────────┐
//!   │  scheduler  │───────────────────▶│ skipped  │
//!   └──────┬──────┘                    └──────────┘
//!          │ ready
//!          ▼
//!   ┌─────────────┐  retry ▸ breaker ▸ timeout  ┌──────────────┐
//!   │ orchestrator│────────────────────────────▶│ live provider│
//!   └──────┬──────┘                             └──────────────┘
//!          │ failure / duplicate
//!          ▼
//!   ┌─────────────┐
//!   │  fallback   │
//!   └──────┬──────┘
//!          ▼
//!   notifier → history.add → scheduler.mark_sent → prune
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;

use nudge::config::load_effective;
use nudge::health::{self, render_report};
use nudge::lifecycle::{signals, startup, Daemon, Shutdown};
use nudge::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "nudge")]
#[command(about = "Scheduled restaurant, place and movie recommendations", long_about = None)]
struct Cli {
    /// Configuration file; defaults apply when it does not exist
    #[arg(short, long, global = true, default_value = "nudge.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one cycle now
    Run {
        /// Ignore cadence and quiet hours
        #[arg(long)]
        force: bool,
    },
    /// Show schedule and history state
    Status,
    /// Check providers and state stores
    Health,
    /// Remove old history entries
    Prune {
        /// Age limit in days; defaults to storage.prune_after_days
        #[arg(long)]
        days: Option<u32>,
    },
    /// Run on a timer until interrupted
    Daemon,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_effective(Some(&cli.config))?;
    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        config = ?cli.config,
        data_dir = ?config.storage.data_dir,
        cadence_days = config.schedule.cadence_days,
        "nudge v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let orchestrator = startup::build_orchestrator(&config);

    match cli.command {
        Commands::Run { force } => {
            let outcome = orchestrator.run_once(force).await?;
            println!("{outcome}");
        }
        Commands::Status => {
            let now = Local::now();
            let status = json!({
                "schedule": orchestrator.scheduler().summary(&now),
                "history": orchestrator.history().summary(now.with_timezone(&Utc)),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        Commands::Health => {
            let timeout = Duration::from_secs(config.fetch.timeout_secs);
            let results = health::run_all_checks(&orchestrator, &config.fetch.region, timeout).await;
            println!("{}", render_report(&results, Utc::now()));
        }
        Commands::Prune { days } => {
            let days = days.unwrap_or(config.storage.prune_after_days);
            let removed = orchestrator.history().prune_older_than(days, Utc::now())?;
            println!("Removed {removed} entries older than {days} days");
        }
        Commands::Daemon => {
            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse() {
                    Ok(addr) => metrics::init_metrics(addr),
                    Err(_) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        "Failed to parse metrics address"
                    ),
                }
            }

            let shutdown = Arc::new(Shutdown::new());
            signals::spawn_signal_handler(shutdown.clone());

            Daemon::new(orchestrator, config, Some(cli.config)).run(shutdown).await;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}
