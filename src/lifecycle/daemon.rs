//! Long-running mode.
//!
//! # Data Flow
//! ```text
//! interval tick      → Orchestrator::run_once(false)
//! config file change → Scheduler::update_policy (+ tick interval)
//! shutdown signal    → finish current run, exit loop
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};

use crate::config::watcher::ConfigWatcher;
use crate::config::NudgeConfig;
use crate::lifecycle::shutdown::Shutdown;
use crate::orchestrator::Orchestrator;

pub struct Daemon {
    orchestrator: Orchestrator,
    config: NudgeConfig,
    config_path: Option<PathBuf>,
}

impl Daemon {
    pub fn new(orchestrator: Orchestrator, config: NudgeConfig, config_path: Option<PathBuf>) -> Self {
        Self {
            orchestrator,
            config,
            config_path,
        }
    }

    /// Tick until `shutdown` fires. Run failures are logged and the loop continues.
    pub async fn run(self, shutdown: Arc<Shutdown>) {
        let Self { orchestrator, mut config, config_path } = self;
        let mut shutdown_rx = shutdown.subscribe();

        // The watcher stops when its handle is dropped.
        let (_watcher, mut updates) = match config_path.filter(|p| p.exists()) {
            Some(path) => {
                let (watcher, rx) = ConfigWatcher::new(&path, config.clone());
                match watcher.run() {
                    Ok(handle) => (Some(handle), rx),
                    Err(e) => {
                        tracing::error!(error = %e, "Config watcher failed to start, reload disabled");
                        (None, rx)
                    }
                }
            }
            None => (None, mpsc::unbounded_channel().1),
        };

        let mut ticker = new_ticker(config.daemon.tick_secs);
        tracing::info!(tick_secs = config.daemon.tick_secs, "Daemon started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = orchestrator.run_once(false).await {
                        tracing::error!(error = %e, "Scheduled run failed");
                    }
                }
                Some(next) = updates.recv() => {
                    orchestrator.scheduler().update_policy(&next.schedule);
                    if next.daemon.tick_secs != config.daemon.tick_secs {
                        tracing::info!(tick_secs = next.daemon.tick_secs, "Tick interval changed");
                        ticker = new_ticker(next.daemon.tick_secs);
                    }
                    config = next;
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Daemon received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

fn new_ticker(tick_secs: u64) -> time::Interval {
    let mut ticker = time::interval(Duration::from_secs(tick_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}
