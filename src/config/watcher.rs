//! Configuration file watcher for daemon-mode reload.

use std::path::{Path, PathBuf};
use std::time::Duration;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use crate::config::loader::load_effective;
use crate::config::schema::NudgeConfig;

/// Watches the configuration file and publishes each changed, valid revision.
pub struct ConfigWatcher {
    path: PathBuf,
    current: NudgeConfig,
    update_tx: mpsc::UnboundedSender<NudgeConfig>,
}

impl ConfigWatcher {
    /// Create a watcher seeded with the configuration already in use.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path, current: NudgeConfig) -> (Self, mpsc::UnboundedReceiver<NudgeConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (Self {
            path: path.to_path_buf(),
            current,
            update_tx,
        }, update_rx)
    }

    /// Start watching; the returned handle must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, mut current, update_tx } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!(error = ?e, "Config watch error");
                    return;
                }
            };
            if !(event.kind.is_modify() || event.kind.is_create()) {
                return;
            }

            match load_effective(Some(&path)) {
                // Editors often emit several events per save.
                Ok(next) if next == current => {}
                Ok(next) => {
                    if next.schedule != current.schedule {
                        tracing::info!(schedule = ?next.schedule, "Schedule settings changed");
                    }
                    if next.retry != current.retry || next.breaker != current.breaker {
                        tracing::warn!("Resilience settings changed; they apply after restart");
                    }
                    current = next.clone();
                    let _ = update_tx.send(next);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
                }
            }
        }, Config::default().with_poll_interval(Duration::from_secs(2)))?;

        watcher.watch(&watched, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?watched, "Config watcher started");
        Ok(watcher)
    }
}
