//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config → stores, breakers, providers → Orchestrator
//!
//! Daemon (daemon.rs):
//!     Tick → run_once; config change → schedule policy swap
//!
//! Signals (signals.rs) → Shutdown (shutdown.rs):
//!     SIGTERM/SIGINT → broadcast → daemon loop exits
//! ```
//!
//! # Design Decisions
//! - Components are wired once, in dependency order
//! - A run in progress is allowed to finish before the daemon exits

pub mod daemon;
pub mod shutdown;
pub mod signals;
pub mod startup;

pub use daemon::Daemon;
pub use shutdown::Shutdown;
