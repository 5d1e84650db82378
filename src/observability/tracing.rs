//! Run correlation.
//!
//! Every orchestrated run gets a UUID v4 `run_id`; all events logged while
//! the run span is entered carry it.

use uuid::Uuid;

pub fn new_run_id() -> Uuid {
    Uuid::new_v4()
}

/// Span wrapping one run cycle.
pub fn run_span(run_id: &Uuid, forced: bool) -> ::tracing::Span {
    ::tracing::info_span!("run", run_id = %run_id, forced)
}
