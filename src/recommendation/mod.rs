//! Recommendation domain: categories, results and run context.

pub mod context;
pub mod types;

pub use context::{RunContext, Season, TimeOfDay};
pub use types::{Category, FallbackReason, Recommendation, Source, UnknownCategory};
