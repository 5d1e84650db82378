//! Content providers and delivery.
//!
//! # Responsibilities
//! - Define the narrow interfaces the run cycle consumes (fetch, enrich, notify)
//! - Provide thin HTTP and console implementations
//!
//! # Design Decisions
//! - Trait methods return boxed futures so implementations can live behind `Arc<dyn _>`
//! - Fetch failures carry the HTTP status when one was received, for retry classification
//! - Enrichment is best-effort and cannot fail the run

pub mod error;
pub mod http;
pub mod notifier;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::recommendation::Category;

pub use error::{FetchError, FetchErrorKind};
pub use http::HttpFetcher;
pub use notifier::{ConsoleNotifier, NotifyError, WebhookNotifier};

/// One suggestion as returned by a provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "title")]
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, alias = "description", alias = "overview")]
    pub summary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl RawItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            address: None,
            rating: None,
            summary: None,
            url: None,
        }
    }
}

/// Extra information about an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDetail {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Live source of suggestions for one category.
pub trait ContentFetcher: Send + Sync {
    fn category(&self) -> Category;

    /// Fetch one suggestion near `location`, when the provider is place-based.
    fn fetch<'a>(&'a self, location: Option<&'a str>) -> BoxFuture<'a, Result<RawItem, FetchError>>;
}

/// Best-effort detail lookup; `None` when unavailable for any reason.
pub trait DetailEnricher: Send + Sync {
    fn fetch_details<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Option<RawDetail>>;
}

/// Final delivery step.
///
/// `Ok` carries a confirmation message, `Err` the reason delivery failed.
pub trait Notifier: Send + Sync {
    fn send<'a>(&'a self, subject: &'a str, body: &'a str) -> BoxFuture<'a, Result<String, NotifyError>>;
}
