//! JSON-over-HTTP content provider.
//!
//! # Data Flow
//! ```text
//! GET {base_url}?category=..&location=..
//!     → non-2xx  → FetchError with HTTP status
//!     → body     → single item, array of items, or {"results": [...]}
//!     → one item picked at random
//!
//! GET {base_url}/{id} → RawDetail (best-effort)
//! ```

use futures_util::future::BoxFuture;
use rand::Rng;
use serde_json::Value;
use url::Url;

use crate::provider::error::{FetchError, FetchErrorKind};
use crate::provider::{ContentFetcher, DetailEnricher, RawDetail, RawItem};
use crate::recommendation::Category;

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    category: Category,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(category: Category, base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), category, base_url)
    }

    pub fn with_client(client: reqwest::Client, category: Category, base_url: impl Into<String>) -> Self {
        Self {
            client,
            category,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, url: &str, query: &[(&str, &str)]) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .header("user-agent", concat!("nudge/", env!("CARGO_PKG_VERSION")))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unexpected status");
            return Err(FetchError::status(status.as_u16(), reason));
        }

        Ok(response.json::<Value>().await?)
    }

    async fn fetch_item(&self, location: Option<&str>) -> Result<RawItem, FetchError> {
        let mut query = vec![("category", self.category.as_str())];
        if let Some(location) = location {
            query.push(("location", location));
        }

        let body = self.get_json(&self.base_url, &query).await?;
        let mut items = parse_items(body)?;
        let index = rand::thread_rng().gen_range(0..items.len());

        tracing::debug!(category = %self.category, results = items.len(), "Provider returned results");
        Ok(items.swap_remove(index))
    }

    async fn fetch_detail(&self, id: &str) -> Result<RawDetail, FetchError> {
        let url = self.detail_url(id)?;
        let body = self.get_json(url.as_str(), &[]).await?;
        serde_json::from_value(body).map_err(|e| FetchError::malformed(e.to_string()))
    }

    /// `{base_url}/{id}` with `id` encoded as a single path segment.
    fn detail_url(&self, id: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FetchError::new(FetchErrorKind::Other, format!("invalid provider url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::new(FetchErrorKind::Other, "provider url cannot take a path"))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }
}

/// Accept a single item, a bare array, or an object with a `results` array.
fn parse_items(body: Value) -> Result<Vec<RawItem>, FetchError> {
    let list = match body {
        Value::Array(list) => list,
        Value::Object(mut map) if map.get("results").map_or(false, Value::is_array) => {
            match map.remove("results") {
                Some(Value::Array(list)) => list,
                _ => Vec::new(),
            }
        }
        other => vec![other],
    };

    let items = list
        .into_iter()
        .map(serde_json::from_value::<RawItem>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| FetchError::malformed(format!("unexpected item shape: {e}")))?;

    let items: Vec<_> = items.into_iter().filter(|i| !i.name.trim().is_empty()).collect();
    if items.is_empty() {
        return Err(FetchError::malformed("provider returned no results"));
    }
    Ok(items)
}

impl ContentFetcher for HttpFetcher {
    fn category(&self) -> Category {
        self.category
    }

    fn fetch<'a>(&'a self, location: Option<&'a str>) -> BoxFuture<'a, Result<RawItem, FetchError>> {
        Box::pin(self.fetch_item(location))
    }
}

impl DetailEnricher for HttpFetcher {
    fn fetch_details<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Option<RawDetail>> {
        Box::pin(async move {
            match self.fetch_detail(id).await {
                Ok(detail) => Some(detail),
                Err(e) => {
                    tracing::warn!(category = %self.category, id, error = %e, "Detail lookup failed, using basic item");
                    None
                }
            }
        })
    }
}
