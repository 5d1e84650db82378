//! Delivery of finished recommendations.

use std::io::Write;
use futures_util::future::BoxFuture;
use serde_json::json;
use thiserror::Error;

use crate::provider::Notifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("delivery rejected with HTTP {status}")]
    Rejected { status: u16 },

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Prints recommendations to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn send<'a>(&'a self, subject: &'a str, body: &'a str) -> BoxFuture<'a, Result<String, NotifyError>> {
        Box::pin(async move {
            let mut out = std::io::stdout();
            writeln!(out, "{subject}\n\n{body}\n")?;
            out.flush()?;
            Ok("printed to console".to_string())
        })
    }
}

/// POSTs `{"subject", "text"}` to a webhook.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

impl Notifier for WebhookNotifier {
    fn send<'a>(&'a self, subject: &'a str, body: &'a str) -> BoxFuture<'a, Result<String, NotifyError>> {
        Box::pin(async move {
            let response = self
                .client
                .post(&self.url)
                .json(&json!({ "subject": subject, "text": body }))
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(NotifyError::Rejected { status: status.as_u16() });
            }
            Ok(format!("delivered to webhook (HTTP {})", status.as_u16()))
        })
    }
}
