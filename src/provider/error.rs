//! Typed failure model for content providers.

use std::fmt;
use thiserror::Error;

/// Broad failure class, used when no HTTP status is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Timeout,
    Connection,
    /// Non-success HTTP response; `FetchError::status` carries the code.
    Http,
    Auth,
    Malformed,
    Other,
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FetchErrorKind::Timeout => "timeout",
            FetchErrorKind::Connection => "connection",
            FetchErrorKind::Http => "http",
            FetchErrorKind::Auth => "auth",
            FetchErrorKind::Malformed => "malformed",
            FetchErrorKind::Other => "other",
        };
        f.write_str(s)
    }
}

/// A failed call to a content provider.
#[derive(Debug, Clone, Error)]
#[error("{kind} error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
pub struct FetchError {
    pub kind: FetchErrorKind,
    /// HTTP status of the response, when one was received.
    pub status: Option<u16>,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FetchErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
        }
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self {
            kind: FetchErrorKind::Http,
            status: Some(code),
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Timeout, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Connection, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(FetchErrorKind::Malformed, message)
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            return FetchError::status(status.as_u16(), e.to_string());
        }
        if e.is_timeout() {
            FetchError::timeout(e.to_string())
        } else if e.is_connect() || e.is_request() {
            FetchError::connection(e.to_string())
        } else if e.is_decode() || e.is_body() {
            FetchError::malformed(e.to_string())
        } else {
            FetchError::new(FetchErrorKind::Other, e.to_string())
        }
    }
}
