//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap provider calls with a deadline
//! - Turn an elapsed deadline into a retryable `FetchError`
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - No separate cancellation path; a timeout is just another retryable failure

use std::future::Future;
use std::time::Duration;

use crate::provider::error::FetchError;

/// Await `fut`, failing with a `Timeout` error once `limit` elapses.
pub async fn with_timeout<T, Fut>(limit: Duration, fut: Fut) -> Result<T, FetchError>
where
    Fut: Future<Output = Result<T, FetchError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::timeout(format!("no response within {:?}", limit))),
    }
}
