//! Live provider calls through retry, breaker and fallback against a mock HTTP backend.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use nudge::fallback::FallbackProvider;
use nudge::orchestrator::CategoryPipeline;
use nudge::provider::{ContentFetcher, DetailEnricher, FetchErrorKind, HttpFetcher};
use nudge::recommendation::{Category, FallbackReason, RunContext, Season, Source, TimeOfDay};
use nudge::resilience::{BreakerPhase, CircuitBreaker, RetryPolicy};

mod common;

fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay: Duration::from_millis(20),
        max_delay: Duration::from_millis(200),
        jitter: false,
    }
}

#[tokio::test]
async fn test_retry_until_backend_recovers() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let addr = common::start_programmable_backend(move |_| {
        let counter = counter.clone();
        async move {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                (503, r#"{"error":"unavailable"}"#.to_string())
            } else {
                (200, r#"[{"id":"7","name":"Leon's Oyster Shop","rating":4.6}]"#.to_string())
            }
        }
    })
    .await;

    let fetcher = Arc::new(HttpFetcher::new(Category::Restaurant, format!("http://{addr}/places")));
    let breaker = Arc::new(CircuitBreaker::new("restaurant", 5, Duration::from_secs(300)));
    let pipeline = CategoryPipeline::new(fetcher, breaker.clone(), fast_retry(3), Duration::from_secs(5));

    let live = pipeline.fetch(Some("Charleston, SC")).await.expect("third attempt succeeds");
    assert_eq!(live.item.name, "Leon's Oyster Shop");
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert_eq!(breaker.phase(), BreakerPhase::Closed);
    assert_eq!(breaker.state().consecutive_failures, 0);
}

#[tokio::test]
async fn test_open_breaker_short_circuits_to_fallback() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let addr = common::start_programmable_backend(move |_| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (500, "{}".to_string())
        }
    })
    .await;

    let fetcher = Arc::new(HttpFetcher::new(Category::Movie, format!("http://{addr}/movies")));
    let breaker = Arc::new(CircuitBreaker::new("movie", 3, Duration::from_secs(300)));
    let pipeline = CategoryPipeline::new(fetcher, breaker.clone(), fast_retry(3), Duration::from_secs(5));

    let reason = pipeline.fetch(None).await.unwrap_err();
    assert_eq!(reason, FallbackReason::RetryExhausted);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    assert_eq!(breaker.phase(), BreakerPhase::Open);

    // Within the recovery timeout the provider is not called at all.
    let reason = pipeline.fetch(None).await.unwrap_err();
    assert_eq!(reason, FallbackReason::CircuitOpen);
    assert_eq!(hits.load(Ordering::SeqCst), 3);

    let ctx = RunContext::new(Season::Fall, TimeOfDay::Evening);
    let rec = FallbackProvider::new().get_fallback(Category::Movie, &ctx, reason);
    assert_eq!(rec.category, Category::Movie);
    assert!(!rec.text.is_empty());
    assert_eq!(rec.source, Source::Fallback { reason: FallbackReason::CircuitOpen });
}

#[tokio::test]
async fn test_auth_failure_is_not_retried() {
    let hits = Arc::new(AtomicU32::new(0));
    let counter = hits.clone();
    let addr = common::start_programmable_backend(move |_| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            (401, r#"{"error":"bad key"}"#.to_string())
        }
    })
    .await;

    let fetcher = Arc::new(HttpFetcher::new(Category::PointOfInterest, format!("http://{addr}/poi")));
    let breaker = Arc::new(CircuitBreaker::new("poi", 3, Duration::from_secs(300)));
    let pipeline = CategoryPipeline::new(fetcher, breaker, fast_retry(4), Duration::from_secs(5));

    assert_eq!(pipeline.fetch(None).await.unwrap_err(), FallbackReason::Fatal);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fetcher_surfaces_status_and_query() {
    let (addr, seen) = common::start_recording_backend().await;
    let fetcher = HttpFetcher::new(Category::Restaurant, format!("http://{addr}/places"));

    // The recording backend answers `{}`, which has no usable item.
    let err = fetcher.fetch(Some("Charleston, SC")).await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::Malformed);

    let requests = seen.lock().unwrap();
    assert_eq!(requests[0].method, "GET");
    assert!(requests[0].path.starts_with("/places?"));
    assert!(requests[0].path.contains("category=restaurant"));
    assert!(requests[0].path.contains("location=Charleston%2C+SC"));

    let addr = common::start_mock_backend(503, "{}").await;
    let err = HttpFetcher::new(Category::Movie, format!("http://{addr}"))
        .fetch(None)
        .await
        .unwrap_err();
    assert_eq!(err.status, Some(503));
}

#[tokio::test]
async fn test_unreachable_provider_is_a_connection_error() {
    // Nothing listens on the discard port.
    let fetcher = HttpFetcher::new(Category::Movie, "http://127.0.0.1:9/movies");
    let err = fetcher.fetch(None).await.unwrap_err();
    assert_eq!(err.kind, FetchErrorKind::Connection);
}

#[tokio::test]
async fn test_detail_lookup_keeps_id_in_one_path_segment() {
    let (addr, seen) = common::start_recording_backend().await;
    let fetcher = HttpFetcher::new(Category::Movie, format!("http://{addr}/movies"));

    // `{}` is a valid, empty detail document.
    let detail = fetcher.fetch_details("tt/0093779?lang=en").await.expect("detail parsed");
    assert!(detail.description.is_none());

    let requests = seen.lock().unwrap();
    assert_eq!(requests[0].path, "/movies/tt%2F0093779%3Flang=en");
}
