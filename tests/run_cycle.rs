//! Full run cycles against file-backed state and mock HTTP collaborators.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use nudge::config::NudgeConfig;
use nudge::history::HistoryStore;
use nudge::lifecycle::startup::build_orchestrator;
use nudge::orchestrator::RunOutcome;
use nudge::recommendation::{Category, FallbackReason, Source};
use nudge::storage::JsonFileStore;

mod common;

fn noon(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, day, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn test_live_send_then_cadence_then_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let movies = common::start_programmable_backend(|req| async move {
        if req.path.starts_with("/movies/550") {
            (200, r#"{"description":"An insomniac meets a soap salesman.","highlights":["1999"]}"#.to_string())
        } else {
            (200, r#"{"results":[{"id":"550","title":"Fight Club","rating":8.4}]}"#.to_string())
        }
    })
    .await;
    let (webhook, delivered) = common::start_recording_backend().await;

    let mut config = NudgeConfig::default();
    config.storage.data_dir = dir.path().to_path_buf();
    config.fetch.movie_url = Some(format!("http://{movies}/movies"));
    config.notify.webhook_url = Some(format!("http://{webhook}/hook"));

    // Restaurant and poi have history inside the rotation window, so movie is picked first.
    let history = HistoryStore::open(JsonFileStore::new(config.storage.history_path()));
    history.add(Category::Restaurant, "Husk Restaurant", "", noon(1) - Duration::days(3)).unwrap();
    history.add(Category::PointOfInterest, "The Battery", "", noon(1) - Duration::days(2)).unwrap();
    drop(history);

    let orchestrator = build_orchestrator(&config);

    let outcome = orchestrator.run_at(noon(1), false).await.unwrap();
    assert_eq!(outcome, RunOutcome::Sent {
        category: Category::Movie,
        name: "Fight Club".into(),
        source: Source::Live,
    });

    {
        let delivered = delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        let payload: Value = serde_json::from_str(&delivered[0].body).unwrap();
        assert_eq!(payload["subject"], "Movie night idea: Fight Club");
        let text = payload["text"].as_str().unwrap();
        assert!(text.contains("An insomniac meets a soap salesman."));
        assert!(text.contains("- 1999"));
    }

    // State is on disk.
    let stored: Value =
        serde_json::from_str(&std::fs::read_to_string(config.storage.schedule_path()).unwrap()).unwrap();
    assert!(stored["last_sent_at"].is_string());
    let reopened = HistoryStore::open(JsonFileStore::new(config.storage.history_path()));
    assert!(reopened.contains(Category::Movie, "fight club"));

    // Inside the cadence nothing is sent.
    let outcome = orchestrator.run_at(noon(3), false).await.unwrap();
    assert!(matches!(outcome, RunOutcome::Skipped { ref reason } if reason.starts_with("Not due yet")));
    assert_eq!(delivered.lock().unwrap().len(), 1);

    // A week later the least-recent category without a provider gets a backup pick.
    let outcome = orchestrator.run_at(noon(8), false).await.unwrap();
    match outcome {
        RunOutcome::Sent { category, name, source } => {
            assert_eq!(category, Category::Restaurant);
            assert_eq!(source, Source::Fallback { reason: FallbackReason::Unconfigured });
            assert_ne!(name, "Husk Restaurant");
        }
        other => panic!("expected a send, got {other:?}"),
    }
    assert_eq!(delivered.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_rejected_delivery_keeps_schedule() {
    let dir = tempfile::tempdir().unwrap();
    let webhook = common::start_mock_backend(500, "{}").await;

    let mut config = NudgeConfig::default();
    config.storage.data_dir = dir.path().to_path_buf();
    config.notify.webhook_url = Some(format!("http://{webhook}/hook"));

    let orchestrator = build_orchestrator(&config);
    let outcome = orchestrator.run_at(noon(1), false).await.unwrap();

    assert_eq!(outcome, RunOutcome::NotifyFailed { message: "delivery rejected with HTTP 500".into() });
    assert!(!config.storage.schedule_path().exists());
    assert!(orchestrator.history().is_empty());
    assert!(orchestrator.scheduler().is_due(noon(1)));
}
