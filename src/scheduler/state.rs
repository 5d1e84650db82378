//! Persisted schedule state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// When the last recommendation went out and when the next one is due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleState {
    pub last_sent_at: Option<DateTime<Utc>>,
    pub next_due_at: Option<DateTime<Utc>>,
}

impl ScheduleState {
    /// State after a send at `now`.
    ///
    /// `next_due_at` is `None` when the cadence reaches past the representable range.
    pub fn sent_at(now: DateTime<Utc>, cadence: Duration) -> Self {
        Self {
            last_sent_at: Some(now),
            next_due_at: now.checked_add_signed(cadence),
        }
    }

    /// True if nothing was ever sent, or `cadence` has elapsed since the last send.
    pub fn is_due(&self, now: DateTime<Utc>, cadence: Duration) -> bool {
        match self.last_sent_at {
            None => true,
            Some(last) => now - last >= cadence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_due_boundary() {
        let sent = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let state = ScheduleState::sent_at(sent, Duration::days(7));

        assert_eq!(state.next_due_at, Some(sent + Duration::days(7)));
        assert!(!state.is_due(sent + Duration::days(7) - Duration::seconds(1), Duration::days(7)));
        assert!(state.is_due(sent + Duration::days(7), Duration::days(7)));
        assert!(ScheduleState::default().is_due(sent, Duration::days(7)));
    }

    #[test]
    fn test_cadence_beyond_calendar_is_never_due() {
        let sent = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let cadence = Duration::days(200_000_000);
        let state = ScheduleState::sent_at(sent, cadence);

        assert_eq!(state.last_sent_at, Some(sent));
        assert_eq!(state.next_due_at, None);
        assert!(!state.is_due(sent + Duration::days(365 * 1000), cadence));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ScheduleState::default()).unwrap();
        assert_eq!(json, serde_json::json!({ "last_sent_at": null, "next_due_at": null }));
    }
}
