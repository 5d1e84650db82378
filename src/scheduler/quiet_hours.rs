//! Quiet-hours window arithmetic.

use chrono::Timelike;

/// Whether `hour` falls inside the quiet window `[start, end)`.
///
/// A window with `start > end` wraps midnight. `start == end` is an empty window.
pub fn is_quiet_hour(hour: u32, start: u32, end: u32) -> bool {
    if start > end {
        hour >= start || hour < end
    } else {
        start <= hour && hour < end
    }
}

/// Whether the wall-clock hour of `at` falls inside the quiet window.
pub fn is_quiet_hours<T: Timelike>(at: &T, start: u32, end: u32) -> bool {
    is_quiet_hour(at.hour(), start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_window_wrapping_midnight() {
        assert!(is_quiet_hour(23, 23, 7));
        assert!(is_quiet_hour(0, 23, 7));
        assert!(is_quiet_hour(6, 23, 7));
        assert!(!is_quiet_hour(7, 23, 7));
        assert!(!is_quiet_hour(10, 23, 7));
        assert!(!is_quiet_hour(22, 23, 7));
    }

    #[test]
    fn test_window_within_one_day() {
        assert!(!is_quiet_hour(12, 13, 15));
        assert!(is_quiet_hour(13, 13, 15));
        assert!(is_quiet_hour(14, 13, 15));
        assert!(!is_quiet_hour(15, 13, 15));
    }

    #[test]
    fn test_empty_window() {
        for hour in 0..24 {
            assert!(!is_quiet_hour(hour, 9, 9));
        }
    }

    #[test]
    fn test_uses_wall_clock_hour() {
        let late = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
        let morning = NaiveTime::from_hms_opt(7, 0, 0).unwrap();
        assert!(is_quiet_hours(&late, 23, 7));
        assert!(!is_quiet_hours(&morning, 23, 7));
    }
}
