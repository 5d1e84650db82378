//! Season and time-of-day context for a run.

use std::fmt;
use chrono::{Datelike, Timelike};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Meteorological season for a month (1-12).
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
            Season::Winter => "winter",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    LateNight,
}

impl TimeOfDay {
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=10 => TimeOfDay::Morning,
            11..=16 => TimeOfDay::Afternoon,
            17..=22 => TimeOfDay::Evening,
            _ => TimeOfDay::LateNight,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::LateNight => "late night",
        };
        f.write_str(s)
    }
}

/// Season and time of day at the moment a run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunContext {
    pub season: Season,
    pub time_of_day: TimeOfDay,
}

impl RunContext {
    pub fn new(season: Season, time_of_day: TimeOfDay) -> Self {
        Self { season, time_of_day }
    }

    /// Derive the context from a local wall-clock time.
    pub fn at<T: Datelike + Timelike>(at: &T) -> Self {
        Self {
            season: Season::from_month(at.month()),
            time_of_day: TimeOfDay::from_hour(at.hour()),
        }
    }
}
