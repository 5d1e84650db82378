//! Core recommendation types.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Restaurant,
    #[serde(rename = "poi")]
    PointOfInterest,
    Movie,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Restaurant, Category::PointOfInterest, Category::Movie];

    /// Location sent to this category's provider; only place-based categories take one.
    pub fn location<'a>(&self, region: &'a str) -> Option<&'a str> {
        match self {
            Category::Restaurant | Category::PointOfInterest => Some(region),
            Category::Movie => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Restaurant => "restaurant",
            Category::PointOfInterest => "poi",
            Category::Movie => "movie",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category '{0}' (expected restaurant, poi or movie)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restaurant" => Ok(Category::Restaurant),
            "poi" | "point_of_interest" | "attraction" => Ok(Category::PointOfInterest),
            "movie" => Ok(Category::Movie),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Why the fallback catalog answered instead of a live provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No provider configured for the category.
    Unconfigured,
    RetryExhausted,
    CircuitOpen,
    /// Non-retryable provider failure.
    Fatal,
    /// Every live result had already been sent.
    Duplicate,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::Unconfigured => "unconfigured",
            FallbackReason::RetryExhausted => "retry_exhausted",
            FallbackReason::CircuitOpen => "circuit_open",
            FallbackReason::Fatal => "fatal",
            FallbackReason::Duplicate => "duplicate",
        }
    }
}

/// Where a recommendation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Source {
    Live,
    Fallback { reason: FallbackReason },
}

/// A finished, send-ready recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub category: Category,
    pub name: String,
    pub text: String,
    pub source: Source,
}

impl Recommendation {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, Source::Fallback { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_text() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
            assert_eq!(
                serde_json::to_string(&category).unwrap(),
                format!("\"{}\"", category.as_str())
            );
        }
        assert_eq!("Attraction".parse::<Category>(), Ok(Category::PointOfInterest));
        assert!("museum".parse::<Category>().is_err());
    }

    #[test]
    fn test_only_places_take_a_location() {
        assert_eq!(Category::Restaurant.location("Charleston, SC"), Some("Charleston, SC"));
        assert_eq!(Category::PointOfInterest.location("Charleston, SC"), Some("Charleston, SC"));
        assert_eq!(Category::Movie.location("Charleston, SC"), None);
    }

    #[test]
    fn test_unknown_category_message() {
        let err = "museum".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("museum".into()));
        assert_eq!(err.to_string(), "unknown category 'museum' (expected restaurant, poi or movie)");
    }
}
