//! Aggregation query: destination, travel theme and date range

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::PlannerError;

/// Travel-interest category used to filter and classify results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Cultural,
    Adventure,
    Spiritual,
    Luxury,
    Food,
    Any,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Cultural,
        Theme::Adventure,
        Theme::Spiritual,
        Theme::Luxury,
        Theme::Food,
        Theme::Any,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Cultural => "cultural",
            Theme::Adventure => "adventure",
            Theme::Spiritual => "spiritual",
            Theme::Luxury => "luxury",
            Theme::Food => "food",
            Theme::Any => "any",
        }
    }

    /// Short description shown by the themes endpoint
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Theme::Cultural => "Museums, heritage sites and local traditions",
            Theme::Adventure => "Outdoor sports and thrilling activities",
            Theme::Spiritual => "Temples, retreats and places of reflection",
            Theme::Luxury => "Premium accommodations and fine dining",
            Theme::Food => "Local cuisine, markets and food tours",
            Theme::Any => "A bit of everything",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Theme::ALL
            .into_iter()
            .find(|theme| theme.as_str() == normalized)
            .ok_or_else(|| {
                PlannerError::validation(format!(
                    "Unknown theme '{s}'. Must be one of: cultural, adventure, spiritual, luxury, food, any"
                ))
            })
    }
}

/// Part of the day an activity is best suited for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Any,
}

impl TimeOfDay {
    /// Bucket a local start hour: 6-11 morning, 12-17 afternoon, otherwise evening
    #[must_use]
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }
}

/// Inclusive travel date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> crate::Result<Self> {
        if end < start {
            return Err(PlannerError::validation(format!(
                "End date {end} is before start date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parse a pair of `YYYY-MM-DD` strings
    pub fn parse(start: &str, end: &str) -> crate::Result<Self> {
        let parse = |value: &str| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
                PlannerError::validation(format!("Invalid date '{value}', expected YYYY-MM-DD"))
            })
        };
        Self::new(parse(start)?, parse(end)?)
    }

    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// One aggregation request. Constructed once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    destination: String,
    theme: Theme,
    date_range: DateRange,
}

impl Query {
    pub fn new<S: Into<String>>(
        destination: S,
        theme: Theme,
        date_range: DateRange,
    ) -> crate::Result<Self> {
        let destination = destination.into().trim().to_string();
        if destination.is_empty() {
            return Err(PlannerError::validation("Destination cannot be empty"));
        }
        Ok(Self {
            destination,
            theme,
            date_range,
        })
    }

    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn date_range(&self) -> DateRange {
        self.date_range
    }
}
