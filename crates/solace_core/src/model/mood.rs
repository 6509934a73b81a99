//! Mood domain model.
//!
//! # Responsibility
//! - Define the five-step mood scale and its fixed sentiment mapping.
//! - Define minute-precision timestamps used as mood document keys.
//!
//! # Invariants
//! - `MoodTimestamp` never carries seconds or sub-second precision.
//! - `MoodRecord::notes` is `None` for blank input, never `Some("")`.
//! - `sentiment_score` stays within `[-1, 1]`.

use crate::model::validation::ValidationError;
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Document key format for mood records.
pub const MOOD_KEY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Five-step mood scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MoodLabel {
    #[serde(rename = "Very Bad")]
    VeryBad,
    Bad,
    Neutral,
    Good,
    Excellent,
}

impl MoodLabel {
    /// All labels from worst to best.
    pub const ALL: [MoodLabel; 5] = [
        MoodLabel::VeryBad,
        MoodLabel::Bad,
        MoodLabel::Neutral,
        MoodLabel::Good,
        MoodLabel::Excellent,
    ];

    /// Display name, also used as the persisted `mood` value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryBad => "Very Bad",
            Self::Bad => "Bad",
            Self::Neutral => "Neutral",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }

    /// Score used when a record carries no notes.
    pub fn fixed_score(self) -> f64 {
        match self {
            Self::VeryBad => -1.0,
            Self::Bad => -0.5,
            Self::Neutral => 0.0,
            Self::Good => 0.5,
            Self::Excellent => 1.0,
        }
    }
}

impl Display for MoodLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoodLabel {
    type Err = ValidationError;

    /// Accepts `Very Bad`, `VeryBad`, `very_bad` and `very-bad` style input,
    /// case-insensitive.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let folded: String = value
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "verybad" => Ok(Self::VeryBad),
            "bad" => Ok(Self::Bad),
            "neutral" => Ok(Self::Neutral),
            "good" => Ok(Self::Good),
            "excellent" => Ok(Self::Excellent),
            _ => Err(ValidationError::InvalidMoodLabel(value.trim().to_string())),
        }
    }
}

/// Minute-precision local timestamp used as the mood record key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoodTimestamp(NaiveDateTime);

impl MoodTimestamp {
    /// Truncates `value` to the start of its minute.
    pub fn from_datetime(value: NaiveDateTime) -> Self {
        let truncated = value
            .with_second(0)
            .and_then(|v| v.with_nanosecond(0))
            .unwrap_or(value);
        Self(truncated)
    }

    /// Parses a `YYYY-MM-DD HH:MM` document key.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        NaiveDateTime::parse_from_str(value.trim(), MOOD_KEY_FORMAT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidTimestampKey(value.to_string()))
    }

    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// Document key form.
    pub fn key(&self) -> String {
        self.0.format(MOOD_KEY_FORMAT).to_string()
    }
}

impl Display for MoodTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(MOOD_KEY_FORMAT))
    }
}

/// One mood check-in.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodRecord {
    pub timestamp: MoodTimestamp,
    pub label: MoodLabel,
    pub notes: Option<String>,
    pub sentiment_score: f64,
}

/// Returns notes only when they carry non-whitespace text.
pub fn non_blank_notes(notes: Option<&str>) -> Option<&str> {
    notes.filter(|text| !text.trim().is_empty())
}
