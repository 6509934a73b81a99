//! Input validation errors shared by the domain model.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejected user or document input.
///
/// Validation failures are surfaced to the caller immediately and never
/// retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Mood label text is not one of the five recognized labels.
    InvalidMoodLabel(String),
    /// Mood key does not match `YYYY-MM-DD HH:MM`.
    InvalidTimestampKey(String),
    /// Journal key does not match `YYYY-MM-DD`.
    InvalidDateKey(String),
    /// Breathing technique violates duration/cycle invariants.
    InvalidTechnique { name: String, reason: String },
    /// Technique name is not part of the catalog.
    UnknownTechnique(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidMoodLabel(value) => write!(
                f,
                "invalid mood label `{value}`; expected Very Bad|Bad|Neutral|Good|Excellent"
            ),
            Self::InvalidTimestampKey(value) => {
                write!(f, "invalid mood timestamp `{value}`; expected YYYY-MM-DD HH:MM")
            }
            Self::InvalidDateKey(value) => {
                write!(f, "invalid journal date `{value}`; expected YYYY-MM-DD")
            }
            Self::InvalidTechnique { name, reason } => {
                write!(f, "invalid breathing technique `{name}`: {reason}")
            }
            Self::UnknownTechnique(value) => write!(f, "unknown breathing technique `{value}`"),
        }
    }
}

impl Error for ValidationError {}
