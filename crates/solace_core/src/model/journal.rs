//! Journal date keys.

use crate::model::validation::ValidationError;
use chrono::NaiveDate;

/// Document key format for journal entries.
pub const JOURNAL_KEY_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` journal key.
pub fn parse_date_key(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), JOURNAL_KEY_FORMAT)
        .map_err(|_| ValidationError::InvalidDateKey(value.to_string()))
}

/// Formats a date as its journal key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(JOURNAL_KEY_FORMAT).to_string()
}
