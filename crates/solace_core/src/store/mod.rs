//! In-memory stores backed by whole-document persistence.
//!
//! # Responsibility
//! - Own mood and journal records exclusively.
//! - Persist the full document after every mutation.
//!
//! # Invariants
//! - A failed save rolls the in-memory mutation back and returns
//!   `StoreError::Persistence`.
//! - Stores are the sole writers of their documents.

use crate::model::validation::ValidationError;
use crate::repo::PersistenceError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod clock;
pub mod journal_store;
pub mod mood_store;

pub use clock::{system_clock, Clock, ManualClock, SharedClock, SystemClock};
pub use journal_store::{JournalDates, JournalDocument, JournalEntries, JournalStore};
pub use mood_store::{MoodDocEntry, MoodDocument, MoodRecords, MoodStore};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation failure.
#[derive(Debug)]
pub enum StoreError {
    Validation(ValidationError),
    Persistence(PersistenceError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PersistenceError> for StoreError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}
