//! Companion use-case service.
//!
//! # Responsibility
//! - Expose one explicit handler per user action over the stores and the
//!   breathing engine.
//! - Parse raw user input (labels, date keys, technique names) at the edge.
//! - Own the process-lifetime breathing session counter.
//!
//! # Invariants
//! - Handlers never bypass store validation or persistence contracts.
//! - `clear_all_data` empties both documents and resets the session counter.

use crate::breathing::{
    run_session, BreathingSession, CancellationToken, RunOutcome, SessionEvent, SessionTracker,
    Ticker,
};
use crate::export::ExportDocument;
use crate::insights::{mood_series, prompt_for_date, ChartPoint, DashboardSummary};
use crate::model::breathing::{find_technique, BreathingTechnique};
use crate::model::journal::parse_date_key;
use crate::model::mood::{MoodLabel, MoodRecord};
use crate::model::validation::ValidationError;
use crate::repo::{DocumentGateway, PersistenceError};
use crate::store::{system_clock, JournalStore, MoodStore, SharedClock, StoreError};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for companion use-cases.
#[derive(Debug)]
pub enum CompanionError {
    /// User input failed validation.
    Validation(ValidationError),
    /// Store or document persistence failure.
    Store(StoreError),
}

impl Display for CompanionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CompanionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for CompanionError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for CompanionError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

impl From<PersistenceError> for CompanionError {
    fn from(value: PersistenceError) -> Self {
        Self::Store(StoreError::Persistence(value))
    }
}

pub type CompanionResult<T> = Result<T, CompanionError>;

/// Load problems reported by `CompanionService::open_or_empty`.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub mood: Option<StoreError>,
    pub journal: Option<StoreError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.mood.is_none() && self.journal.is_none()
    }
}

/// Command handlers over mood, journal and breathing features.
pub struct CompanionService<M: DocumentGateway, J: DocumentGateway> {
    moods: MoodStore<M>,
    journal: JournalStore<J>,
    tracker: SessionTracker,
    clock: SharedClock,
}

impl<M: DocumentGateway, J: DocumentGateway> CompanionService<M, J> {
    /// Composes already-opened stores.
    pub fn new(moods: MoodStore<M>, journal: JournalStore<J>) -> Self {
        Self {
            moods,
            journal,
            tracker: SessionTracker::new(),
            clock: system_clock(),
        }
    }

    /// Opens both stores strictly.
    pub fn open(mood_gateway: M, journal_gateway: J) -> CompanionResult<Self> {
        let moods = MoodStore::open(mood_gateway)?;
        let journal = JournalStore::open(journal_gateway)?;
        Ok(Self::new(moods, journal))
    }

    /// Opens both stores, replacing unreadable documents with empty stores.
    pub fn open_or_empty(mood_gateway: M, journal_gateway: J) -> (Self, LoadReport) {
        let (moods, mood_error) = MoodStore::open_or_empty(mood_gateway);
        let (journal, journal_error) = JournalStore::open_or_empty(journal_gateway);
        let report = LoadReport {
            mood: mood_error,
            journal: journal_error,
        };
        (Self::new(moods, journal), report)
    }

    /// Uses `clock` for mood timestamps and "today".
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.moods = self.moods.with_clock(clock.clone());
        self.clock = clock;
        self
    }

    pub fn moods(&self) -> &MoodStore<M> {
        &self.moods
    }

    pub fn moods_mut(&mut self) -> &mut MoodStore<M> {
        &mut self.moods
    }

    pub fn journal(&self) -> &JournalStore<J> {
        &self.journal
    }

    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    /// Records a mood from raw label text and optional notes.
    pub fn record_mood(&mut self, label: &str, notes: Option<&str>) -> CompanionResult<MoodRecord> {
        let label: MoodLabel = label.parse()?;
        Ok(self.moods.record(label, notes)?)
    }

    /// Dashboard quick check-in: label only.
    pub fn quick_mood(&mut self, label: &str) -> CompanionResult<MoodRecord> {
        self.record_mood(label, None)
    }

    /// Saves the entry for a `YYYY-MM-DD` date key.
    pub fn save_journal(&mut self, date: &str, content: &str) -> CompanionResult<NaiveDate> {
        let date = parse_date_key(date)?;
        self.journal.save(date, content)?;
        Ok(date)
    }

    /// Saves today's entry.
    pub fn save_today(&mut self, content: &str) -> CompanionResult<NaiveDate> {
        let today = self.today();
        self.journal.save(today, content)?;
        Ok(today)
    }

    pub fn journal_entry(&self, date: &str) -> CompanionResult<Option<String>> {
        let date = parse_date_key(date)?;
        Ok(self.journal.get(date).map(str::to_string))
    }

    /// Deletes an entry; `Ok(false)` when the date had none.
    pub fn delete_journal(&mut self, date: &str) -> CompanionResult<bool> {
        let date = parse_date_key(date)?;
        Ok(self.journal.delete(date)?)
    }

    /// Runs a catalog technique by name or alias.
    pub fn run_breathing<T, F>(
        &mut self,
        technique: &str,
        ticker: &mut T,
        cancel: &CancellationToken,
        on_event: F,
    ) -> CompanionResult<RunOutcome>
    where
        T: Ticker + ?Sized,
        F: FnMut(&SessionEvent),
    {
        let technique = find_technique(technique)?;
        self.run_technique(technique, ticker, cancel, on_event)
    }

    /// Runs an arbitrary technique.
    pub fn run_technique<T, F>(
        &mut self,
        technique: BreathingTechnique,
        ticker: &mut T,
        cancel: &CancellationToken,
        on_event: F,
    ) -> CompanionResult<RunOutcome>
    where
        T: Ticker + ?Sized,
        F: FnMut(&SessionEvent),
    {
        let session = BreathingSession::start(technique)?;
        Ok(run_session(
            session,
            ticker,
            cancel,
            &mut self.tracker,
            on_event,
        ))
    }

    /// Both documents as one export payload.
    pub fn export(&self) -> ExportDocument {
        ExportDocument {
            journal_entries: self.journal.document(),
            mood_entries: self.moods.document(),
        }
    }

    pub fn export_json(&self) -> CompanionResult<String> {
        Ok(self.export().to_json()?)
    }

    /// Deletes all mood and journal data and resets the session counter.
    ///
    /// Stops at the first store that fails to persist; that store keeps its
    /// data and the counter is left untouched.
    pub fn clear_all_data(&mut self) -> CompanionResult<()> {
        self.journal.clear()?;
        if let Err(err) = self.moods.delete_all() {
            warn!(
                "event=clear_all module=service status=partial journal_cleared=true error={}",
                err
            );
            return Err(err.into());
        }
        self.tracker.reset();
        info!("event=clear_all module=service status=ok");
        Ok(())
    }

    pub fn dashboard(&self) -> DashboardSummary {
        DashboardSummary::build(&self.moods, &self.journal, &self.tracker)
    }

    pub fn mood_chart(&self) -> Vec<ChartPoint> {
        mood_series(&self.moods)
    }

    pub fn todays_prompt(&self) -> &'static str {
        prompt_for_date(self.today())
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.now().date()
    }
}
