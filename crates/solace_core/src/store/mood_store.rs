//! Mood store.
//!
//! # Responsibility
//! - Record mood check-ins keyed by minute-precision timestamps.
//! - Derive sentiment scores from notes, or from the label when notes are blank.
//! - List records in timestamp order.
//!
//! # Invariants
//! - Two records in the same minute share a key; the later one wins.
//! - Every successful mutation rewrites the full mood document.
//! - Note text is never written to logs.

use crate::model::mood::{non_blank_notes, MoodLabel, MoodRecord, MoodTimestamp};
use crate::model::order::{Ordered, SortOrder};
use crate::repo::{load_json, save_json, DocumentGateway, DocumentKind, PersistenceError};
use crate::sentiment::{LexiconScorer, SentimentScorer};
use crate::store::clock::{system_clock, SharedClock};
use crate::store::{StoreError, StoreResult};
use chrono::NaiveDateTime;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{btree_map, BTreeMap};
use std::iter::Take;

/// Persisted value of one mood document entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodDocEntry {
    pub mood: MoodLabel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub sentiment_score: f64,
}

/// Mood document: `"YYYY-MM-DD HH:MM"` → entry.
pub type MoodDocument = BTreeMap<String, MoodDocEntry>;

/// Lazy listing of mood records; clone to restart.
pub type MoodRecords<'a> = Ordered<btree_map::Values<'a, MoodTimestamp, MoodRecord>>;

/// Timestamped mood records with notes-derived sentiment.
pub struct MoodStore<G: DocumentGateway> {
    gateway: G,
    scorer: Box<dyn SentimentScorer>,
    clock: SharedClock,
    records: BTreeMap<MoodTimestamp, MoodRecord>,
}

impl<G: DocumentGateway> MoodStore<G> {
    /// Loads the mood document strictly.
    ///
    /// # Errors
    /// - `StoreError::Persistence` when the document cannot be read or is malformed.
    pub fn open(gateway: G) -> StoreResult<Self> {
        let records = load_records(&gateway)?;
        info!(
            "event=store_open module=store store=mood status=ok records={}",
            records.len()
        );
        Ok(Self::from_parts(gateway, records))
    }

    /// Loads the mood document, falling back to an empty store on failure.
    ///
    /// The load error is logged and handed back so the caller can report the
    /// missing data instead of hiding it.
    pub fn open_or_empty(gateway: G) -> (Self, Option<StoreError>) {
        match load_records(&gateway) {
            Ok(records) => {
                info!(
                    "event=store_open module=store store=mood status=ok records={}",
                    records.len()
                );
                (Self::from_parts(gateway, records), None)
            }
            Err(err) => {
                error!(
                    "event=store_open module=store store=mood status=fallback_empty error={}",
                    err
                );
                (Self::from_parts(gateway, BTreeMap::new()), Some(err))
            }
        }
    }

    fn from_parts(gateway: G, records: BTreeMap<MoodTimestamp, MoodRecord>) -> Self {
        Self {
            gateway,
            scorer: Box::new(LexiconScorer::new()),
            clock: system_clock(),
            records,
        }
    }

    /// Replaces the sentiment scorer.
    pub fn with_scorer(mut self, scorer: impl SentimentScorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    /// Replaces the clock used by `record`.
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// Records a mood at the current minute.
    pub fn record(&mut self, label: MoodLabel, notes: Option<&str>) -> StoreResult<MoodRecord> {
        let now = self.clock.now();
        self.record_at(now, label, notes)
    }

    /// Records a mood at an explicit time, truncated to the minute.
    ///
    /// # Contract
    /// - Non-blank notes are scored by the sentiment scorer.
    /// - Blank or absent notes use `MoodLabel::fixed_score` and are stored as `None`.
    /// - An existing record in the same minute is replaced.
    pub fn record_at(
        &mut self,
        at: NaiveDateTime,
        label: MoodLabel,
        notes: Option<&str>,
    ) -> StoreResult<MoodRecord> {
        let timestamp = MoodTimestamp::from_datetime(at);
        let notes = non_blank_notes(notes);
        let record = MoodRecord {
            timestamp,
            label,
            notes: notes.map(str::to_string),
            sentiment_score: self.score_for(label, notes),
        };

        let previous = self.records.insert(timestamp, record.clone());
        if let Err(err) = self.persist() {
            match previous {
                Some(old) => {
                    self.records.insert(timestamp, old);
                }
                None => {
                    self.records.remove(&timestamp);
                }
            }
            error!(
                "event=mood_record module=store status=rolled_back key={} error={}",
                timestamp, err
            );
            return Err(err.into());
        }

        if previous.is_some() {
            warn!(
                "event=mood_record module=store status=overwritten key={}",
                timestamp
            );
        }
        info!(
            "event=mood_record module=store status=ok key={} label={} score_source={}",
            timestamp,
            label,
            if notes.is_some() { "notes" } else { "label" }
        );
        Ok(record)
    }

    /// Sentiment score a record with these inputs would carry.
    pub fn score_for(&self, label: MoodLabel, notes: Option<&str>) -> f64 {
        match non_blank_notes(notes) {
            Some(text) => self.scorer.score(text).clamp(-1.0, 1.0),
            None => label.fixed_score(),
        }
    }

    pub fn get(&self, timestamp: &MoodTimestamp) -> Option<&MoodRecord> {
        self.records.get(timestamp)
    }

    /// Lists records by timestamp key.
    pub fn list(&self, order: SortOrder) -> MoodRecords<'_> {
        Ordered::new(self.records.values(), order)
    }

    /// The `n` most recent records, newest first.
    pub fn recent(&self, n: usize) -> Take<MoodRecords<'_>> {
        self.list(SortOrder::ReverseChronological).take(n)
    }

    /// Removes every record and persists the empty document.
    pub fn delete_all(&mut self) -> StoreResult<()> {
        let previous = std::mem::take(&mut self.records);
        if let Err(err) = self.persist() {
            self.records = previous;
            error!(
                "event=mood_delete_all module=store status=rolled_back error={}",
                err
            );
            return Err(err.into());
        }
        info!(
            "event=mood_delete_all module=store status=ok removed={}",
            previous.len()
        );
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Current time according to the store clock.
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Persisted form of the current records.
    pub fn document(&self) -> MoodDocument {
        self.records
            .values()
            .map(|record| {
                (
                    record.timestamp.key(),
                    MoodDocEntry {
                        mood: record.label,
                        notes: record.notes.clone(),
                        sentiment_score: record.sentiment_score,
                    },
                )
            })
            .collect()
    }

    fn persist(&self) -> Result<(), PersistenceError> {
        save_json(&self.gateway, DocumentKind::Mood, &self.document())
    }
}

fn load_records<G: DocumentGateway>(
    gateway: &G,
) -> StoreResult<BTreeMap<MoodTimestamp, MoodRecord>> {
    let document: MoodDocument = load_json(gateway, DocumentKind::Mood)?;
    let mut records = BTreeMap::new();
    for (key, entry) in document {
        let timestamp = MoodTimestamp::parse(&key).map_err(|err| invalid_document(err.to_string()))?;
        if !entry.sentiment_score.is_finite() || entry.sentiment_score.abs() > 1.0 {
            return Err(invalid_document(format!(
                "sentiment_score {} out of range for `{key}`",
                entry.sentiment_score
            )));
        }
        records.insert(
            timestamp,
            MoodRecord {
                timestamp,
                label: entry.mood,
                notes: non_blank_notes(entry.notes.as_deref()).map(str::to_string),
                sentiment_score: entry.sentiment_score,
            },
        );
    }
    Ok(records)
}

fn invalid_document(message: String) -> StoreError {
    StoreError::Persistence(PersistenceError::InvalidDocument {
        kind: DocumentKind::Mood,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::MoodStore;
    use crate::model::mood::MoodLabel;
    use crate::repo::{DocumentKind, MemoryDocumentGateway};
    use crate::sentiment::SentimentScorer;
    use chrono::NaiveDate;

    struct FixedScorer(f64);

    impl SentimentScorer for FixedScorer {
        fn score(&self, _text: &str) -> f64 {
            self.0
        }
    }

    #[test]
    fn whitespace_notes_fall_back_to_label_score() {
        let gateway = MemoryDocumentGateway::new();
        let mut store = MoodStore::open(&gateway)
            .unwrap()
            .with_scorer(FixedScorer(0.9));
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let record = store.record_at(at, MoodLabel::Bad, Some("   ")).unwrap();
        assert_eq!(record.sentiment_score, -0.5);
        assert_eq!(record.notes, None);
    }

    #[test]
    fn injected_scorer_is_used_for_notes() {
        let gateway = MemoryDocumentGateway::new();
        let mut store = MoodStore::open(&gateway)
            .unwrap()
            .with_scorer(FixedScorer(0.25));
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let record = store
            .record_at(at, MoodLabel::VeryBad, Some("anything"))
            .unwrap();
        assert_eq!(record.sentiment_score, 0.25);
    }

    #[test]
    fn out_of_range_scores_are_rejected_on_load() {
        let gateway = MemoryDocumentGateway::new().with_document(
            DocumentKind::Mood,
            r#"{"2024-01-01 10:00": {"mood": "Good", "sentiment_score": 3.0}}"#,
        );
        assert!(MoodStore::open(&gateway).is_err());
    }

    #[test]
    fn empty_notes_in_legacy_documents_load_as_absent() {
        let gateway = MemoryDocumentGateway::new().with_document(
            DocumentKind::Mood,
            r#"{"2024-01-01 10:00": {"mood": "Very Bad", "notes": "", "sentiment_score": -1.0}}"#,
        );
        let store = MoodStore::open(&gateway).unwrap();
        let record = store.recent(1).next().unwrap();
        assert_eq!(record.label, MoodLabel::VeryBad);
        assert_eq!(record.notes, None);
    }
}
