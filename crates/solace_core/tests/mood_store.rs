use chrono::{NaiveDate, NaiveDateTime};
use solace_core::db::open_db;
use solace_core::store::ManualClock;
use solace_core::{
    DocumentKind, JsonFileGateway, MemoryDocumentGateway, MoodLabel, MoodStore, PersistenceError,
    SentimentScorer, SortOrder, SqliteDocumentGateway, StoreError,
};
use std::sync::Arc;

struct FixedScorer(f64);

impl SentimentScorer for FixedScorer {
    fn score(&self, _text: &str) -> f64 {
        self.0
    }
}

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

#[test]
fn blank_notes_use_fixed_label_scores() {
    let gateway = MemoryDocumentGateway::new();
    let mut store = MoodStore::open(&gateway).unwrap();

    let expected = [
        (MoodLabel::VeryBad, -1.0),
        (MoodLabel::Bad, -0.5),
        (MoodLabel::Neutral, 0.0),
        (MoodLabel::Good, 0.5),
        (MoodLabel::Excellent, 1.0),
    ];
    for (minute, (label, score)) in expected.into_iter().enumerate() {
        let record = store
            .record_at(at(1, 9, minute as u32), label, Some("   "))
            .unwrap();
        assert_eq!(record.sentiment_score, score);
        assert_eq!(record.notes, None);
    }
}

#[test]
fn notes_score_ignores_label() {
    let gateway = MemoryDocumentGateway::new();
    let mut store = MoodStore::open(&gateway)
        .unwrap()
        .with_scorer(FixedScorer(0.25));

    let bad = store
        .record_at(at(1, 9, 0), MoodLabel::VeryBad, Some("anything"))
        .unwrap();
    let great = store
        .record_at(at(1, 9, 1), MoodLabel::Excellent, Some("anything"))
        .unwrap();

    assert_eq!(bad.sentiment_score, 0.25);
    assert_eq!(great.sentiment_score, 0.25);
    assert_eq!(bad.notes.as_deref(), Some("anything"));
}

#[test]
fn lexicon_scores_follow_polarity_of_notes() {
    let gateway = MemoryDocumentGateway::new();
    let mut store = MoodStore::open(&gateway).unwrap();

    let happy = store
        .record_at(at(1, 9, 0), MoodLabel::Neutral, Some("I feel happy and grateful"))
        .unwrap();
    let sad = store
        .record_at(at(1, 9, 1), MoodLabel::Neutral, Some("I feel sad and lonely"))
        .unwrap();

    assert!(happy.sentiment_score > 0.0);
    assert!(sad.sentiment_score < 0.0);
    assert!((-1.0..=1.0).contains(&happy.sentiment_score));
}

#[test]
fn recent_returns_newest_first() {
    let gateway = MemoryDocumentGateway::new();
    let mut store = MoodStore::open(&gateway).unwrap();

    store.record_at(at(1, 8, 0), MoodLabel::Bad, None).unwrap();
    store
        .record_at(at(1, 12, 0), MoodLabel::Excellent, None)
        .unwrap();
    store.record_at(at(1, 18, 0), MoodLabel::Neutral, None).unwrap();

    let recent: Vec<_> = store
        .recent(2)
        .map(|record| (record.label, record.timestamp.as_datetime()))
        .collect();
    assert_eq!(
        recent,
        vec![
            (MoodLabel::Neutral, at(1, 18, 0)),
            (MoodLabel::Excellent, at(1, 12, 0)),
        ]
    );

    let chronological: Vec<_> = store
        .list(SortOrder::Chronological)
        .map(|record| record.label)
        .collect();
    assert_eq!(
        chronological,
        vec![MoodLabel::Bad, MoodLabel::Excellent, MoodLabel::Neutral]
    );
}

#[test]
fn recent_bounds_yield_nothing_or_everything() {
    let gateway = MemoryDocumentGateway::new();
    let mut store = MoodStore::open(&gateway).unwrap();
    assert_eq!(store.recent(3).count(), 0);

    store.record_at(at(2, 7, 0), MoodLabel::Good, None).unwrap();
    store.record_at(at(2, 13, 0), MoodLabel::Bad, None).unwrap();
    store.record_at(at(2, 21, 0), MoodLabel::VeryBad, None).unwrap();

    assert_eq!(store.recent(0).count(), 0);

    let everything: Vec<_> = store
        .recent(store.len() + 5)
        .map(|record| record.timestamp.as_datetime())
        .collect();
    assert_eq!(everything, vec![at(2, 21, 0), at(2, 13, 0), at(2, 7, 0)]);
}

#[test]
fn same_minute_record_replaces_previous() {
    let gateway = MemoryDocumentGateway::new();
    let mut store = MoodStore::open(&gateway).unwrap();

    store
        .record_at(at(1, 9, 30), MoodLabel::Bad, Some("first"))
        .unwrap();
    let later_in_minute = at(1, 9, 30) + chrono::Duration::seconds(42);
    store
        .record_at(later_in_minute, MoodLabel::Good, None)
        .unwrap();

    assert_eq!(store.len(), 1);
    let only = store.list(SortOrder::Chronological).next().unwrap();
    assert_eq!(only.label, MoodLabel::Good);
    assert_eq!(only.timestamp.key(), "2024-03-01 09:30");
}

#[test]
fn record_uses_injected_clock() {
    let gateway = MemoryDocumentGateway::new();
    let clock = ManualClock::new(at(5, 7, 15));
    let mut store = MoodStore::open(&gateway)
        .unwrap()
        .with_clock(Arc::new(clock.clone()));

    let first = store.record(MoodLabel::Good, None).unwrap();
    clock.advance(chrono::Duration::minutes(1));
    let second = store.record(MoodLabel::Bad, None).unwrap();

    assert_eq!(first.timestamp.key(), "2024-03-05 07:15");
    assert_eq!(second.timestamp.key(), "2024-03-05 07:16");
    assert_eq!(store.len(), 2);
}

#[test]
fn failed_save_rolls_back_and_reports_persistence_error() {
    let gateway = MemoryDocumentGateway::new();
    let mut store = MoodStore::open(&gateway).unwrap();
    store.record_at(at(1, 9, 0), MoodLabel::Good, None).unwrap();
    let saved = gateway.document(DocumentKind::Mood);

    gateway.set_fail_saves(true);
    let err = store
        .record_at(at(1, 10, 0), MoodLabel::Bad, None)
        .unwrap_err();
    assert!(matches!(err, StoreError::Persistence(PersistenceError::Io { .. })));
    assert_eq!(store.len(), 1);

    let err = store
        .record_at(at(1, 9, 0), MoodLabel::Excellent, None)
        .unwrap_err();
    assert!(matches!(err, StoreError::Persistence(_)));
    assert_eq!(
        store.list(SortOrder::Chronological).next().unwrap().label,
        MoodLabel::Good
    );

    assert!(store.delete_all().is_err());
    assert_eq!(store.len(), 1);
    assert_eq!(gateway.document(DocumentKind::Mood), saved);
}

#[test]
fn delete_all_empties_store_and_document() {
    let gateway = MemoryDocumentGateway::new();
    let mut store = MoodStore::open(&gateway).unwrap();
    store.record_at(at(1, 9, 0), MoodLabel::Good, None).unwrap();

    store.delete_all().unwrap();

    assert!(store.is_empty());
    let reopened = MoodStore::open(&gateway).unwrap();
    assert!(reopened.is_empty());
}

#[test]
fn document_round_trips_through_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("solace.sqlite3");

    let expected = {
        let conn = open_db(&path).unwrap();
        let gateway = SqliteDocumentGateway::try_new(&conn).unwrap();
        let mut store = MoodStore::open(gateway).unwrap();
        store
            .record_at(at(2, 8, 5), MoodLabel::Good, Some("calm morning walk"))
            .unwrap();
        store.record_at(at(2, 20, 45), MoodLabel::Bad, None).unwrap();
        store.document()
    };

    let conn = open_db(&path).unwrap();
    let gateway = SqliteDocumentGateway::try_new(&conn).unwrap();
    let reopened = MoodStore::open(gateway).unwrap();
    assert_eq!(reopened.document(), expected);
    assert_eq!(reopened.len(), 2);
}

#[test]
fn document_round_trips_through_json_files() {
    let dir = tempfile::tempdir().unwrap();

    let expected = {
        let mut store = MoodStore::open(JsonFileGateway::new(dir.path())).unwrap();
        store
            .record_at(at(3, 21, 59), MoodLabel::VeryBad, Some("rough day"))
            .unwrap();
        store.document()
    };

    let reopened = MoodStore::open(JsonFileGateway::new(dir.path())).unwrap();
    assert_eq!(reopened.document(), expected);

    let raw = std::fs::read_to_string(dir.path().join("mood_entries.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["2024-03-03 21:59"]["mood"], "Very Bad");
    assert_eq!(parsed["2024-03-03 21:59"]["notes"], "rough day");
}

#[test]
fn malformed_document_fails_strict_open_and_falls_back_when_lenient() {
    let gateway = MemoryDocumentGateway::new().with_document(
        DocumentKind::Mood,
        r#"{"yesterday": {"mood": "Good", "sentiment_score": 0.5}}"#,
    );

    assert!(MoodStore::open(&gateway).is_err());

    let (store, error) = MoodStore::open_or_empty(&gateway);
    assert!(store.is_empty());
    assert!(error.is_some());
}

#[test]
fn legacy_document_with_blank_notes_loads() {
    let gateway = MemoryDocumentGateway::new().with_document(
        DocumentKind::Mood,
        r#"{"2024-01-15 14:30": {"mood": "Good", "notes": "", "sentiment_score": 0.5}}"#,
    );

    let store = MoodStore::open(&gateway).unwrap();
    let record = store.list(SortOrder::Chronological).next().unwrap();
    assert_eq!(record.label, MoodLabel::Good);
    assert_eq!(record.notes, None);
    assert_eq!(record.timestamp.key(), "2024-01-15 14:30");
}
