use chrono::{NaiveDate, NaiveDateTime};
use solace_core::breathing::CancellationToken;
use solace_core::demo::{seed_demo_data, DEMO_DAYS};
use solace_core::store::ManualClock;
use solace_core::{
    CompanionError, CompanionService, DocumentKind, ExportDocument, MemoryDocumentGateway,
    MoodLabel, RunOutcome, SortOrder, StoreError, ValidationError, VirtualTicker,
};
use std::sync::Arc;

fn noon(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn service<'g>(
    moods: &'g MemoryDocumentGateway,
    journal: &'g MemoryDocumentGateway,
    clock: &ManualClock,
) -> CompanionService<&'g MemoryDocumentGateway, &'g MemoryDocumentGateway> {
    CompanionService::open(moods, journal)
        .unwrap()
        .with_clock(Arc::new(clock.clone()))
}

#[test]
fn record_mood_parses_label_text() {
    let (moods, journal) = (MemoryDocumentGateway::new(), MemoryDocumentGateway::new());
    let clock = ManualClock::new(noon(1));
    let mut service = service(&moods, &journal, &clock);

    let record = service.record_mood("very bad", Some("   ")).unwrap();
    assert_eq!(record.label, MoodLabel::VeryBad);
    assert_eq!(record.sentiment_score, -1.0);
    assert_eq!(record.timestamp.key(), "2024-06-01 12:00");

    let err = service.record_mood("Ecstatic", None).unwrap_err();
    assert!(matches!(
        err,
        CompanionError::Validation(ValidationError::InvalidMoodLabel(_))
    ));
    assert_eq!(service.moods().len(), 1);
}

#[test]
fn journal_handlers_validate_date_keys() {
    let (moods, journal) = (MemoryDocumentGateway::new(), MemoryDocumentGateway::new());
    let clock = ManualClock::new(noon(1));
    let mut service = service(&moods, &journal, &clock);

    service.save_journal("2024-06-01", "Morning pages").unwrap();
    assert_eq!(
        service.journal_entry("2024-06-01").unwrap().as_deref(),
        Some("Morning pages")
    );
    assert!(matches!(
        service.save_journal("June 1st", "text"),
        Err(CompanionError::Validation(ValidationError::InvalidDateKey(_)))
    ));
    assert!(!service.delete_journal("2024-01-01").unwrap());
    assert!(service.delete_journal("2024-06-01").unwrap());

    let today = service.save_today("Evening notes").unwrap();
    assert_eq!(today, noon(1).date());
}

#[test]
fn export_contains_both_documents() {
    let (moods, journal) = (MemoryDocumentGateway::new(), MemoryDocumentGateway::new());
    let clock = ManualClock::new(noon(2));
    let mut service = service(&moods, &journal, &clock);
    service.record_mood("Good", Some("lovely walk")).unwrap();
    service.save_journal("2024-06-02", "Walked by the river").unwrap();

    let json = service.export_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["journal_entries"]["2024-06-02"], "Walked by the river");
    assert_eq!(value["mood_entries"]["2024-06-02 12:00"]["mood"], "Good");

    let parsed: ExportDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, service.export());
}

#[test]
fn clear_all_data_empties_stores_and_resets_counter() {
    let (moods, journal) = (MemoryDocumentGateway::new(), MemoryDocumentGateway::new());
    let clock = ManualClock::new(noon(3));
    let mut service = service(&moods, &journal, &clock);
    service.record_mood("Neutral", None).unwrap();
    service.save_journal("2024-06-03", "text").unwrap();
    let cancel = CancellationToken::new();
    service
        .run_breathing("calm", &mut VirtualTicker::new(), &cancel, |_| {})
        .unwrap();
    assert_eq!(service.tracker().completed(), 1);

    service.clear_all_data().unwrap();

    assert!(service.moods().is_empty());
    assert!(service.journal().is_empty());
    assert_eq!(service.tracker().completed(), 0);
    assert_eq!(service.export(), ExportDocument::default());

    let reopened = CompanionService::open(&moods, &journal).unwrap();
    assert!(reopened.moods().is_empty());
    assert!(reopened.journal().is_empty());
}

#[test]
fn clear_all_keeps_counter_when_a_store_fails() {
    let (moods, journal) = (MemoryDocumentGateway::new(), MemoryDocumentGateway::new());
    let clock = ManualClock::new(noon(3));
    let mut service = service(&moods, &journal, &clock);
    service.record_mood("Neutral", None).unwrap();
    let cancel = CancellationToken::new();
    service
        .run_breathing("box", &mut VirtualTicker::new(), &cancel, |_| {})
        .unwrap();

    moods.set_fail_saves(true);
    let err = service.clear_all_data().unwrap_err();

    assert!(matches!(err, CompanionError::Store(StoreError::Persistence(_))));
    assert_eq!(service.moods().len(), 1);
    assert_eq!(service.tracker().completed(), 1);
}

#[test]
fn breathing_sessions_accumulate_encouragement() {
    let (moods, journal) = (MemoryDocumentGateway::new(), MemoryDocumentGateway::new());
    let clock = ManualClock::new(noon(4));
    let mut service = service(&moods, &journal, &clock);
    let cancel = CancellationToken::new();

    for expected in 1..=2 {
        let outcome = service
            .run_breathing("4-7-8", &mut VirtualTicker::new(), &cancel, |_| {})
            .unwrap();
        match outcome {
            RunOutcome::Completed(summary) => {
                assert_eq!(summary.completed_sessions, expected);
                assert_eq!(summary.technique, "4-7-8 Breathing");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    assert!(matches!(
        service.run_breathing("square", &mut VirtualTicker::new(), &cancel, |_| {}),
        Err(CompanionError::Validation(ValidationError::UnknownTechnique(_)))
    ));
}

#[test]
fn dashboard_shows_latest_items() {
    let (moods, journal) = (MemoryDocumentGateway::new(), MemoryDocumentGateway::new());
    let clock = ManualClock::new(noon(10));
    let mut service = service(&moods, &journal, &clock);
    for day in 1..=5 {
        service
            .save_journal(&format!("2024-06-{day:02}"), &format!("Day {day}"))
            .unwrap();
        clock.set(noon(day));
        service.quick_mood("Good").unwrap();
    }

    let dashboard = service.dashboard();
    assert_eq!(dashboard.recent_journal.len(), 3);
    assert_eq!(dashboard.recent_journal[0].preview, "Day 5");
    assert_eq!(dashboard.recent_moods.len(), 3);
    assert_eq!(
        dashboard.recent_moods[0].timestamp.key(),
        "2024-06-05 12:00"
    );
    assert_eq!(service.mood_chart().len(), 5);
}

#[test]
fn unreadable_documents_fall_back_to_empty_and_are_reported() {
    let moods = MemoryDocumentGateway::new();
    moods.set_fail_loads(true);
    let journal =
        MemoryDocumentGateway::new().with_document(DocumentKind::Journal, "{\"2024-06-01\": \"ok\"}");

    let (service, report) = CompanionService::open_or_empty(&moods, &journal);

    assert!(!report.is_clean());
    assert!(report.mood.is_some());
    assert!(report.journal.is_none());
    assert!(service.moods().is_empty());
    assert_eq!(service.journal().len(), 1);
}

#[test]
fn demo_data_is_deterministic_and_stays_in_window() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 20).unwrap();
    let first = {
        let (moods, journal) = (MemoryDocumentGateway::new(), MemoryDocumentGateway::new());
        let clock = ManualClock::new(noon(20));
        let mut service = service(&moods, &journal, &clock);
        let summary = seed_demo_data(&mut service, today).unwrap();
        assert_eq!(summary.journal_entries, DEMO_DAYS as usize);
        assert_eq!(service.journal().len(), DEMO_DAYS as usize);
        assert!(service.moods().len() >= DEMO_DAYS as usize);
        for record in service.moods().list(SortOrder::Chronological) {
            let at = record.timestamp.as_datetime();
            assert!(at.date() < today);
            assert!((8..22).contains(&chrono::Timelike::hour(&at)));
        }
        service.export()
    };

    let (moods, journal) = (MemoryDocumentGateway::new(), MemoryDocumentGateway::new());
    let clock = ManualClock::new(noon(20));
    let mut service = service(&moods, &journal, &clock);
    seed_demo_data(&mut service, today).unwrap();
    assert_eq!(service.export(), first);
}
