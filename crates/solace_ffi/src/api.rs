//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Translate core errors into envelope messages the UI can show as-is.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens the document database, performs one use-case and
//!   returns; no store state is cached between calls.
//! - The breathing session counter lives for the process lifetime.
//! - A session is counted only when `breathing_complete` receives the id of
//!   a timeline served by `breathing_timeline`, and at most once.

use log::error;
use solace_core::db::open_db;
use solace_core::model::journal::date_key;
use solace_core::{
    core_version as core_version_inner, find_technique, init_logging as init_logging_inner,
    technique_catalog, BreathingSession, BreathingTechnique, CompanionResult, CompanionService,
    LogSettings, MoodRecord, SessionTracker, SortOrder, SqliteDocumentGateway, TickEvent,
    EXPORT_FILE_NAME,
};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

const DB_PATH_ENV: &str = "SOLACE_DB_PATH";
const DB_FILE_NAME: &str = "solace.sqlite3";
const MOOD_LIST_DEFAULT_LIMIT: u32 = 50;
const MOOD_LIST_LIMIT_MAX: u32 = 500;
const OPEN_SESSIONS_MAX: usize = 16;

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static BREATHING: OnceLock<Mutex<BreathingRegistry>> = OnceLock::new();

/// Completion counter plus the timelines handed out and not yet completed.
#[derive(Debug, Default)]
struct BreathingRegistry {
    tracker: SessionTracker,
    // Oldest first; bounded so abandoned sessions do not accumulate.
    open_sessions: VecDeque<String>,
}

impl BreathingRegistry {
    fn open(&mut self, session_id: String) {
        if self.open_sessions.len() == OPEN_SESSIONS_MAX {
            self.open_sessions.pop_front();
        }
        self.open_sessions.push_back(session_id);
    }

    fn close(&mut self, session_id: &str) -> bool {
        match self.open_sessions.iter().position(|id| id == session_id) {
            Some(index) => {
                self.open_sessions.remove(index);
                true
            }
            None => false,
        }
    }

    fn reset(&mut self) {
        self.tracker.reset();
        self.open_sessions.clear();
    }
}

type FfiService<'g, 'c> =
    CompanionService<&'g SqliteDocumentGateway<'c>, &'g SqliteDocumentGateway<'c>>;

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(&LogSettings::new(level, log_dir)) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// One mood record as shown in lists and charts.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodItem {
    /// `YYYY-MM-DD HH:MM` key.
    pub timestamp: String,
    pub mood: String,
    pub notes: Option<String>,
    pub sentiment_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoodRecordResponse {
    pub ok: bool,
    pub item: Option<MoodItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoodListResponse {
    pub items: Vec<MoodItem>,
    pub message: String,
    /// Effective applied list limit.
    pub applied_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntryResponse {
    pub ok: bool,
    /// `None` when no entry exists for the date.
    pub content: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalDatesResponse {
    /// `YYYY-MM-DD` keys.
    pub dates: Vec<String>,
    pub message: String,
}

/// Catalog technique description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechniqueItem {
    pub name: String,
    /// `inhale-hold-exhale-hold` seconds.
    pub pattern: String,
    pub cycles: u32,
    pub total_seconds: u64,
}

/// One second of a breathing session, pre-computed for UI pacing.
#[derive(Debug, Clone, PartialEq)]
pub struct BreathTickItem {
    pub cycle: u32,
    pub total_cycles: u32,
    /// `inhale|hold1|exhale|hold2`.
    pub phase: String,
    pub cue: String,
    pub seconds_remaining: u32,
    pub progress: f64,
    pub circle_size: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BreathingTimelineResponse {
    pub ok: bool,
    /// Pass to `breathing_complete` after the last tick.
    pub session_id: Option<String>,
    pub technique: Option<TechniqueItem>,
    pub ticks: Vec<BreathTickItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreathingCompleteResponse {
    /// `false` when the id was unknown or already completed.
    pub ok: bool,
    pub completed_sessions: u64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub ok: bool,
    /// Pretty JSON with `journal_entries` and `mood_entries`.
    pub json: Option<String>,
    /// Suggested download file name.
    pub file_name: String,
    pub message: String,
}

/// Records a mood at the current minute.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Invalid labels return `ok=false` with the validation message.
#[flutter_rust_bridge::frb(sync)]
pub fn mood_record(mood: String, notes: Option<String>) -> MoodRecordResponse {
    match with_service(|service| service.record_mood(&mood, notes.as_deref())) {
        Ok(record) => MoodRecordResponse {
            ok: true,
            item: Some(to_mood_item(&record)),
            message: "Mood recorded.".to_string(),
        },
        Err(err) => MoodRecordResponse {
            ok: false,
            item: None,
            message: format!("mood_record failed: {err}"),
        },
    }
}

/// Lists mood records.
///
/// # FFI contract
/// - `limit` defaults to 50 and is capped at 500.
/// - Never panics; failures return an empty list with a message.
#[flutter_rust_bridge::frb(sync)]
pub fn mood_list(limit: Option<u32>, newest_first: bool) -> MoodListResponse {
    let applied_limit = normalize_mood_limit(limit);
    let order = sort_order(newest_first);
    let take = usize::try_from(applied_limit).unwrap_or(usize::MAX);
    match with_service(|service| {
        Ok(service
            .moods()
            .list(order)
            .take(take)
            .map(to_mood_item)
            .collect::<Vec<_>>())
    }) {
        Ok(items) => {
            let message = if items.is_empty() {
                "No mood entries yet.".to_string()
            } else {
                format!("Found {} mood entr(ies).", items.len())
            };
            MoodListResponse {
                items,
                message,
                applied_limit,
            }
        }
        Err(err) => MoodListResponse {
            items: Vec::new(),
            message: format!("mood_list failed: {err}"),
            applied_limit,
        },
    }
}

/// Creates or replaces the journal entry for a `YYYY-MM-DD` date.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_save(date: String, content: String) -> ActionResponse {
    match with_service(|service| service.save_journal(date.trim(), &content)) {
        Ok(saved) => ActionResponse::success(format!("Entry saved for {}.", date_key(saved))),
        Err(err) => ActionResponse::failure(format!("journal_save failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn journal_get(date: String) -> JournalEntryResponse {
    match with_service(|service| service.journal_entry(date.trim())) {
        Ok(Some(content)) => JournalEntryResponse {
            ok: true,
            content: Some(content),
            message: "Entry found.".to_string(),
        },
        Ok(None) => JournalEntryResponse {
            ok: true,
            content: None,
            message: "No entry for this date.".to_string(),
        },
        Err(err) => JournalEntryResponse {
            ok: false,
            content: None,
            message: format!("journal_get failed: {err}"),
        },
    }
}

/// Deletes the entry for a date; deleting a missing entry succeeds without writing.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_delete(date: String) -> ActionResponse {
    match with_service(|service| service.delete_journal(date.trim())) {
        Ok(true) => ActionResponse::success("Entry deleted."),
        Ok(false) => ActionResponse::success("No entry for this date."),
        Err(err) => ActionResponse::failure(format!("journal_delete failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn journal_dates(newest_first: bool) -> JournalDatesResponse {
    let order = sort_order(newest_first);
    match with_service(|service| {
        Ok(service
            .journal()
            .list_dates(order)
            .map(date_key)
            .collect::<Vec<_>>())
    }) {
        Ok(dates) => JournalDatesResponse {
            message: format!("Found {} entr(ies).", dates.len()),
            dates,
        },
        Err(err) => JournalDatesResponse {
            dates: Vec::new(),
            message: format!("journal_dates failed: {err}"),
        },
    }
}

/// Built-in breathing techniques in menu order.
#[flutter_rust_bridge::frb(sync)]
pub fn breathing_catalog() -> Vec<TechniqueItem> {
    technique_catalog().iter().map(to_technique_item).collect()
}

/// Full tick sequence for a catalog technique.
///
/// The host paces ticks with its own one-second timer and calls
/// `breathing_complete` with the returned `session_id` after the last one.
/// Cancelling means simply not calling it.
#[flutter_rust_bridge::frb(sync)]
pub fn breathing_timeline(technique: String) -> BreathingTimelineResponse {
    let session = find_technique(&technique).and_then(BreathingSession::start);
    match session {
        Ok(session) => {
            let session_id = session.id().to_string();
            let item = to_technique_item(session.technique());
            let ticks: Vec<_> = session.map(|tick| to_tick_item(&tick)).collect();
            with_breathing(|registry| registry.open(session_id.clone()));
            BreathingTimelineResponse {
                ok: true,
                session_id: Some(session_id),
                message: format!("{} ticks.", ticks.len()),
                technique: Some(item),
                ticks,
            }
        }
        Err(err) => BreathingTimelineResponse {
            ok: false,
            session_id: None,
            technique: None,
            ticks: Vec::new(),
            message: format!("breathing_timeline failed: {err}"),
        },
    }
}

/// Counts a finished breathing session and returns the encouragement text.
///
/// # FFI contract
/// - `session_id` must come from `breathing_timeline`; each id counts once.
/// - Unknown or repeated ids return `ok=false` and leave the count unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn breathing_complete(session_id: String) -> BreathingCompleteResponse {
    with_breathing(|registry| {
        if !registry.close(session_id.trim()) {
            return BreathingCompleteResponse {
                ok: false,
                completed_sessions: registry.tracker.completed(),
                message: format!(
                    "breathing_complete failed: no open session with id `{}`",
                    session_id.trim()
                ),
            };
        }
        let completed_sessions = registry.tracker.record_completion();
        BreathingCompleteResponse {
            ok: true,
            completed_sessions,
            message: registry.tracker.encouragement(),
        }
    })
}

/// Exports both documents as one JSON payload.
#[flutter_rust_bridge::frb(sync)]
pub fn export_data() -> ExportResponse {
    match with_service(|service| service.export_json()) {
        Ok(json) => ExportResponse {
            ok: true,
            json: Some(json),
            file_name: EXPORT_FILE_NAME.to_string(),
            message: "Export ready.".to_string(),
        },
        Err(err) => ExportResponse {
            ok: false,
            json: None,
            file_name: EXPORT_FILE_NAME.to_string(),
            message: format!("export_data failed: {err}"),
        },
    }
}

/// Deletes every mood and journal entry and resets the session counter.
#[flutter_rust_bridge::frb(sync)]
pub fn clear_all_data() -> ActionResponse {
    match with_service(|service| service.clear_all_data()) {
        Ok(()) => {
            with_breathing(BreathingRegistry::reset);
            ActionResponse::success("All data cleared.")
        }
        Err(err) => ActionResponse::failure(format!("clear_all_data failed: {err}")),
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_service<T>(
    f: impl FnOnce(&mut FfiService<'_, '_>) -> CompanionResult<T>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("DB open failed: {err}"))?;
    let gateway =
        SqliteDocumentGateway::try_new(&conn).map_err(|err| format!("gateway init failed: {err}"))?;
    let mut service = CompanionService::open(&gateway, &gateway).map_err(|err| {
        error!("event=ffi_open module=ffi status=error error={}", err);
        format!("data load failed: {err}")
    })?;
    f(&mut service).map_err(|err| err.to_string())
}

fn with_breathing<T>(f: impl FnOnce(&mut BreathingRegistry) -> T) -> T {
    let lock = BREATHING.get_or_init(|| Mutex::new(BreathingRegistry::default()));
    let mut registry = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut registry)
}

fn normalize_mood_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(0) | None => MOOD_LIST_DEFAULT_LIMIT,
        Some(value) => value.min(MOOD_LIST_LIMIT_MAX),
    }
}

fn sort_order(newest_first: bool) -> SortOrder {
    if newest_first {
        SortOrder::ReverseChronological
    } else {
        SortOrder::Chronological
    }
}

fn to_mood_item(record: &MoodRecord) -> MoodItem {
    MoodItem {
        timestamp: record.timestamp.key(),
        mood: record.label.to_string(),
        notes: record.notes.clone(),
        sentiment_score: record.sentiment_score,
    }
}

fn to_technique_item(technique: &BreathingTechnique) -> TechniqueItem {
    TechniqueItem {
        name: technique.name().to_string(),
        pattern: technique.pattern(),
        cycles: technique.cycles(),
        total_seconds: technique.total_seconds(),
    }
}

fn to_tick_item(tick: &TickEvent) -> BreathTickItem {
    BreathTickItem {
        cycle: tick.cycle,
        total_cycles: tick.total_cycles,
        phase: tick.phase.as_str().to_string(),
        cue: tick.phase.cue().to_string(),
        seconds_remaining: tick.seconds_remaining,
        progress: tick.progress,
        circle_size: tick.circle_size(),
    }
}
