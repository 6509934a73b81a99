//! Core domain logic for Solace.
//! This crate is the single source of truth for business invariants.

pub mod breathing;
pub mod config;
pub mod db;
pub mod demo;
pub mod export;
pub mod insights;
pub mod logging;
pub mod model;
pub mod repo;
pub mod sentiment;
pub mod service;
pub mod store;
pub mod support;

pub use breathing::{
    run_session, BreathingSession, CancellationToken, CompletionSummary, IntervalTicker,
    RunOutcome, SessionEvent, SessionTracker, TickEvent, Ticker, VirtualTicker,
};
pub use config::{CompanionConfig, ConfigError, StorageBackend};
pub use db::{open_db, open_db_in_memory, DbError};
pub use export::{ExportDocument, EXPORT_FILE_NAME};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::breathing::{find_technique, technique_catalog, BreathPhase, BreathingTechnique};
pub use model::mood::{MoodLabel, MoodRecord, MoodTimestamp};
pub use model::order::SortOrder;
pub use model::validation::ValidationError;
pub use repo::{
    DocumentGateway, DocumentKind, JsonFileGateway, MemoryDocumentGateway, PersistenceError,
    SqliteDocumentGateway,
};
pub use sentiment::{LexiconScorer, SentimentScorer};
pub use service::companion_service::{CompanionError, CompanionResult, CompanionService, LoadReport};
pub use store::{JournalStore, MoodStore, StoreError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
