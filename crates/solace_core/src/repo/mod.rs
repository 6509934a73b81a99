//! Persistence gateway: whole-document load/save.
//!
//! # Responsibility
//! - Define the document storage contract used by the mood and journal stores.
//! - Provide SQLite, JSON-file and in-memory implementations.
//!
//! # Invariants
//! - A save either fully replaces the stored document or leaves the previous
//!   document untouched.
//! - A document that was never saved loads as `None`, not as an error.
//! - Read paths reject malformed documents instead of masking them.

use crate::db::DbError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod file_documents;
pub mod memory_documents;
pub mod sqlite_documents;

pub use file_documents::JsonFileGateway;
pub use memory_documents::MemoryDocumentGateway;
pub use sqlite_documents::SqliteDocumentGateway;

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Named documents owned by the stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKind {
    Mood,
    Journal,
}

impl DocumentKind {
    /// Stable document name, also used as the JSON file stem.
    pub fn name(self) -> &'static str {
        match self {
            Self::Mood => "mood_entries",
            Self::Journal => "journal_entries",
        }
    }
}

/// Storage read/write failure.
#[derive(Debug)]
pub enum PersistenceError {
    Db(DbError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialization(serde_json::Error),
    InvalidDocument {
        kind: DocumentKind,
        message: String,
    },
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Serialization(err) => write!(f, "document serialization failed: {err}"),
            Self::InvalidDocument { kind, message } => {
                write!(f, "invalid `{}` document: {message}", kind.name())
            }
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Serialization(err) => Some(err),
            Self::InvalidDocument { .. } => None,
        }
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable store of raw JSON documents.
pub trait DocumentGateway {
    /// Loads the full document body, or `None` when it was never saved.
    fn load_document(&self, kind: DocumentKind) -> PersistenceResult<Option<String>>;
    /// Replaces the full document body atomically.
    fn save_document(&self, kind: DocumentKind, body: &str) -> PersistenceResult<()>;
}

impl<G: DocumentGateway + ?Sized> DocumentGateway for &G {
    fn load_document(&self, kind: DocumentKind) -> PersistenceResult<Option<String>> {
        (**self).load_document(kind)
    }

    fn save_document(&self, kind: DocumentKind, body: &str) -> PersistenceResult<()> {
        (**self).save_document(kind, body)
    }
}

/// Loads and decodes one document; a missing document decodes as `T::default()`.
pub fn load_json<T, G>(gateway: &G, kind: DocumentKind) -> PersistenceResult<T>
where
    T: DeserializeOwned + Default,
    G: DocumentGateway + ?Sized,
{
    match gateway.load_document(kind)? {
        Some(body) if !body.trim().is_empty() => {
            serde_json::from_str(&body).map_err(|err| PersistenceError::InvalidDocument {
                kind,
                message: err.to_string(),
            })
        }
        _ => Ok(T::default()),
    }
}

/// Encodes and saves one document.
pub fn save_json<T, G>(gateway: &G, kind: DocumentKind, value: &T) -> PersistenceResult<()>
where
    T: Serialize,
    G: DocumentGateway + ?Sized,
{
    let body = serde_json::to_string_pretty(value).map_err(PersistenceError::Serialization)?;
    gateway.save_document(kind, &body)
}
