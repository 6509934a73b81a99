//! Combined data export.

use crate::repo::PersistenceError;
use crate::store::{JournalDocument, MoodDocument};
use serde::{Deserialize, Serialize};

/// Default download file name for exports.
pub const EXPORT_FILE_NAME: &str = "solace_export.json";

/// Both store documents in one JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub journal_entries: JournalDocument,
    pub mood_entries: MoodDocument,
}

impl ExportDocument {
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        serde_json::to_string_pretty(self).map_err(PersistenceError::Serialization)
    }
}
