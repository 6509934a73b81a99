//! Dashboard summary: latest journal entries, latest moods, session count.

use crate::breathing::SessionTracker;
use crate::model::mood::MoodRecord;
use crate::model::order::SortOrder;
use crate::repo::DocumentGateway;
use crate::store::{JournalStore, MoodStore};
use chrono::NaiveDate;

/// Items shown per dashboard list.
pub const DASHBOARD_ITEMS: usize = 3;
/// Characters of journal text kept in a preview.
pub const PREVIEW_CHARS: usize = 100;

/// Shortened journal entry for list display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalPreview {
    pub date: NaiveDate,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub recent_journal: Vec<JournalPreview>,
    pub recent_moods: Vec<MoodRecord>,
    pub completed_sessions: u64,
}

impl DashboardSummary {
    pub fn build<M, J>(
        moods: &MoodStore<M>,
        journal: &JournalStore<J>,
        tracker: &SessionTracker,
    ) -> Self
    where
        M: DocumentGateway,
        J: DocumentGateway,
    {
        let recent_journal = journal
            .entries(SortOrder::ReverseChronological)
            .take(DASHBOARD_ITEMS)
            .map(|(date, content)| JournalPreview {
                date: *date,
                preview: preview_text(content, PREVIEW_CHARS),
            })
            .collect();

        Self {
            recent_journal,
            recent_moods: moods.recent(DASHBOARD_ITEMS).cloned().collect(),
            completed_sessions: tracker.completed(),
        }
    }
}

/// Keeps the first `max_chars` characters, appending `...` when cut.
pub fn preview_text(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let mut preview: String = content.chars().take(max_chars).collect();
    preview.push_str("...");
    preview
}

#[cfg(test)]
mod tests {
    use super::preview_text;

    #[test]
    fn short_text_is_kept_verbatim() {
        assert_eq!(preview_text("calm day", 100), "calm day");
    }

    #[test]
    fn long_text_is_cut_on_char_boundaries() {
        let text = "é".repeat(120);
        let preview = preview_text(&text, 100);
        assert_eq!(preview.chars().count(), 103);
        assert!(preview.ends_with("..."));
    }
}
