//! Read-only projections over the stores for charts, dashboards and prompts.

pub mod chart;
pub mod dashboard;
pub mod prompts;

pub use chart::{band_for_score, mood_series, ChartPoint, MoodBand, CHART_Y_RANGE, REFERENCE_BANDS};
pub use dashboard::{DashboardSummary, JournalPreview, DASHBOARD_ITEMS, PREVIEW_CHARS};
pub use prompts::{prompt_for_date, JOURNAL_PROMPTS};
