//! Daily journal prompts.

use chrono::{Datelike, NaiveDate};

pub const JOURNAL_PROMPTS: [&str; 10] = [
    "What made you smile today?",
    "What's something you're grateful for today?",
    "What's one challenge you faced today and how did you handle it?",
    "Describe one moment of joy you experienced today.",
    "What's something you learned today?",
    "What's one thing you're looking forward to tomorrow?",
    "How did you take care of yourself today?",
    "What's something you'd like to improve about tomorrow?",
    "Who made a positive impact on your day and why?",
    "What emotions were most present for you today?",
];

/// Prompt for `date`; stable for the whole day, rotating day to day.
pub fn prompt_for_date(date: NaiveDate) -> &'static str {
    let day = usize::try_from(date.num_days_from_ce().unsigned_abs()).unwrap_or(0);
    JOURNAL_PROMPTS[day % JOURNAL_PROMPTS.len()]
}
