//! Deterministic sample data for trying the app.
//!
//! Fills the 14 days before `today` with one journal entry per day and one to
//! three mood check-ins per day between 08:00 and 21:59. Choices rotate
//! through fixed tables, so the same `today` always yields the same data.

use crate::model::journal::date_key;
use crate::model::mood::MoodLabel;
use crate::repo::DocumentGateway;
use crate::service::companion_service::{CompanionResult, CompanionService};
use chrono::{Duration, NaiveDate};
use log::info;

pub const DEMO_DAYS: i64 = 14;

const JOURNAL_TEMPLATES: [&str; 5] = [
    "Today was {feeling}. I {activity} and it made me feel {impact}. {reflection}",
    "I woke up feeling {feeling} today. {activity}, which was {impact}. {reflection}",
    "Had a {feeling} day. Spent time {activity}. It was {impact}. {reflection}",
    "{reflection} Today I {activity}, which made the day feel {feeling}. It was {impact}.",
    "{activity} today, which was {impact}. Overall, feeling {feeling}. {reflection}",
];

const FEELINGS: [&str; 9] = [
    "good",
    "okay",
    "great",
    "challenging",
    "productive",
    "relaxed",
    "tired",
    "energetic",
    "mixed",
];

const ACTIVITIES: [&str; 10] = [
    "went for a walk",
    "read a book",
    "talked with friends",
    "worked on a project",
    "tried meditation",
    "cooked a new recipe",
    "watched a movie",
    "exercised",
    "cleaned my space",
    "practiced a hobby",
];

const IMPACTS: [&str; 10] = [
    "really enjoyable",
    "helpful",
    "just what I needed",
    "somewhat challenging",
    "a good distraction",
    "calming",
    "interesting",
    "refreshing",
    "satisfying",
    "time well spent",
];

const REFLECTIONS: [&str; 10] = [
    "I should do this more often.",
    "I'm grateful for the little things.",
    "Tomorrow I want to focus more on self-care.",
    "I'm learning to appreciate the present moment.",
    "I need to remember to take breaks.",
    "Noticing my feelings helps me understand myself better.",
    "I'm proud of how I handled today's challenges.",
    "Taking time for myself is important.",
    "Small steps lead to progress.",
    "I'm working on being kinder to myself.",
];

// Ten slots approximate a 10/20/40/20/10 percent spread over the scale.
const MOOD_ROTATION: [MoodLabel; 10] = [
    MoodLabel::Neutral,
    MoodLabel::Good,
    MoodLabel::Bad,
    MoodLabel::Neutral,
    MoodLabel::Excellent,
    MoodLabel::Neutral,
    MoodLabel::Bad,
    MoodLabel::Good,
    MoodLabel::VeryBad,
    MoodLabel::Neutral,
];

const NOTE_TEMPLATES: [&str; 5] = [
    "Feeling {mood} today. {detail}",
    "{detail} Overall mood: {mood}.",
    "{mood} day. {detail}",
    "{detail}",
    "Today's mood is {mood}. {detail}",
];

fn mood_details(label: MoodLabel) -> [&'static str; 4] {
    match label {
        MoodLabel::VeryBad => [
            "Struggling with anxiety today.",
            "Had trouble sleeping last night, feeling off.",
            "Stressed about upcoming deadlines.",
            "Not feeling motivated at all.",
        ],
        MoodLabel::Bad => [
            "A bit down today but managing.",
            "Work was challenging today.",
            "Feeling somewhat low energy.",
            "Minor headache affecting my mood.",
        ],
        MoodLabel::Neutral => [
            "Average day, nothing special.",
            "Just taking things one step at a time.",
            "Neither good nor bad today.",
            "Steady day, maintaining balance.",
        ],
        MoodLabel::Good => [
            "Had a nice chat with a friend.",
            "Completed some tasks I've been putting off.",
            "Weather was nice which boosted my mood.",
            "Made progress on a personal project.",
        ],
        MoodLabel::Excellent => [
            "Everything went smoothly today!",
            "Feeling very energetic and positive.",
            "Had a breakthrough on something I've been working on.",
            "Great day with lots of accomplishments.",
        ],
    }
}

/// Counts of what `seed_demo_data` wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSummary {
    pub journal_entries: usize,
    pub mood_entries: usize,
}

/// Writes demo journal and mood data for the days before `today`.
pub fn seed_demo_data<M, J>(
    service: &mut CompanionService<M, J>,
    today: NaiveDate,
) -> CompanionResult<DemoSummary>
where
    M: DocumentGateway,
    J: DocumentGateway,
{
    let mut mood_entries = 0;
    for offset in (1..=DEMO_DAYS).rev() {
        let day = today - Duration::days(offset);
        let seed = usize::try_from(offset).unwrap_or(0);

        service.save_journal(&date_key(day), &journal_text(seed))?;

        for slot in 0..(1 + seed % 3) {
            let label = MOOD_ROTATION[(seed * 3 + slot * 7) % MOOD_ROTATION.len()];
            let hour = 8 + (seed * 5 + slot * 4) % 14;
            let minute = (seed * 17 + slot * 23) % 60;
            let Some(at) = day.and_hms_opt(hour as u32, minute as u32, 0) else {
                continue;
            };
            let notes = mood_notes(label, seed + slot);
            service.moods_mut().record_at(at, label, Some(&notes))?;
            mood_entries += 1;
        }
    }

    let summary = DemoSummary {
        journal_entries: usize::try_from(DEMO_DAYS).unwrap_or(0),
        mood_entries,
    };
    info!(
        "event=demo_seed module=demo status=ok journal_entries={} mood_entries={}",
        summary.journal_entries, summary.mood_entries
    );
    Ok(summary)
}

fn journal_text(seed: usize) -> String {
    JOURNAL_TEMPLATES[seed % JOURNAL_TEMPLATES.len()]
        .replace("{feeling}", FEELINGS[(seed * 4) % FEELINGS.len()])
        .replace("{activity}", ACTIVITIES[(seed * 3) % ACTIVITIES.len()])
        .replace("{impact}", IMPACTS[(seed * 7) % IMPACTS.len()])
        .replace("{reflection}", REFLECTIONS[(seed * 9) % REFLECTIONS.len()])
}

fn mood_notes(label: MoodLabel, seed: usize) -> String {
    let details = mood_details(label);
    NOTE_TEMPLATES[seed % NOTE_TEMPLATES.len()]
        .replace("{mood}", &label.as_str().to_lowercase())
        .replace("{detail}", details[seed % details.len()])
}
