//! Mood history chart data.
//!
//! Scores are plotted against time with fixed horizontal reference bands.

use crate::model::mood::{MoodLabel, MoodTimestamp};
use crate::model::order::SortOrder;
use crate::repo::DocumentGateway;
use crate::store::MoodStore;
use serde::Serialize;

/// Horizontal reference line on the mood chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoodBand {
    pub label: MoodLabel,
    pub score: f64,
}

/// Reference lines from top to bottom.
pub const REFERENCE_BANDS: [MoodBand; 5] = [
    MoodBand {
        label: MoodLabel::Excellent,
        score: 0.75,
    },
    MoodBand {
        label: MoodLabel::Good,
        score: 0.25,
    },
    MoodBand {
        label: MoodLabel::Neutral,
        score: 0.0,
    },
    MoodBand {
        label: MoodLabel::Bad,
        score: -0.25,
    },
    MoodBand {
        label: MoodLabel::VeryBad,
        score: -0.75,
    },
];

/// Y-axis limits for the score chart.
pub const CHART_Y_RANGE: (f64, f64) = (-1.1, 1.1);

/// One plotted mood sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub timestamp: MoodTimestamp,
    pub score: f64,
    pub label: MoodLabel,
}

/// Classifies a score into the zone delimited by the reference lines.
///
/// Scores at or above 0.75 are Excellent, at or above 0.25 Good, above -0.25
/// Neutral, above -0.75 Bad, everything lower Very Bad.
pub fn band_for_score(score: f64) -> MoodLabel {
    if score >= 0.75 {
        MoodLabel::Excellent
    } else if score >= 0.25 {
        MoodLabel::Good
    } else if score > -0.25 {
        MoodLabel::Neutral
    } else if score > -0.75 {
        MoodLabel::Bad
    } else {
        MoodLabel::VeryBad
    }
}

/// Chronological score series for the mood chart.
pub fn mood_series<G: DocumentGateway>(store: &MoodStore<G>) -> Vec<ChartPoint> {
    store
        .list(SortOrder::Chronological)
        .map(|record| ChartPoint {
            timestamp: record.timestamp,
            score: record.sentiment_score,
            label: record.label,
        })
        .collect()
}
