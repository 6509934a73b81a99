//! Plain-text rendering for terminal output.

use solace_core::insights::{band_for_score, ChartPoint, DashboardSummary, CHART_Y_RANGE};
use solace_core::{MoodRecord, TickEvent};

const BAR_WIDTH: usize = 20;
const CHART_WIDTH: usize = 30;

/// One-line breathing status, redrawn in place on each tick.
pub fn tick_line(tick: &TickEvent) -> String {
    let filled = ((tick.progress * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!(
        "Cycle {}/{}  {:<20} {:>2}s  [{}{}] {:>3}%",
        tick.cycle,
        tick.total_cycles,
        tick.phase.cue(),
        tick.seconds_remaining,
        "#".repeat(filled),
        " ".repeat(BAR_WIDTH - filled),
        (tick.progress * 100.0).round() as u32
    )
}

pub fn mood_line(record: &MoodRecord) -> String {
    let mut line = format!(
        "{}  {:<9}  {:+.2}",
        record.timestamp,
        record.label.as_str(),
        record.sentiment_score
    );
    if let Some(notes) = &record.notes {
        line.push_str("  ");
        line.push_str(notes);
    }
    line
}

/// Horizontal position of `score` within the chart's y-range.
fn chart_column(score: f64) -> usize {
    let (low, high) = CHART_Y_RANGE;
    let ratio = ((score - low) / (high - low)).clamp(0.0, 1.0);
    (ratio * (CHART_WIDTH - 1) as f64).round() as usize
}

/// Score-over-time chart, one row per record, `|` marking the neutral line.
pub fn mood_chart(points: &[ChartPoint]) -> String {
    let zero = chart_column(0.0);
    points
        .iter()
        .map(|point| {
            let column = chart_column(point.score);
            let row: String = (0..CHART_WIDTH)
                .map(|index| match index {
                    i if i == column => '*',
                    i if i == zero => '|',
                    _ => ' ',
                })
                .collect();
            format!(
                "{}  {}  {:+.2} {}",
                point.timestamp,
                row,
                point.score,
                band_for_score(point.score)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn dashboard(summary: &DashboardSummary, prompt: &str) -> String {
    let mut out = String::from("Recent journal entries\n");
    if summary.recent_journal.is_empty() {
        out.push_str("  (none yet)\n");
    }
    for entry in &summary.recent_journal {
        out.push_str(&format!("  {}  {}\n", entry.date, entry.preview));
    }
    out.push_str("\nRecent moods\n");
    if summary.recent_moods.is_empty() {
        out.push_str("  (none yet)\n");
    }
    for record in &summary.recent_moods {
        out.push_str(&format!("  {}\n", mood_line(record)));
    }
    out.push_str(&format!(
        "\nBreathing sessions this run: {}\n",
        summary.completed_sessions
    ));
    out.push_str(&format!("\nToday's prompt: {prompt}"));
    out
}

#[cfg(test)]
mod tests {
    use super::{chart_column, tick_line};
    use solace_core::{BreathingSession, BreathingTechnique};

    #[test]
    fn chart_columns_span_full_width() {
        assert_eq!(chart_column(-1.1), 0);
        assert_eq!(chart_column(1.1), 29);
        assert!(chart_column(-0.5) < chart_column(0.5));
    }

    #[test]
    fn final_tick_shows_full_bar() {
        let last = BreathingSession::start(BreathingTechnique::box_breathing())
            .unwrap()
            .last()
            .unwrap();
        let line = tick_line(&last);
        assert!(line.contains("[####################]"));
        assert!(line.ends_with("100%"));
    }
}
