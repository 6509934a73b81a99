//! Paced session execution and completion tracking.

use crate::breathing::session::{BreathingSession, TickEvent};
use crate::breathing::timer::{CancellationToken, Ticker};
use log::{debug, info};
use serde::Serialize;

/// Count of breathing sessions completed in this process.
///
/// Owned by the caller and passed by reference into `run_session`; reset
/// only by an explicit data clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionTracker {
    completed: u64,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// Counts one completed session and returns the new total.
    pub fn record_completion(&mut self) -> u64 {
        self.completed += 1;
        self.completed
    }

    pub fn reset(&mut self) {
        self.completed = 0;
    }

    /// Message shown after a completed session.
    pub fn encouragement(&self) -> String {
        format!(
            "You have completed {} breathing exercises. Great job!",
            self.completed
        )
    }
}

/// Summary carried by the terminal event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionSummary {
    pub technique: String,
    pub total_seconds: u64,
    pub completed_sessions: u64,
    pub message: String,
}

/// Event stream of a running session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Tick(TickEvent),
    Completed(CompletionSummary),
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(CompletionSummary),
    /// Stopped at a tick boundary; the tracker was not touched.
    Cancelled { elapsed_seconds: u64 },
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

/// Drives `session` to completion or cancellation.
///
/// Each tick waits on `ticker`, then emits `SessionEvent::Tick`. The token is
/// checked before every wait and the wait itself aborts on cancellation, so
/// an interrupted tick is never emitted. On completion the tracker is
/// incremented and one `SessionEvent::Completed` is emitted.
pub fn run_session<T, F>(
    mut session: BreathingSession,
    ticker: &mut T,
    cancel: &CancellationToken,
    tracker: &mut SessionTracker,
    mut on_event: F,
) -> RunOutcome
where
    T: Ticker + ?Sized,
    F: FnMut(&SessionEvent),
{
    let session_id = session.id();
    info!(
        "event=breathing_start module=breathing status=start session_id={} technique=\"{}\" total_seconds={}",
        session_id,
        session.technique().name(),
        session.total_seconds()
    );

    while !session.is_complete() {
        if cancel.is_cancelled() || ticker.wait_tick(cancel).is_err() {
            info!(
                "event=breathing_end module=breathing status=cancelled session_id={} elapsed_seconds={}",
                session_id,
                session.elapsed_seconds()
            );
            return RunOutcome::Cancelled {
                elapsed_seconds: session.elapsed_seconds(),
            };
        }
        let Some(tick) = session.next() else {
            break;
        };
        debug!(
            "event=breathing_tick module=breathing session_id={} cycle={} phase={} remaining={}",
            session_id, tick.cycle, tick.phase, tick.seconds_remaining
        );
        on_event(&SessionEvent::Tick(tick));
    }

    let completed_sessions = tracker.record_completion();
    let summary = CompletionSummary {
        technique: session.technique().name().to_string(),
        total_seconds: session.total_seconds(),
        completed_sessions,
        message: tracker.encouragement(),
    };
    info!(
        "event=breathing_end module=breathing status=ok session_id={} completed_sessions={}",
        session_id, completed_sessions
    );
    on_event(&SessionEvent::Completed(summary.clone()));
    RunOutcome::Completed(summary)
}
