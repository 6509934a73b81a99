//! Phase-sequenced countdown state machine.
//!
//! # Invariants
//! - Phases run `Inhale → Hold1 → Exhale → Hold2` per cycle.
//! - A phase of `d` seconds yields `d` ticks counting down `d..=1`.
//! - Zero-length phases yield nothing.
//! - `progress` is non-decreasing and exactly `1.0` on the final tick.

use crate::model::breathing::{BreathPhase, BreathingTechnique};
use crate::model::validation::ValidationError;
use serde::Serialize;
use uuid::Uuid;

const CIRCLE_MIN: f64 = 50.0;
const CIRCLE_MAX: f64 = 90.0;

/// One elapsed second of a breathing session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickEvent {
    /// 1-based cycle number.
    pub cycle: u32,
    pub total_cycles: u32,
    pub phase: BreathPhase,
    pub phase_seconds: u32,
    /// Countdown within the phase, `phase_seconds..=1`.
    pub seconds_remaining: u32,
    /// Seconds elapsed including this tick.
    pub elapsed_seconds: u64,
    pub total_seconds: u64,
    /// `elapsed_seconds / total_seconds`.
    pub progress: f64,
}

impl TickEvent {
    /// Diameter of the guide circle: grows on inhale, shrinks on exhale.
    pub fn circle_size(&self) -> f64 {
        let offset = f64::from(self.phase_seconds - self.seconds_remaining);
        let span = CIRCLE_MAX - CIRCLE_MIN;
        match self.phase {
            BreathPhase::Inhale => CIRCLE_MIN + offset * span / f64::from(self.phase_seconds),
            BreathPhase::Hold1 => CIRCLE_MAX,
            BreathPhase::Exhale => CIRCLE_MAX - offset * span / f64::from(self.phase_seconds),
            BreathPhase::Hold2 => CIRCLE_MIN,
        }
    }
}

/// Engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Complete,
}

/// Transient run-time state of one breathing exercise.
///
/// Iterating the session yields its ticks lazily without waiting; pacing
/// and cancellation live in `run_session`.
#[derive(Debug, Clone)]
pub struct BreathingSession {
    id: Uuid,
    technique: BreathingTechnique,
    cycle_index: u32,
    phase_index: usize,
    remaining: u32,
    elapsed: u64,
    total: u64,
    state: SessionState,
}

impl BreathingSession {
    /// Starts a session positioned before its first tick.
    ///
    /// # Errors
    /// - `ValidationError::InvalidTechnique` when the technique breaks its invariants.
    pub fn start(technique: BreathingTechnique) -> Result<Self, ValidationError> {
        technique.validate()?;
        let total = technique.total_seconds();
        let mut session = Self {
            id: Uuid::new_v4(),
            remaining: technique.phase_seconds(BreathPhase::Inhale),
            technique,
            cycle_index: 0,
            phase_index: 0,
            elapsed: 0,
            total,
            state: SessionState::Running,
        };
        if session.remaining == 0 {
            session.advance_phase();
        }
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn technique(&self) -> &BreathingTechnique {
        &self.technique
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    /// Phase of the next tick, `None` once complete.
    pub fn current_phase(&self) -> Option<BreathPhase> {
        match self.state {
            SessionState::Running => Some(BreathPhase::SEQUENCE[self.phase_index]),
            SessionState::Complete => None,
        }
    }

    /// 1-based cycle of the next tick.
    pub fn current_cycle(&self) -> u32 {
        (self.cycle_index + 1).min(self.technique.cycles())
    }

    pub fn seconds_remaining_in_phase(&self) -> u32 {
        self.remaining
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed
    }

    pub fn total_seconds(&self) -> u64 {
        self.total
    }

    /// Emits the next tick and advances the state machine.
    fn tick(&mut self) -> Option<TickEvent> {
        if self.state == SessionState::Complete {
            return None;
        }

        let phase = BreathPhase::SEQUENCE[self.phase_index];
        self.elapsed += 1;
        let event = TickEvent {
            cycle: self.cycle_index + 1,
            total_cycles: self.technique.cycles(),
            phase,
            phase_seconds: self.technique.phase_seconds(phase),
            seconds_remaining: self.remaining,
            elapsed_seconds: self.elapsed,
            total_seconds: self.total,
            progress: self.elapsed as f64 / self.total as f64,
        };

        self.remaining -= 1;
        if self.remaining == 0 {
            self.advance_phase();
        }
        Some(event)
    }

    // Moves to the next non-empty phase, wrapping into the next cycle or
    // completing after the last one.
    fn advance_phase(&mut self) {
        loop {
            self.phase_index += 1;
            if self.phase_index == BreathPhase::SEQUENCE.len() {
                self.phase_index = 0;
                self.cycle_index += 1;
                if self.cycle_index >= self.technique.cycles() {
                    self.state = SessionState::Complete;
                    self.remaining = 0;
                    return;
                }
            }
            let seconds = self
                .technique
                .phase_seconds(BreathPhase::SEQUENCE[self.phase_index]);
            if seconds > 0 {
                self.remaining = seconds;
                return;
            }
        }
    }
}

impl Iterator for BreathingSession {
    type Item = TickEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.tick()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.total - self.elapsed).unwrap_or(usize::MAX);
        (left, Some(left))
    }
}
