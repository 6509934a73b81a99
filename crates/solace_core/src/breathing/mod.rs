//! Guided-breathing timing engine.
//!
//! # Responsibility
//! - Sequence inhale/hold/exhale/hold phases over a fixed number of cycles.
//! - Pace ticks through an injectable `Ticker` with cooperative cancellation.
//! - Count completed sessions for encouragement messaging.
//!
//! # Invariants
//! - Events are emitted strictly in phase/cycle order.
//! - A cancelled run emits no terminal event and leaves the tracker unchanged.

pub mod runner;
pub mod session;
pub mod timer;

pub use runner::{run_session, CompletionSummary, RunOutcome, SessionEvent, SessionTracker};
pub use session::{BreathingSession, SessionState, TickEvent};
pub use timer::{
    CancellationToken, Cancelled, IntervalTicker, Ticker, VirtualTicker, TICK_INTERVAL,
};
