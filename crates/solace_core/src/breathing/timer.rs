//! Tick pacing and cooperative cancellation.
//!
//! # Invariants
//! - A `Ticker` either completes a full tick interval or reports `Cancelled`;
//!   it never returns part-way through an interval as success.
//! - Cancellation is sticky: once requested, every later check observes it.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Length of one breathing tick.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Early-termination signal. Not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

impl Display for Cancelled {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("breathing session cancelled")
    }
}

impl Error for Cancelled {}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

/// Shared cancellation flag; clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    state: Arc<CancelState>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation and wakes any waiting ticker.
    pub fn cancel(&self) {
        let mut cancelled = self
            .state
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *cancelled = true;
        self.state.wake.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self
            .state
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until `deadline` or cancellation, whichever comes first.
    pub fn wait_until(&self, deadline: Instant) -> Result<(), Cancelled> {
        let mut cancelled = self
            .state
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        loop {
            if *cancelled {
                return Err(Cancelled);
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            let (guard, _timeout) = self
                .state
                .wake
                .wait_timeout(cancelled, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            cancelled = guard;
        }
    }
}

/// Suspension point between breathing ticks.
pub trait Ticker {
    /// Waits one tick interval, or returns `Cancelled` as soon as the token fires.
    fn wait_tick(&mut self, cancel: &CancellationToken) -> Result<(), Cancelled>;
}

/// Wall-clock ticker with drift-free deadlines.
#[derive(Debug, Clone)]
pub struct IntervalTicker {
    period: Duration,
    next_deadline: Option<Instant>,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_deadline: None,
        }
    }

    pub fn every_second() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl Default for IntervalTicker {
    fn default() -> Self {
        Self::every_second()
    }
}

impl Ticker for IntervalTicker {
    fn wait_tick(&mut self, cancel: &CancellationToken) -> Result<(), Cancelled> {
        let deadline = self.next_deadline.unwrap_or_else(Instant::now) + self.period;
        cancel.wait_until(deadline)?;
        self.next_deadline = Some(deadline);
        Ok(())
    }
}

/// Ticker that never sleeps; it only counts virtual time.
#[derive(Debug, Clone, Default)]
pub struct VirtualTicker {
    ticks: u64,
}

impl VirtualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed tick intervals so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Virtual time elapsed.
    pub fn elapsed(&self) -> Duration {
        TICK_INTERVAL * u32::try_from(self.ticks).unwrap_or(u32::MAX)
    }
}

impl Ticker for VirtualTicker {
    fn wait_tick(&mut self, cancel: &CancellationToken) -> Result<(), Cancelled> {
        if cancel.is_cancelled() {
            return Err(Cancelled);
        }
        self.ticks += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CancellationToken, IntervalTicker, Ticker, VirtualTicker};
    use std::time::{Duration, Instant};

    #[test]
    fn cancel_is_visible_through_clones() {
        let token = CancellationToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }

    #[test]
    fn virtual_ticker_counts_without_sleeping() {
        let token = CancellationToken::new();
        let mut ticker = VirtualTicker::new();
        let started = Instant::now();
        for _ in 0..100 {
            ticker.wait_tick(&token).unwrap();
        }
        assert_eq!(ticker.ticks(), 100);
        assert_eq!(ticker.elapsed(), Duration::from_secs(100));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn interval_ticker_waits_roughly_one_period() {
        let token = CancellationToken::new();
        let mut ticker = IntervalTicker::new(Duration::from_millis(20));
        let started = Instant::now();
        ticker.wait_tick(&token).unwrap();
        ticker.wait_tick(&token).unwrap();
        assert!(started.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn interval_ticker_wakes_on_cancel_from_another_thread() {
        let token = CancellationToken::new();
        let remote = token.clone();
        let mut ticker = IntervalTicker::new(Duration::from_secs(30));

        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });

        let started = Instant::now();
        assert!(ticker.wait_tick(&token).is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
        handle.join().unwrap();
    }
}
