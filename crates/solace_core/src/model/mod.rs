//! Domain model for mood, journal and breathing data.
//!
//! # Responsibility
//! - Define canonical data structures used by stores and the breathing engine.
//! - Own document key formats and input validation.
//!
//! # Invariants
//! - Mood records are keyed by minute-precision timestamps.
//! - Journal entries are keyed by calendar date, one per day.
//! - Breathing techniques are validated at construction.

pub mod breathing;
pub mod journal;
pub mod mood;
pub mod order;
pub mod validation;
