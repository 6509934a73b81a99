//! Text sentiment scoring.
//!
//! # Responsibility
//! - Map free text to a polarity score in `[-1, 1]`.
//!
//! # Invariants
//! - Scoring is deterministic for a given text.
//! - Blank text is not scored; callers fall back to `MoodLabel::fixed_score`.

pub mod lexicon;

pub use lexicon::LexiconScorer;

/// Polarity scorer seam used by the mood store.
pub trait SentimentScorer {
    /// Returns a polarity in `[-1, 1]`; positive text scores above negative text.
    fn score(&self, text: &str) -> f64;
}

impl<S: SentimentScorer + ?Sized> SentimentScorer for Box<S> {
    fn score(&self, text: &str) -> f64 {
        (**self).score(text)
    }
}
