//! Lexicon-based polarity scorer.
//!
//! Words carry a fixed polarity. An intensifier directly before a polar word
//! scales it, and a negator within the preceding three tokens flips and damps
//! it. The score is the mean of adjusted polarities, clamped to `[-1, 1]`.

use crate::sentiment::SentimentScorer;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z]+(?:'[a-z]+)?").expect("valid word regex"));

const NEGATION_WINDOW: usize = 3;
const NEGATION_FACTOR: f64 = -0.5;

const POLARITY: &[(&str, f64)] = &[
    ("accomplished", 0.6),
    ("accomplishments", 0.5),
    ("amazing", 0.6),
    ("anxiety", -0.5),
    ("anxious", -0.5),
    ("awful", -1.0),
    ("bad", -0.7),
    ("balance", 0.2),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("boosted", 0.4),
    ("breakthrough", 0.6),
    ("bright", 0.7),
    ("calm", 0.3),
    ("calming", 0.4),
    ("challenging", -0.3),
    ("cheerful", 0.8),
    ("confident", 0.5),
    ("content", 0.4),
    ("depressed", -0.8),
    ("difficult", -0.5),
    ("disappointed", -0.75),
    ("down", -0.3),
    ("enjoy", 0.5),
    ("enjoyable", 0.5),
    ("energetic", 0.5),
    ("excellent", 1.0),
    ("excited", 0.6),
    ("exhausted", -0.6),
    ("fantastic", 0.8),
    ("fine", 0.4),
    ("frustrated", -0.7),
    ("fun", 0.3),
    ("glad", 0.5),
    ("good", 0.7),
    ("grateful", 0.6),
    ("great", 0.8),
    ("happy", 0.8),
    ("hate", -0.8),
    ("headache", -0.4),
    ("helpful", 0.4),
    ("hopeful", 0.5),
    ("hopeless", -0.8),
    ("horrible", -1.0),
    ("hurt", -0.5),
    ("interesting", 0.5),
    ("joy", 0.8),
    ("lonely", -0.5),
    ("love", 0.5),
    ("lovely", 0.6),
    ("low", -0.3),
    ("miserable", -1.0),
    ("motivated", 0.4),
    ("nervous", -0.4),
    ("nice", 0.6),
    ("off", -0.2),
    ("okay", 0.2),
    ("overwhelmed", -0.6),
    ("pain", -0.6),
    ("peaceful", 0.5),
    ("poor", -0.4),
    ("positive", 0.5),
    ("productive", 0.5),
    ("progress", 0.3),
    ("proud", 0.8),
    ("refreshing", 0.5),
    ("relaxed", 0.4),
    ("sad", -0.5),
    ("satisfying", 0.5),
    ("scared", -0.6),
    ("smoothly", 0.4),
    ("stressed", -0.5),
    ("struggling", -0.5),
    ("terrible", -1.0),
    ("thankful", 0.6),
    ("tired", -0.4),
    ("trouble", -0.4),
    ("unhappy", -0.6),
    ("upset", -0.6),
    ("wonderful", 1.0),
    ("worried", -0.5),
    ("worse", -0.6),
    ("worst", -1.0),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.4),
    ("extremely", 1.5),
    ("incredibly", 1.4),
    ("quite", 1.1),
    ("really", 1.3),
    ("so", 1.2),
    ("super", 1.3),
    ("very", 1.3),
    ("bit", 0.7),
    ("slightly", 0.6),
    ("somewhat", 0.7),
];

const NEGATORS: &[&str] = &["not", "no", "never", "neither", "nor", "without", "hardly"];

static POLARITY_TABLE: Lazy<HashMap<&'static str, f64>> =
    Lazy::new(|| POLARITY.iter().copied().collect());
static INTENSIFIER_TABLE: Lazy<HashMap<&'static str, f64>> =
    Lazy::new(|| INTENSIFIERS.iter().copied().collect());

/// Deterministic, model-free sentiment scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = WORD_RE
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .collect();

        let mut total = 0.0;
        let mut count = 0usize;
        for (index, token) in tokens.iter().enumerate() {
            let Some(polarity) = POLARITY_TABLE.get(token) else {
                continue;
            };

            let mut value = *polarity;
            if let Some(previous) = index.checked_sub(1).and_then(|i| tokens.get(i)) {
                if let Some(factor) = INTENSIFIER_TABLE.get(previous) {
                    value *= factor;
                }
            }

            let window_start = index.saturating_sub(NEGATION_WINDOW);
            if tokens[window_start..index].iter().any(|t| is_negator(t)) {
                value *= NEGATION_FACTOR;
            }

            total += value;
            count += 1;
        }

        if count == 0 {
            return 0.0;
        }
        (total / count as f64).clamp(-1.0, 1.0)
    }
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token) || token.ends_with("n't")
}

#[cfg(test)]
mod tests {
    use super::LexiconScorer;
    use crate::sentiment::SentimentScorer;

    #[test]
    fn positive_phrase_outscores_negative_phrase() {
        let scorer = LexiconScorer::new();
        let positive = scorer.score("Feeling very energetic and positive.");
        let negative = scorer.score("Struggling with anxiety today.");
        assert!(positive > 0.0);
        assert!(negative < 0.0);
        assert!(positive > negative);
    }

    #[test]
    fn negation_flips_polarity() {
        let scorer = LexiconScorer::new();
        assert!(scorer.score("I am good") > 0.0);
        assert!(scorer.score("I am not good") < 0.0);
        assert!(scorer.score("it wasn't bad at all") > 0.0);
    }

    #[test]
    fn intensifier_strengthens_and_output_is_clamped() {
        let scorer = LexiconScorer::new();
        assert!(scorer.score("very happy") > scorer.score("happy"));
        assert_eq!(scorer.score("extremely wonderful"), 1.0);
        assert_eq!(scorer.score("absolutely horrible"), -1.0);
    }

    #[test]
    fn text_without_polar_words_is_neutral() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.score("Went to the store on Tuesday."), 0.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let scorer = LexiconScorer::new();
        let text = "Had a nice chat with a friend, but work was difficult.";
        assert_eq!(scorer.score(text), scorer.score(text));
    }
}
