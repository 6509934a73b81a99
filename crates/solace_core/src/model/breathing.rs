//! Breathing technique configuration and catalog.
//!
//! # Responsibility
//! - Define immutable technique settings consumed by the breathing engine.
//! - Provide the built-in technique catalog.
//!
//! # Invariants
//! - At least one of inhale/exhale is longer than zero seconds.
//! - `cycles >= 1`.
//! - The session length in seconds fits in `u64`.
//! - Once constructed through `new`, a technique is always valid.

use crate::model::validation::ValidationError;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// One step of a breathing cycle, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreathPhase {
    Inhale,
    Hold1,
    Exhale,
    Hold2,
}

impl BreathPhase {
    /// Per-cycle execution order.
    pub const SEQUENCE: [BreathPhase; 4] = [
        BreathPhase::Inhale,
        BreathPhase::Hold1,
        BreathPhase::Exhale,
        BreathPhase::Hold2,
    ];

    /// Short instruction shown while the phase runs.
    pub fn cue(self) -> &'static str {
        match self {
            Self::Inhale => "Inhale deeply...",
            Self::Hold1 | Self::Hold2 => "Hold your breath...",
            Self::Exhale => "Exhale slowly...",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inhale => "inhale",
            Self::Hold1 => "hold1",
            Self::Exhale => "exhale",
            Self::Hold2 => "hold2",
        }
    }
}

impl Display for BreathPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable breathing exercise settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreathingTechnique {
    name: String,
    inhale_seconds: u32,
    hold1_seconds: u32,
    exhale_seconds: u32,
    hold2_seconds: u32,
    cycles: u32,
}

impl BreathingTechnique {
    /// Builds a validated technique.
    ///
    /// # Errors
    /// - `ValidationError::InvalidTechnique` when both inhale and exhale are
    ///   zero, `cycles` is zero, or the total length overflows `u64`.
    pub fn new(
        name: impl Into<String>,
        inhale_seconds: u32,
        hold1_seconds: u32,
        exhale_seconds: u32,
        hold2_seconds: u32,
        cycles: u32,
    ) -> Result<Self, ValidationError> {
        let technique = Self {
            name: name.into(),
            inhale_seconds,
            hold1_seconds,
            exhale_seconds,
            hold2_seconds,
            cycles,
        };
        technique.validate()?;
        Ok(technique)
    }

    /// Builds a technique from signed user input, rejecting negative values.
    pub fn from_signed(
        name: impl Into<String>,
        durations: [i64; 4],
        cycles: i64,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let to_seconds = |value: i64, field: &str| {
            u32::try_from(value).map_err(|_| ValidationError::InvalidTechnique {
                name: name.clone(),
                reason: format!("{field} must be between 0 and {}, got {value}", u32::MAX),
            })
        };
        let inhale = to_seconds(durations[0], "inhale_seconds")?;
        let hold1 = to_seconds(durations[1], "hold1_seconds")?;
        let exhale = to_seconds(durations[2], "exhale_seconds")?;
        let hold2 = to_seconds(durations[3], "hold2_seconds")?;
        let cycles = to_seconds(cycles, "cycles")?;
        Self::new(name, inhale, hold1, exhale, hold2, cycles)
    }

    /// Box breathing, 4-4-4-4 for four cycles.
    pub fn box_breathing() -> Self {
        Self::builtin("Box Breathing (4-4-4-4)", 4, 4, 4, 4, 4)
    }

    /// 4-7-8 breathing for four cycles, no trailing hold.
    pub fn four_seven_eight() -> Self {
        Self::builtin("4-7-8 Breathing", 4, 7, 8, 0, 4)
    }

    /// Calm breathing, 5-2-5 for five cycles.
    pub fn calm() -> Self {
        Self::builtin("Calm Breathing (5-2-5)", 5, 2, 5, 0, 5)
    }

    // Catalog values satisfy every invariant checked by `validate`.
    fn builtin(
        name: &str,
        inhale_seconds: u32,
        hold1_seconds: u32,
        exhale_seconds: u32,
        hold2_seconds: u32,
        cycles: u32,
    ) -> Self {
        Self {
            name: name.to_string(),
            inhale_seconds,
            hold1_seconds,
            exhale_seconds,
            hold2_seconds,
            cycles,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.inhale_seconds == 0 && self.exhale_seconds == 0 {
            return Err(ValidationError::InvalidTechnique {
                name: self.name.clone(),
                reason: "inhale_seconds or exhale_seconds must be positive".to_string(),
            });
        }
        if self.cycles == 0 {
            return Err(ValidationError::InvalidTechnique {
                name: self.name.clone(),
                reason: "cycles must be at least 1".to_string(),
            });
        }
        if self
            .cycle_seconds()
            .checked_mul(u64::from(self.cycles))
            .is_none()
        {
            return Err(ValidationError::InvalidTechnique {
                name: self.name.clone(),
                reason: "total session length is too long".to_string(),
            });
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Configured length of one phase.
    pub fn phase_seconds(&self, phase: BreathPhase) -> u32 {
        match phase {
            BreathPhase::Inhale => self.inhale_seconds,
            BreathPhase::Hold1 => self.hold1_seconds,
            BreathPhase::Exhale => self.exhale_seconds,
            BreathPhase::Hold2 => self.hold2_seconds,
        }
    }

    /// Seconds in one full cycle.
    pub fn cycle_seconds(&self) -> u64 {
        BreathPhase::SEQUENCE
            .iter()
            .map(|phase| u64::from(self.phase_seconds(*phase)))
            .sum()
    }

    /// Seconds across all cycles; `validate` guarantees the product fits.
    pub fn total_seconds(&self) -> u64 {
        self.cycle_seconds().saturating_mul(u64::from(self.cycles))
    }

    /// `4-4-4-4` style pattern label.
    pub fn pattern(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.inhale_seconds, self.hold1_seconds, self.exhale_seconds, self.hold2_seconds
        )
    }
}

/// Built-in techniques in menu order.
pub fn technique_catalog() -> Vec<BreathingTechnique> {
    vec![
        BreathingTechnique::box_breathing(),
        BreathingTechnique::four_seven_eight(),
        BreathingTechnique::calm(),
    ]
}

/// Looks up a catalog technique by full name or short alias
/// (`box`, `478`/`4-7-8`, `calm`).
pub fn find_technique(query: &str) -> Result<BreathingTechnique, ValidationError> {
    let normalized = query.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "box" | "box-breathing" => return Ok(BreathingTechnique::box_breathing()),
        "478" | "4-7-8" => return Ok(BreathingTechnique::four_seven_eight()),
        "calm" | "525" | "5-2-5" => return Ok(BreathingTechnique::calm()),
        _ => {}
    }

    technique_catalog()
        .into_iter()
        .find(|technique| technique.name().to_ascii_lowercase() == normalized)
        .ok_or_else(|| ValidationError::UnknownTechnique(query.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::{find_technique, technique_catalog, BreathingTechnique};
    use crate::model::validation::ValidationError;

    #[test]
    fn catalog_entries_are_valid() {
        for technique in technique_catalog() {
            technique.validate().expect("catalog technique should be valid");
        }
    }

    #[test]
    fn totals_multiply_cycle_length_by_cycles() {
        assert_eq!(BreathingTechnique::box_breathing().total_seconds(), 64);
        assert_eq!(BreathingTechnique::four_seven_eight().total_seconds(), 76);
        assert_eq!(BreathingTechnique::calm().total_seconds(), 60);
    }

    #[test]
    fn rejects_zero_cycles_and_breathless_cycles() {
        assert!(matches!(
            BreathingTechnique::new("none", 4, 0, 4, 0, 0),
            Err(ValidationError::InvalidTechnique { .. })
        ));
        assert!(matches!(
            BreathingTechnique::new("holds only", 0, 4, 0, 4, 1),
            Err(ValidationError::InvalidTechnique { .. })
        ));
    }

    #[test]
    fn rejects_techniques_whose_length_overflows() {
        let err = BreathingTechnique::new(
            "endless",
            u32::MAX,
            u32::MAX,
            u32::MAX,
            u32::MAX,
            u32::MAX,
        )
        .unwrap_err();
        assert!(err.to_string().contains("too long"));

        let longest = BreathingTechnique::new("long", u32::MAX, 0, 0, 0, u32::MAX).unwrap();
        assert_eq!(
            longest.total_seconds(),
            u64::from(u32::MAX) * u64::from(u32::MAX)
        );
    }

    #[test]
    fn from_signed_rejects_negative_durations() {
        let err = BreathingTechnique::from_signed("neg", [4, -1, 4, 0], 2).unwrap_err();
        assert!(err.to_string().contains("hold1_seconds"));
    }

    #[test]
    fn find_accepts_aliases_and_full_names() {
        assert_eq!(find_technique("box").unwrap().pattern(), "4-4-4-4");
        assert_eq!(find_technique("4-7-8").unwrap().pattern(), "4-7-8-0");
        assert_eq!(
            find_technique("Calm Breathing (5-2-5)").unwrap().cycles(),
            5
        );
        assert!(matches!(
            find_technique("square"),
            Err(ValidationError::UnknownTechnique(_))
        ));
    }
}
