//! Intensity classification
//!
//! Maps a workout summary (or an explicit intensity tag) to a MET value.
//! Heuristics are a priority-ordered decision list: the first rule whose
//! condition holds wins, so overlapping conditions resolve by position.

use serde::{Deserialize, Serialize};

use super::aggregator::WorkoutSummary;

/// Light effort: small isolation moves with long rests
pub const MET_LIGHT: f64 = 3.0;

/// Moderate/general: standard gym routine
pub const MET_MODERATE: f64 = 3.5;

/// Powerlifting: very heavy loads with long rest periods
pub const MET_POWERLIFTING: f64 = 5.0;

/// Vigorous/bodybuilding: heavy compound work with short rest
pub const MET_VIGOROUS: f64 = 6.0;

/// Intensity tag logged on a workout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    /// Leaves the decision to the heuristics
    #[default]
    Medium,
    High,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Intensity::Low),
            "medium" => Some(Intensity::Medium),
            "high" => Some(Intensity::High),
            _ => None,
        }
    }
}

/// The rule that produced a MET value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityRule {
    ExplicitHigh,
    ExplicitLow,
    Powerlifting,
    Vigorous,
    Moderate,
    Light,
}

/// Classification outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntensityResult {
    pub met: f64,
    pub rule: IntensityRule,
}

/// Inputs the heuristic rules look at
#[derive(Debug, Clone, Copy)]
struct Features {
    compound_ratio: f64,
    avg_rest_minutes: f64,
    max_weight: f64,
    total_sets: u32,
}

struct HeuristicRule {
    rule: IntensityRule,
    met: f64,
    applies: fn(&Features) -> bool,
}

/// Evaluated top-down; the last entry always matches
const HEURISTIC_RULES: [HeuristicRule; 4] = [
    HeuristicRule {
        rule: IntensityRule::Powerlifting,
        met: MET_POWERLIFTING,
        applies: |f| f.max_weight > 100.0 && f.avg_rest_minutes > 3.0,
    },
    HeuristicRule {
        rule: IntensityRule::Vigorous,
        met: MET_VIGOROUS,
        applies: |f| f.compound_ratio > 0.5 && f.max_weight > 50.0 && f.avg_rest_minutes < 2.0,
    },
    HeuristicRule {
        rule: IntensityRule::Moderate,
        met: MET_MODERATE,
        applies: |f| f.compound_ratio > 0.3 || f.total_sets > 15,
    },
    HeuristicRule {
        rule: IntensityRule::Light,
        met: MET_LIGHT,
        applies: |_| true,
    },
];

/// Classify a workout's intensity
pub fn classify(summary: &WorkoutSummary, explicit: Option<Intensity>) -> IntensityResult {
    match explicit {
        Some(Intensity::High) => {
            return IntensityResult { met: MET_VIGOROUS, rule: IntensityRule::ExplicitHigh };
        }
        Some(Intensity::Low) => {
            return IntensityResult { met: MET_LIGHT, rule: IntensityRule::ExplicitLow };
        }
        Some(Intensity::Medium) | None => {}
    }

    let features = Features {
        compound_ratio: summary.compound_ratio(),
        avg_rest_minutes: summary.avg_rest_minutes(),
        max_weight: summary.max_weight,
        total_sets: summary.total_sets,
    };

    HEURISTIC_RULES
        .iter()
        .find(|r| (r.applies)(&features))
        .map(|r| IntensityResult { met: r.met, rule: r.rule })
        .unwrap_or(IntensityResult { met: MET_LIGHT, rule: IntensityRule::Light })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(
        compound: u32,
        isolation: u32,
        total_sets: u32,
        total_rest_seconds: u64,
        max_weight: f64,
    ) -> WorkoutSummary {
        WorkoutSummary {
            exercise_count: compound + isolation,
            total_sets,
            total_rest_seconds,
            compound_exercise_count: compound,
            isolation_exercise_count: isolation,
            total_volume: 0.0,
            max_weight,
        }
    }

    #[test]
    fn test_explicit_high_overrides_everything() {
        for s in [
            WorkoutSummary::default(),
            summary(0, 5, 4, 4 * 300, 10.0),
            summary(4, 0, 20, 20 * 210, 120.0),
        ] {
            let result = classify(&s, Some(Intensity::High));
            assert_eq!(result.met, 6.0);
            assert_eq!(result.rule, IntensityRule::ExplicitHigh);
        }
    }

    #[test]
    fn test_explicit_low() {
        let result = classify(&summary(4, 0, 20, 20 * 60, 80.0), Some(Intensity::Low));
        assert_eq!(result, IntensityResult { met: 3.0, rule: IntensityRule::ExplicitLow });
    }

    #[test]
    fn test_powerlifting_fires_before_vigorous() {
        // 20 compound sets, max 120 kg, 3.5 minutes average rest
        let s = summary(4, 0, 20, 20 * 210, 120.0);
        let result = classify(&s, None);
        assert_eq!(result.met, 5.0);
        assert_eq!(result.rule, IntensityRule::Powerlifting);
    }

    #[test]
    fn test_vigorous() {
        let s = summary(3, 1, 12, 12 * 90, 80.0);
        assert_eq!(classify(&s, Some(Intensity::Medium)).rule, IntensityRule::Vigorous);
        assert_eq!(classify(&s, None).met, 6.0);
    }

    #[test]
    fn test_heavy_with_medium_rest_is_not_powerlifting() {
        // max > 100 but rest exactly 3.0 minutes, compound ratio 1.0, rest not < 2
        let s = summary(2, 0, 10, 10 * 180, 140.0);
        let result = classify(&s, None);
        assert_eq!(result.rule, IntensityRule::Moderate);
        assert_eq!(result.met, 3.5);
    }

    #[test]
    fn test_moderate_by_set_count() {
        let s = summary(0, 5, 16, 16 * 90, 30.0);
        assert_eq!(classify(&s, None).rule, IntensityRule::Moderate);
    }

    #[test]
    fn test_light() {
        let s = summary(0, 3, 9, 9 * 150, 20.0);
        let result = classify(&s, None);
        assert_eq!(result, IntensityResult { met: 3.0, rule: IntensityRule::Light });
    }

    #[test]
    fn test_empty_summary_is_light() {
        assert_eq!(classify(&WorkoutSummary::default(), None).rule, IntensityRule::Light);
    }

    #[test]
    fn test_compound_ratio_boundary() {
        // ratio exactly 0.5 is not vigorous
        let s = summary(1, 1, 6, 6 * 60, 60.0);
        assert_eq!(classify(&s, None).rule, IntensityRule::Moderate);
    }

    #[test]
    fn test_intensity_parse() {
        assert_eq!(Intensity::from_str("HIGH"), Some(Intensity::High));
        assert_eq!(Intensity::from_str("extreme"), None);
        assert_eq!(Intensity::default(), Intensity::Medium);
    }
}
