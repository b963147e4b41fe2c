//! Energy expenditure
//!
//! Calories = MET × body weight (kg) × duration (hours)
//!
//! Logged durations under a threshold are treated as not reliably logged and
//! replaced by an estimate built from set count and rest time.

use serde::{Deserialize, Serialize};

use super::aggregator::{summarize, ExerciseEntry, WorkoutSummary};
use super::intensity::{classify, Intensity, IntensityResult};
use super::round2;

/// Body weight used when the profile has none
pub const DEFAULT_BODY_WEIGHT_KG: f64 = 70.0;

/// Logged durations below this (6 minutes) are replaced by an estimate
pub const MIN_LOGGED_DURATION_HOURS: f64 = 0.1;

/// Working time assumed per set when estimating duration
pub const DEFAULT_SECONDS_PER_SET: f64 = 30.0;

/// Tuning knobs for the energy converter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyConfig {
    pub default_body_weight_kg: f64,
    pub min_logged_duration_hours: f64,
    pub seconds_per_set: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            default_body_weight_kg: DEFAULT_BODY_WEIGHT_KG,
            min_logged_duration_hours: MIN_LOGGED_DURATION_HOURS,
            seconds_per_set: DEFAULT_SECONDS_PER_SET,
        }
    }
}

/// Where the duration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationSource {
    Logged,
    Inferred,
    /// No exercises, so nothing was timed
    Empty,
}

/// Where the body weight came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyWeightSource {
    Profile,
    Default,
}

/// Calorie estimate for one workout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyEstimate {
    pub calories_burned: f64,
    pub duration_hours: f64,
    pub duration_source: DurationSource,
    pub body_weight_kg: f64,
    pub body_weight_source: BodyWeightSource,
    /// None when the workout has no exercises
    pub intensity: Option<IntensityResult>,
}

fn resolve_body_weight(profile_weight_kg: Option<f64>, config: &EnergyConfig) -> (f64, BodyWeightSource) {
    match profile_weight_kg {
        Some(w) if w.is_finite() && w > 0.0 => (w, BodyWeightSource::Profile),
        _ => (config.default_body_weight_kg, BodyWeightSource::Default),
    }
}

fn resolve_duration(
    logged_duration_seconds: u32,
    summary: &WorkoutSummary,
    config: &EnergyConfig,
) -> (f64, DurationSource) {
    let logged_hours = f64::from(logged_duration_seconds) / 3600.0;
    if logged_hours >= config.min_logged_duration_hours {
        return (logged_hours, DurationSource::Logged);
    }

    let estimated_seconds =
        f64::from(summary.total_sets) * config.seconds_per_set + summary.total_rest_seconds as f64;
    (estimated_seconds / 3600.0, DurationSource::Inferred)
}

/// Convert a MET value into a calorie estimate
pub fn convert(
    met: f64,
    profile_weight_kg: Option<f64>,
    logged_duration_seconds: u32,
    summary: &WorkoutSummary,
    config: &EnergyConfig,
) -> EnergyEstimate {
    let (body_weight_kg, body_weight_source) = resolve_body_weight(profile_weight_kg, config);
    let (duration_hours, duration_source) = resolve_duration(logged_duration_seconds, summary, config);

    let calories = met * body_weight_kg * duration_hours;
    let calories_burned = if calories.is_finite() { round2(calories.max(0.0)) } else { 0.0 };

    EnergyEstimate {
        calories_burned,
        duration_hours,
        duration_source,
        body_weight_kg,
        body_weight_source,
        intensity: None,
    }
}

/// Run the full pipeline: aggregate, classify, convert
pub fn estimate_workout_energy(
    entries: &[ExerciseEntry],
    explicit_intensity: Option<Intensity>,
    profile_weight_kg: Option<f64>,
    logged_duration_seconds: u32,
    config: &EnergyConfig,
) -> EnergyEstimate {
    let summary = summarize(entries);

    if summary.is_empty() {
        let (body_weight_kg, body_weight_source) = resolve_body_weight(profile_weight_kg, config);
        return EnergyEstimate {
            calories_burned: 0.0,
            duration_hours: 0.0,
            duration_source: DurationSource::Empty,
            body_weight_kg,
            body_weight_source,
            intensity: None,
        };
    }

    let intensity = classify(&summary, explicit_intensity);
    let estimate = convert(intensity.met, profile_weight_kg, logged_duration_seconds, &summary, config);

    EnergyEstimate { intensity: Some(intensity), ..estimate }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::aggregator::{ExerciseCategory, SetRecord};
    use crate::metrics::intensity::IntensityRule;

    fn summary_with(total_sets: u32, total_rest_seconds: u64) -> WorkoutSummary {
        WorkoutSummary {
            exercise_count: 1,
            total_sets,
            total_rest_seconds,
            ..WorkoutSummary::default()
        }
    }

    #[test]
    fn test_logged_duration_used() {
        let estimate = convert(3.5, Some(80.0), 3600, &summary_with(10, 600), &EnergyConfig::default());
        assert_eq!(estimate.duration_source, DurationSource::Logged);
        assert_eq!(estimate.duration_hours, 1.0);
        assert_eq!(estimate.calories_burned, 280.0);
        assert_eq!(estimate.body_weight_source, BodyWeightSource::Profile);
    }

    #[test]
    fn test_short_duration_is_inferred() {
        // (10 × 30 + 600) / 3600 = 0.25 h
        let estimate = convert(5.0, Some(80.0), 200, &summary_with(10, 600), &EnergyConfig::default());
        assert_eq!(estimate.duration_source, DurationSource::Inferred);
        assert!((estimate.duration_hours - 0.25).abs() < 1e-12);
        assert_eq!(estimate.calories_burned, 100.0);
    }

    #[test]
    fn test_six_minutes_is_logged() {
        let estimate = convert(3.0, Some(70.0), 360, &summary_with(2, 0), &EnergyConfig::default());
        assert_eq!(estimate.duration_source, DurationSource::Logged);
        assert_eq!(estimate.calories_burned, 21.0);
    }

    #[test]
    fn test_default_body_weight() {
        let config = EnergyConfig::default();
        for weight in [None, Some(0.0), Some(-5.0), Some(f64::NAN)] {
            let estimate = convert(6.0, weight, 1800, &summary_with(8, 480), &config);
            assert_eq!(estimate.body_weight_kg, 70.0);
            assert_eq!(estimate.body_weight_source, BodyWeightSource::Default);
            assert_eq!(estimate.calories_burned, 210.0);
        }
    }

    #[test]
    fn test_configured_constants() {
        let config = EnergyConfig {
            default_body_weight_kg: 90.0,
            min_logged_duration_hours: 0.5,
            seconds_per_set: 60.0,
        };
        // 1200 s logged is under 0.5 h, so (10 × 60 + 600) / 3600 = 1/3 h
        let estimate = convert(3.0, None, 1200, &summary_with(10, 600), &config);
        assert_eq!(estimate.duration_source, DurationSource::Inferred);
        assert_eq!(estimate.calories_burned, 90.0);
    }

    #[test]
    fn test_zero_duration_and_no_sets() {
        let estimate = convert(3.0, Some(80.0), 0, &summary_with(0, 0), &EnergyConfig::default());
        assert_eq!(estimate.duration_hours, 0.0);
        assert_eq!(estimate.calories_burned, 0.0);
    }

    #[test]
    fn test_empty_workout_short_circuits() {
        let estimate = estimate_workout_energy(&[], Some(Intensity::High), Some(80.0), 3600, &EnergyConfig::default());
        assert_eq!(estimate.calories_burned, 0.0);
        assert_eq!(estimate.duration_hours, 0.0);
        assert_eq!(estimate.duration_source, DurationSource::Empty);
        assert!(estimate.intensity.is_none());
    }

    #[test]
    fn test_warmup_only_workout_uses_inferred_path() {
        let entries = vec![ExerciseEntry {
            category: ExerciseCategory::Compound,
            sets: vec![SetRecord { is_warmup: true, weight_kg: 60.0, reps: 10, rest_seconds: 120 }],
        }];
        let estimate = estimate_workout_energy(&entries, None, Some(80.0), 0, &EnergyConfig::default());
        assert_eq!(estimate.duration_source, DurationSource::Inferred);
        assert_eq!(estimate.duration_hours, 0.0);
        assert_eq!(estimate.calories_burned, 0.0);
        assert_eq!(estimate.intensity.map(|i| i.rule), Some(IntensityRule::Moderate));
    }

    #[test]
    fn test_full_pipeline() {
        let set = SetRecord { is_warmup: false, weight_kg: 120.0, reps: 5, rest_seconds: 210 };
        let entries: Vec<ExerciseEntry> = (0..4)
            .map(|_| ExerciseEntry { category: ExerciseCategory::Compound, sets: vec![set; 5] })
            .collect();

        let estimate = estimate_workout_energy(&entries, None, Some(90.0), 5400, &EnergyConfig::default());
        let intensity = estimate.intensity.unwrap();
        assert_eq!(intensity.rule, IntensityRule::Powerlifting);
        // 5.0 × 90 × 1.5
        assert_eq!(estimate.calories_burned, 675.0);
    }

    #[test]
    fn test_estimate_is_idempotent() {
        let entries = vec![ExerciseEntry {
            category: ExerciseCategory::Isolation,
            sets: vec![SetRecord { is_warmup: false, weight_kg: 15.0, reps: 12, rest_seconds: 75 }; 3],
        }];
        let config = EnergyConfig::default();
        let a = estimate_workout_energy(&entries, None, None, 1500, &config);
        let b = estimate_workout_energy(&entries, None, None, 1500, &config);
        assert_eq!(a, b);
    }
}
