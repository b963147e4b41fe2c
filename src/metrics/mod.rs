//! Fitness metrics estimation engine
//!
//! Pure calculators used by the persistence layer before a record is written:
//! body-fat percentage from circumference measurements, and workout energy
//! expenditure (aggregation, intensity classification, calorie conversion),
//! and estimated one-rep maxes.

pub mod aggregator;
pub mod body_fat;
pub mod energy;
pub mod intensity;
pub mod strength;

pub use aggregator::{summarize, ExerciseCategory, ExerciseEntry, SetRecord, WorkoutSummary};
pub use body_fat::{body_fat_percentage, estimate_body_fat, BodyFatUnavailable, Gender, Measurement};
pub use energy::{
    convert, estimate_workout_energy, BodyWeightSource, DurationSource, EnergyConfig,
    EnergyEstimate, DEFAULT_BODY_WEIGHT_KG, DEFAULT_SECONDS_PER_SET,
    MIN_LOGGED_DURATION_HOURS,
};
pub use intensity::{classify, Intensity, IntensityResult, IntensityRule};
pub use strength::{best_one_rep_max, estimated_one_rep_max};

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(16.106606), 16.11);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(151.2), 151.2);
    }
}
