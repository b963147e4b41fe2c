//! Stateless estimate tools
//!
//! Run the estimators on caller-supplied data without touching the database.

use serde::Serialize;

use crate::metrics::{
    estimate_body_fat as navy_body_fat, estimate_workout_energy as workout_energy, summarize,
    EnergyConfig, EnergyEstimate, ExerciseEntry, Gender, Measurement, WorkoutSummary,
};

use super::workouts::parse_intensity;

/// Result of a body-fat estimate
#[derive(Debug, Serialize)]
pub struct BodyFatEstimate {
    pub gender: Gender,
    pub body_fat_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unavailable_reason: Option<String>,
}

/// Result of a workout energy estimate
#[derive(Debug, Serialize)]
pub struct WorkoutEnergyEstimate {
    pub summary: WorkoutSummary,
    pub energy: EnergyEstimate,
}

/// Estimate body fat from circumferences
pub fn estimate_body_fat(
    gender: &str,
    height_cm: f64,
    waist_cm: f64,
    neck_cm: f64,
    hips_cm: Option<f64>,
    weight_kg: Option<f64>,
) -> Result<BodyFatEstimate, String> {
    let gender = Gender::from_str(gender)
        .ok_or_else(|| format!("Invalid gender: '{}'. Valid values: male, female", gender))?;

    let result = navy_body_fat(&Measurement {
        height_cm,
        weight_kg: weight_kg.unwrap_or(0.0),
        waist_cm,
        neck_cm,
        hips_cm,
        gender,
    });

    Ok(match result {
        Ok(value) => BodyFatEstimate { gender, body_fat_percentage: Some(value), unavailable_reason: None },
        Err(reason) => BodyFatEstimate {
            gender,
            body_fat_percentage: None,
            unavailable_reason: Some(reason.to_string()),
        },
    })
}

/// Estimate calories for an ad-hoc workout
pub fn estimate_workout_energy(
    config: &EnergyConfig,
    exercises: &[ExerciseEntry],
    intensity: Option<&str>,
    body_weight_kg: Option<f64>,
    duration_seconds: Option<u32>,
) -> Result<WorkoutEnergyEstimate, String> {
    let intensity = parse_intensity(intensity)?;

    for (i, entry) in exercises.iter().enumerate() {
        if let Some(set) = entry.sets.iter().find(|s| !s.weight_kg.is_finite() || s.weight_kg < 0.0) {
            return Err(format!(
                "Exercise {} has an invalid set weight: {}",
                i + 1,
                set.weight_kg
            ));
        }
    }

    let summary = summarize(exercises);
    let energy = workout_energy(
        exercises,
        intensity,
        body_weight_kg,
        duration_seconds.unwrap_or(0),
        config,
    );

    Ok(WorkoutEnergyEstimate { summary, energy })
}
