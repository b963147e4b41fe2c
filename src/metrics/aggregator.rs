//! Workout aggregation
//!
//! Reduces a workout's exercise and set breakdown into the summary statistics
//! the intensity classifier and energy converter work from.

use serde::{Deserialize, Serialize};

/// Exercise category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseCategory {
    Compound,
    Isolation,
}

impl ExerciseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseCategory::Compound => "compound",
            ExerciseCategory::Isolation => "isolation",
        }
    }

    /// Anything that is not tagged compound counts as isolation
    pub fn from_tag(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "compound" => ExerciseCategory::Compound,
            _ => ExerciseCategory::Isolation,
        }
    }

    /// Strict parse for user input
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "compound" => Some(ExerciseCategory::Compound),
            "isolation" => Some(ExerciseCategory::Isolation),
            _ => None,
        }
    }
}

/// One logged set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
    pub is_warmup: bool,
    pub weight_kg: f64,
    pub reps: u32,
    /// Rest taken before this set, in seconds
    pub rest_seconds: u32,
}

/// One exercise within a workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub category: ExerciseCategory,
    pub sets: Vec<SetRecord>,
}

/// Summary statistics over a workout's working sets
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub exercise_count: u32,
    pub total_sets: u32,
    pub total_rest_seconds: u64,
    pub compound_exercise_count: u32,
    pub isolation_exercise_count: u32,
    pub total_volume: f64,
    pub max_weight: f64,
}

impl WorkoutSummary {
    /// True when no exercises were logged
    pub fn is_empty(&self) -> bool {
        self.exercise_count == 0
    }

    /// Share of exercises tagged compound (0 when there are none)
    pub fn compound_ratio(&self) -> f64 {
        let total = self.compound_exercise_count + self.isolation_exercise_count;
        if total == 0 {
            return 0.0;
        }
        f64::from(self.compound_exercise_count) / f64::from(total)
    }

    /// Average rest per working set in minutes (0 when there are no sets)
    pub fn avg_rest_minutes(&self) -> f64 {
        if self.total_sets == 0 {
            return 0.0;
        }
        (self.total_rest_seconds as f64 / f64::from(self.total_sets)) / 60.0
    }
}

/// Summarize a workout's exercises
pub fn summarize(entries: &[ExerciseEntry]) -> WorkoutSummary {
    let mut summary = WorkoutSummary::default();

    for entry in entries {
        summary.exercise_count += 1;
        match entry.category {
            ExerciseCategory::Compound => summary.compound_exercise_count += 1,
            ExerciseCategory::Isolation => summary.isolation_exercise_count += 1,
        }

        for set in entry.sets.iter().filter(|s| !s.is_warmup) {
            summary.total_sets += 1;
            summary.total_rest_seconds += u64::from(set.rest_seconds);

            if set.weight_kg > 0.0 && set.reps > 0 {
                summary.total_volume += set.weight_kg * f64::from(set.reps);
                summary.max_weight = summary.max_weight.max(set.weight_kg);
            }
        }
    }

    summary
}
