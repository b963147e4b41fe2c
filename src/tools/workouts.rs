//! Workout MCP Tools
//!
//! Tools for logging workouts, their exercises and sets. Every mutation
//! re-estimates the workout's calories before returning.

use serde::Serialize;

use crate::db::Database;
use crate::metrics::{
    estimate_workout_energy, summarize, EnergyConfig, EnergyEstimate, ExerciseCategory,
    Intensity, WorkoutSummary,
};
use crate::models::{
    Exercise, ExerciseSet, ExerciseSetCreate, ExerciseSetUpdate, User, UserProfile, Workout,
    WorkoutCreate, WorkoutExercise, WorkoutExerciseCreate, WorkoutUpdate,
};

// ============================================================================
// Response Structs
// ============================================================================

/// Workout with exercises, sets and the current energy breakdown
#[derive(Debug, Serialize)]
pub struct WorkoutDetail {
    pub workout: Workout,
    pub exercises: Vec<WorkoutExerciseDetail>,
    pub summary: WorkoutSummary,
    pub energy: EnergyEstimate,
}

/// Exercise within a workout
#[derive(Debug, Serialize)]
pub struct WorkoutExerciseDetail {
    pub id: i64,
    pub exercise_id: i64,
    pub name: String,
    pub category: ExerciseCategory,
    pub exercise_order: i32,
    pub one_rep_max: Option<f64>,
    pub sets: Vec<ExerciseSet>,
}

/// Response for set mutations
#[derive(Debug, Serialize)]
pub struct SetResponse {
    pub set: ExerciseSet,
    pub workout_id: i64,
    pub workout_calories_burned: Option<f64>,
}

/// Response for recalculate_workout_calories
#[derive(Debug, Serialize)]
pub struct RecalculateResponse {
    pub workout_id: i64,
    pub previous_calories_burned: Option<f64>,
    pub estimate: EnergyEstimate,
}

/// Response for delete operations
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

// ============================================================================
// Validation
// ============================================================================

pub(crate) fn parse_intensity(intensity: Option<&str>) -> Result<Option<Intensity>, String> {
    match intensity {
        Some(s) => Intensity::from_str(s)
            .map(Some)
            .ok_or_else(|| format!("Invalid intensity: '{}'. Valid values: low, medium, high", s)),
        None => Ok(None),
    }
}

fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if !weight_kg.is_finite() || weight_kg < 0.0 {
        return Err(format!("weight_kg must be zero or positive, got {}", weight_kg));
    }
    Ok(())
}

fn workout_calories(conn: &rusqlite::Connection, workout_id: i64) -> Result<Option<f64>, String> {
    Workout::get_by_id(conn, workout_id)
        .map_err(|e| format!("Failed to get workout: {}", e))
        .map(|w| w.and_then(|w| w.calories_burned))
}

// ============================================================================
// Workout Tools
// ============================================================================

/// Create a workout
#[allow(clippy::too_many_arguments)]
pub fn create_workout(
    db: &Database,
    config: &EnergyConfig,
    user_id: i64,
    title: &str,
    datetime: Option<&str>,
    duration_seconds: u32,
    intensity: Option<&str>,
    notes: Option<&str>,
    is_rest_day: bool,
) -> Result<Workout, String> {
    let intensity = parse_intensity(intensity)?.unwrap_or_default();

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if User::get_by_id(&conn, user_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!("User not found: {}", user_id));
    }

    let data = WorkoutCreate {
        user_id,
        title: title.to_string(),
        datetime: datetime.map(String::from),
        duration_seconds,
        intensity,
        notes: notes.map(String::from),
        is_rest_day,
    };

    Workout::create(&conn, &data, config).map_err(|e| format!("Failed to create workout: {}", e))
}

/// Get a workout with full details
pub fn get_workout(db: &Database, config: &EnergyConfig, id: i64) -> Result<Option<WorkoutDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let workout = match Workout::get_by_id(&conn, id).map_err(|e| format!("Failed to get workout: {}", e))? {
        Some(w) => w,
        None => return Ok(None),
    };

    let workout_exercises = WorkoutExercise::list_for_workout(&conn, id)
        .map_err(|e| format!("Failed to get workout exercises: {}", e))?;

    let mut exercises = Vec::with_capacity(workout_exercises.len());
    for we in workout_exercises {
        let exercise = Exercise::get_by_id(&conn, we.exercise_id)
            .map_err(|e| format!("Failed to get exercise: {}", e))?
            .ok_or_else(|| format!("Exercise not found: {}", we.exercise_id))?;
        let sets = ExerciseSet::list_for_workout_exercise(&conn, we.id)
            .map_err(|e| format!("Failed to get sets: {}", e))?;

        exercises.push(WorkoutExerciseDetail {
            id: we.id,
            exercise_id: exercise.id,
            name: exercise.name,
            category: exercise.category,
            exercise_order: we.exercise_order,
            one_rep_max: we.one_rep_max,
            sets,
        });
    }

    let entries = Workout::load_entries(&conn, id)
        .map_err(|e| format!("Failed to load workout entries: {}", e))?;
    let body_weight_kg = UserProfile::get_for_user(&conn, workout.user_id)
        .map_err(|e| format!("Failed to get profile: {}", e))?
        .and_then(|p| p.body_weight_kg);

    let summary = summarize(&entries);
    let energy = estimate_workout_energy(
        &entries,
        Some(workout.intensity),
        body_weight_kg,
        workout.duration_seconds,
        config,
    );

    Ok(Some(WorkoutDetail { workout, exercises, summary, energy }))
}

/// Update a workout; calories are re-estimated
pub fn update_workout(
    db: &Database,
    config: &EnergyConfig,
    id: i64,
    data: WorkoutUpdate,
) -> Result<Option<Workout>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Workout::update(&conn, id, &data, config).map_err(|e| format!("Failed to update workout: {}", e))
}

/// Delete a workout with its exercises and sets
pub fn delete_workout(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let success = Workout::delete(&conn, id).map_err(|e| format!("Failed to delete workout: {}", e))?;

    Ok(DeleteResponse { success, deleted_id: id })
}

/// Force a fresh calorie estimate for a workout
pub fn recalculate_workout_calories(
    db: &Database,
    config: &EnergyConfig,
    id: i64,
) -> Result<RecalculateResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let previous = workout_calories(&conn, id)?;
    let estimate = Workout::recalculate_calories(&conn, id, config)
        .map_err(|e| format!("Failed to recalculate calories: {}", e))?;

    Ok(RecalculateResponse { workout_id: id, previous_calories_burned: previous, estimate })
}

// ============================================================================
// Workout Exercise Tools
// ============================================================================

/// Add a catalog exercise to a workout
pub fn add_workout_exercise(
    db: &Database,
    config: &EnergyConfig,
    workout_id: i64,
    exercise_id: i64,
) -> Result<WorkoutExercise, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if Workout::get_by_id(&conn, workout_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!("Workout not found: {}", workout_id));
    }
    if Exercise::get_by_id(&conn, exercise_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!("Exercise not found: {}", exercise_id));
    }

    WorkoutExercise::create(&conn, &WorkoutExerciseCreate { workout_id, exercise_id }, config)
        .map_err(|e| format!("Failed to add exercise to workout: {}", e))
}

/// Remove an exercise and its sets from a workout
pub fn remove_workout_exercise(
    db: &Database,
    config: &EnergyConfig,
    id: i64,
) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let success = WorkoutExercise::delete(&conn, id, config)
        .map_err(|e| format!("Failed to remove workout exercise: {}", e))?;

    Ok(DeleteResponse { success, deleted_id: id })
}

// ============================================================================
// Set Tools
// ============================================================================

/// Log a set
#[allow(clippy::too_many_arguments)]
pub fn add_exercise_set(
    db: &Database,
    config: &EnergyConfig,
    workout_exercise_id: i64,
    reps: u32,
    weight_kg: f64,
    rest_time_before_set: u32,
    is_warmup: bool,
    reps_in_reserve: u32,
) -> Result<SetResponse, String> {
    validate_weight(weight_kg)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let workout_id = WorkoutExercise::get_by_id(&conn, workout_exercise_id)
        .map_err(|e| format!("Database error: {}", e))?
        .map(|we| we.workout_id)
        .ok_or_else(|| format!("Workout exercise not found: {}", workout_exercise_id))?;

    let set = ExerciseSet::create(&conn, &ExerciseSetCreate {
        workout_exercise_id,
        reps,
        weight_kg,
        rest_time_before_set,
        is_warmup,
        reps_in_reserve,
    }, config)
    .map_err(|e| format!("Failed to add set: {}", e))?;

    Ok(SetResponse {
        set,
        workout_id,
        workout_calories_burned: workout_calories(&conn, workout_id)?,
    })
}

/// Update a set
pub fn update_exercise_set(
    db: &Database,
    config: &EnergyConfig,
    id: i64,
    data: ExerciseSetUpdate,
) -> Result<Option<SetResponse>, String> {
    if let Some(w) = data.weight_kg {
        validate_weight(w)?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let set = match ExerciseSet::update(&conn, id, &data, config)
        .map_err(|e| format!("Failed to update set: {}", e))?
    {
        Some(s) => s,
        None => return Ok(None),
    };

    let workout_id = WorkoutExercise::get_by_id(&conn, set.workout_exercise_id)
        .map_err(|e| format!("Database error: {}", e))?
        .map(|we| we.workout_id)
        .ok_or_else(|| format!("Workout exercise not found: {}", set.workout_exercise_id))?;

    Ok(Some(SetResponse {
        set,
        workout_id,
        workout_calories_burned: workout_calories(&conn, workout_id)?,
    }))
}

/// Delete a set
pub fn delete_exercise_set(db: &Database, config: &EnergyConfig, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let success = ExerciseSet::delete(&conn, id, config)
        .map_err(|e| format!("Failed to delete set: {}", e))?;

    Ok(DeleteResponse { success, deleted_id: id })
}
