//! Workout model
//!
//! Workouts hold catalog exercises, each with an ordered list of sets. The
//! cached `calories_burned` is re-estimated whenever the workout, its
//! exercises or its sets change.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::metrics::{
    best_one_rep_max, estimate_workout_energy, EnergyConfig, EnergyEstimate, ExerciseCategory,
    ExerciseEntry, Intensity, SetRecord,
};
use super::UserProfile;

/// A logged workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub datetime: String,
    pub duration_seconds: u32,
    pub intensity: Intensity,
    pub notes: Option<String>,
    pub is_done: bool,
    pub is_rest_day: bool,
    pub calories_burned: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutCreate {
    pub user_id: i64,
    pub title: String,
    pub datetime: Option<String>,
    pub duration_seconds: u32,
    pub intensity: Intensity,
    pub notes: Option<String>,
    pub is_rest_day: bool,
}

/// Data for updating a workout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutUpdate {
    pub title: Option<String>,
    pub datetime: Option<String>,
    pub duration_seconds: Option<u32>,
    pub intensity: Option<Intensity>,
    pub notes: Option<String>,
    pub is_done: Option<bool>,
    pub is_rest_day: Option<bool>,
}

impl Workout {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let intensity: String = row.get("intensity")?;

        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            title: row.get("title")?,
            datetime: row.get("datetime")?,
            duration_seconds: row.get("duration_seconds")?,
            intensity: Intensity::from_str(&intensity).unwrap_or_default(),
            notes: row.get("notes")?,
            is_done: row.get::<_, i32>("is_done")? != 0,
            is_rest_day: row.get::<_, i32>("is_rest_day")? != 0,
            calories_burned: row.get("calories_burned")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new workout (no exercises yet)
    pub fn create(conn: &Connection, data: &WorkoutCreate, config: &EnergyConfig) -> DbResult<Self> {
        let datetime = data.datetime.clone().unwrap_or_else(|| {
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
        });

        conn.execute(
            r#"
            INSERT INTO workouts (user_id, title, datetime, duration_seconds, intensity, notes, is_rest_day)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.user_id,
                data.title,
                datetime,
                data.duration_seconds,
                data.intensity.as_str(),
                data.notes,
                data.is_rest_day as i32,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::recalculate_calories(conn, id, config)?;

        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "workout", id })
    }

    /// Get a workout by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(workout) => Ok(Some(workout)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List workouts, newest first, optionally for one user
    pub fn list(conn: &Connection, user_id: Option<i64>) -> DbResult<Vec<Self>> {
        let workouts = match user_id {
            Some(uid) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM workouts WHERE user_id = ?1 ORDER BY datetime DESC"
                )?;
                let rows = stmt.query_map([uid], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare("SELECT * FROM workouts ORDER BY datetime DESC")?;
                let rows = stmt.query_map([], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(workouts)
    }

    /// Update a workout and re-estimate its calories
    pub fn update(
        conn: &Connection,
        id: i64,
        data: &WorkoutUpdate,
        config: &EnergyConfig,
    ) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref title) = data.title {
            updates.push(format!("title = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(title.clone()));
        }
        if let Some(ref datetime) = data.datetime {
            updates.push(format!("datetime = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(datetime.clone()));
        }
        if let Some(duration) = data.duration_seconds {
            updates.push(format!("duration_seconds = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(duration));
        }
        if let Some(intensity) = data.intensity {
            updates.push(format!("intensity = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(intensity.as_str()));
        }
        if let Some(ref notes) = data.notes {
            updates.push(format!("notes = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(notes.clone()));
        }
        if let Some(is_done) = data.is_done {
            updates.push(format!("is_done = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(is_done as i32));
        }
        if let Some(is_rest_day) = data.is_rest_day {
            updates.push(format!("is_rest_day = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(is_rest_day as i32));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE workouts SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        let rows = conn.execute(&sql, params_refs.as_slice())?;
        if rows == 0 {
            return Ok(None);
        }

        Self::recalculate_calories(conn, id, config)?;
        Self::get_by_id(conn, id)
    }

    /// Delete a workout with its exercises and sets
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        // Exercises and sets are deleted via CASCADE
        let rows = conn.execute("DELETE FROM workouts WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Load the exercise/set breakdown the energy estimator works from
    pub fn load_entries(conn: &Connection, id: i64) -> DbResult<Vec<ExerciseEntry>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT we.id, e.category FROM workout_exercises we
            JOIN exercises e ON we.exercise_id = e.id
            WHERE we.workout_id = ?1
            ORDER BY we.exercise_order, we.id
            "#
        )?;
        let exercises = stmt
            .query_map([id], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut set_stmt = conn.prepare(
            r#"
            SELECT is_warmup, weight_kg, reps, rest_time_before_set FROM exercise_sets
            WHERE workout_exercise_id = ?1
            ORDER BY set_number
            "#
        )?;

        let mut entries = Vec::with_capacity(exercises.len());
        for (workout_exercise_id, category) in exercises {
            let sets = set_stmt
                .query_map([workout_exercise_id], |row| {
                    Ok(SetRecord {
                        is_warmup: row.get::<_, i32>(0)? != 0,
                        weight_kg: row.get(1)?,
                        reps: row.get(2)?,
                        rest_seconds: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;

            entries.push(ExerciseEntry {
                category: ExerciseCategory::from_tag(&category),
                sets,
            });
        }

        Ok(entries)
    }

    /// Estimate the workout's calories and store them on the workout
    pub fn recalculate_calories(
        conn: &Connection,
        id: i64,
        config: &EnergyConfig,
    ) -> DbResult<EnergyEstimate> {
        let workout = Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "workout", id })?;

        let body_weight_kg = UserProfile::get_for_user(conn, workout.user_id)?
            .and_then(|p| p.body_weight_kg);
        let entries = Self::load_entries(conn, id)?;

        let estimate = estimate_workout_energy(
            &entries,
            Some(workout.intensity),
            body_weight_kg,
            workout.duration_seconds,
            config,
        );

        conn.execute(
            "UPDATE workouts SET calories_burned = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![estimate.calories_burned, id],
        )?;

        tracing::debug!(
            workout_id = id,
            calories = estimate.calories_burned,
            duration_hours = estimate.duration_hours,
            "Recalculated workout calories"
        );

        Ok(estimate)
    }

    /// Re-estimate every workout of a user, returning how many were touched
    ///
    /// Needed whenever an input that lives outside the workout changes, such
    /// as the profile body weight.
    pub fn recalculate_for_user(conn: &Connection, user_id: i64, config: &EnergyConfig) -> DbResult<usize> {
        let workouts = Self::list(conn, Some(user_id))?;
        for workout in &workouts {
            Self::recalculate_calories(conn, workout.id, config)?;
        }

        tracing::debug!(user_id, count = workouts.len(), "Recalculated workouts for user");
        Ok(workouts.len())
    }
}

/// A catalog exercise placed in a workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub id: i64,
    pub workout_id: i64,
    pub exercise_id: i64,
    pub exercise_order: i32,
    /// Best estimated 1RM across the working sets
    pub one_rep_max: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for adding an exercise to a workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutExerciseCreate {
    pub workout_id: i64,
    pub exercise_id: i64,
}

impl WorkoutExercise {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_id: row.get("workout_id")?,
            exercise_id: row.get("exercise_id")?,
            exercise_order: row.get("exercise_order")?,
            one_rep_max: row.get("one_rep_max")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Append an exercise to a workout
    pub fn create(
        conn: &Connection,
        data: &WorkoutExerciseCreate,
        config: &EnergyConfig,
    ) -> DbResult<Self> {
        let next_order: i32 = conn.query_row(
            "SELECT COALESCE(MAX(exercise_order), 0) + 1 FROM workout_exercises WHERE workout_id = ?1",
            [data.workout_id],
            |row| row.get(0),
        )?;

        conn.execute(
            "INSERT INTO workout_exercises (workout_id, exercise_id, exercise_order) VALUES (?1, ?2, ?3)",
            params![data.workout_id, data.exercise_id, next_order],
        )?;

        let id = conn.last_insert_rowid();
        Workout::recalculate_calories(conn, data.workout_id, config)?;

        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "workout exercise", id })
    }

    /// Get a workout exercise by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM workout_exercises WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(we) => Ok(Some(we)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List exercises in a workout, in order
    pub fn list_for_workout(conn: &Connection, workout_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM workout_exercises WHERE workout_id = ?1 ORDER BY exercise_order, id"
        )?;
        let items = stmt
            .query_map([workout_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Recompute the stored 1RM estimate from the exercise's sets
    pub fn refresh_one_rep_max(conn: &Connection, id: i64) -> DbResult<Option<f64>> {
        let mut stmt = conn.prepare(
            "SELECT is_warmup, weight_kg, reps FROM exercise_sets WHERE workout_exercise_id = ?1"
        )?;
        let sets = stmt
            .query_map([id], |row| {
                Ok(SetRecord {
                    is_warmup: row.get::<_, i32>(0)? != 0,
                    weight_kg: row.get(1)?,
                    reps: row.get(2)?,
                    rest_seconds: 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let one_rep_max = best_one_rep_max(&sets);
        conn.execute(
            "UPDATE workout_exercises SET one_rep_max = ?1, updated_at = datetime('now') WHERE id = ?2",
            params![one_rep_max, id],
        )?;

        Ok(one_rep_max)
    }

    /// Remove an exercise (and its sets) from a workout
    pub fn delete(conn: &Connection, id: i64, config: &EnergyConfig) -> DbResult<bool> {
        let workout_id = match Self::get_by_id(conn, id)? {
            Some(we) => we.workout_id,
            None => return Ok(false),
        };

        let rows = conn.execute("DELETE FROM workout_exercises WHERE id = ?1", [id])?;
        Workout::recalculate_calories(conn, workout_id, config)?;

        Ok(rows > 0)
    }
}

/// A logged set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub id: i64,
    pub workout_exercise_id: i64,
    pub set_number: i32,
    pub reps: u32,
    pub weight_kg: f64,
    /// Seconds of rest before this set
    pub rest_time_before_set: u32,
    pub is_warmup: bool,
    pub reps_in_reserve: u32,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for logging a set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseSetCreate {
    pub workout_exercise_id: i64,
    pub reps: u32,
    pub weight_kg: f64,
    pub rest_time_before_set: u32,
    pub is_warmup: bool,
    pub reps_in_reserve: u32,
}

/// Data for updating a set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExerciseSetUpdate {
    pub reps: Option<u32>,
    pub weight_kg: Option<f64>,
    pub rest_time_before_set: Option<u32>,
    pub is_warmup: Option<bool>,
    pub reps_in_reserve: Option<u32>,
}

impl ExerciseSet {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            workout_exercise_id: row.get("workout_exercise_id")?,
            set_number: row.get("set_number")?,
            reps: row.get("reps")?,
            weight_kg: row.get("weight_kg")?,
            rest_time_before_set: row.get("rest_time_before_set")?,
            is_warmup: row.get::<_, i32>("is_warmup")? != 0,
            reps_in_reserve: row.get("reps_in_reserve")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn workout_id_for(conn: &Connection, workout_exercise_id: i64) -> DbResult<i64> {
        let result = conn.query_row(
            "SELECT workout_id FROM workout_exercises WHERE id = ?1",
            [workout_exercise_id],
            |row| row.get(0),
        );

        match result {
            Ok(workout_id) => Ok(workout_id),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(DbError::NotFound {
                entity: "workout exercise",
                id: workout_exercise_id,
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Log a new set and re-estimate the workout
    pub fn create(conn: &Connection, data: &ExerciseSetCreate, config: &EnergyConfig) -> DbResult<Self> {
        let workout_id = Self::workout_id_for(conn, data.workout_exercise_id)?;

        let next_number: i32 = conn.query_row(
            "SELECT COALESCE(MAX(set_number), 0) + 1 FROM exercise_sets WHERE workout_exercise_id = ?1",
            [data.workout_exercise_id],
            |row| row.get(0),
        )?;

        conn.execute(
            r#"
            INSERT INTO exercise_sets
            (workout_exercise_id, set_number, reps, weight_kg, rest_time_before_set, is_warmup, reps_in_reserve)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.workout_exercise_id,
                next_number,
                data.reps,
                data.weight_kg,
                data.rest_time_before_set,
                data.is_warmup as i32,
                data.reps_in_reserve,
            ],
        )?;

        let id = conn.last_insert_rowid();
        WorkoutExercise::refresh_one_rep_max(conn, data.workout_exercise_id)?;
        Workout::recalculate_calories(conn, workout_id, config)?;

        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "exercise set", id })
    }

    /// Get a set by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM exercise_sets WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(set) => Ok(Some(set)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List sets for a workout exercise
    pub fn list_for_workout_exercise(conn: &Connection, workout_exercise_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM exercise_sets WHERE workout_exercise_id = ?1 ORDER BY set_number"
        )?;
        let sets = stmt
            .query_map([workout_exercise_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(sets)
    }

    /// Update a set and re-estimate the workout
    pub fn update(
        conn: &Connection,
        id: i64,
        data: &ExerciseSetUpdate,
        config: &EnergyConfig,
    ) -> DbResult<Option<Self>> {
        let current = match Self::get_by_id(conn, id)? {
            Some(s) => s,
            None => return Ok(None),
        };

        conn.execute(
            r#"
            UPDATE exercise_sets
            SET reps = ?1,
                weight_kg = ?2,
                rest_time_before_set = ?3,
                is_warmup = ?4,
                reps_in_reserve = ?5,
                updated_at = datetime('now')
            WHERE id = ?6
            "#,
            params![
                data.reps.unwrap_or(current.reps),
                data.weight_kg.unwrap_or(current.weight_kg),
                data.rest_time_before_set.unwrap_or(current.rest_time_before_set),
                data.is_warmup.unwrap_or(current.is_warmup) as i32,
                data.reps_in_reserve.unwrap_or(current.reps_in_reserve),
                id,
            ],
        )?;

        let workout_id = Self::workout_id_for(conn, current.workout_exercise_id)?;
        WorkoutExercise::refresh_one_rep_max(conn, current.workout_exercise_id)?;
        Workout::recalculate_calories(conn, workout_id, config)?;

        Self::get_by_id(conn, id)
    }

    /// Delete a set and re-estimate the workout
    pub fn delete(conn: &Connection, id: i64, config: &EnergyConfig) -> DbResult<bool> {
        let workout_exercise_id = match Self::get_by_id(conn, id)? {
            Some(s) => s.workout_exercise_id,
            None => return Ok(false),
        };

        let rows = conn.execute("DELETE FROM exercise_sets WHERE id = ?1", [id])?;

        let workout_id = Self::workout_id_for(conn, workout_exercise_id)?;
        WorkoutExercise::refresh_one_rep_max(conn, workout_exercise_id)?;
        Workout::recalculate_calories(conn, workout_id, config)?;

        Ok(rows > 0)
    }
}
