//! Workout template model
//!
//! A template is an ordered list of catalog exercises. Starting a workout
//! from a template copies the exercises in order; sets are logged as usual.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::metrics::{EnergyConfig, ExerciseCategory, Intensity};
use super::{Workout, WorkoutCreate, WorkoutExercise, WorkoutExerciseCreate};

/// A reusable workout plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutTemplateCreate {
    pub user_id: i64,
    pub title: String,
    pub notes: Option<String>,
}

/// Overrides applied when a workout is started from a template
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateStart {
    /// Defaults to the template title
    pub title: Option<String>,
    pub datetime: Option<String>,
    pub duration_seconds: u32,
    pub intensity: Intensity,
}

/// A catalog exercise placed in a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateExercise {
    pub id: i64,
    pub template_id: i64,
    pub exercise_id: i64,
    pub exercise_order: i32,
    pub created_at: String,
    pub updated_at: String,
}

/// Template exercise with catalog details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateExerciseDetail {
    pub id: i64,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub category: ExerciseCategory,
    pub exercise_order: i32,
}

impl WorkoutTemplate {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            title: row.get("title")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create an empty template
    pub fn create(conn: &Connection, data: &WorkoutTemplateCreate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO workout_templates (user_id, title, notes) VALUES (?1, ?2, ?3)",
            params![data.user_id, data.title.trim(), data.notes],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "workout template", id })
    }

    /// Get a template by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM workout_templates WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(template) => Ok(Some(template)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List a user's templates by title
    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM workout_templates WHERE user_id = ?1 ORDER BY title COLLATE NOCASE, id"
        )?;
        let templates = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(templates)
    }

    /// Delete a template; workouts started from it are kept
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM workout_templates WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Create a workout holding the template's exercises, in template order
    pub fn start_workout(
        conn: &Connection,
        id: i64,
        data: &TemplateStart,
        config: &EnergyConfig,
    ) -> DbResult<Workout> {
        let template = Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "workout template", id })?;

        let workout = Workout::create(conn, &WorkoutCreate {
            user_id: template.user_id,
            title: data.title.clone().unwrap_or(template.title),
            datetime: data.datetime.clone(),
            duration_seconds: data.duration_seconds,
            intensity: data.intensity,
            notes: template.notes,
            is_rest_day: false,
        }, config)?;

        let exercises = TemplateExercise::list_for_template(conn, id)?;
        for exercise in &exercises {
            WorkoutExercise::create(conn, &WorkoutExerciseCreate {
                workout_id: workout.id,
                exercise_id: exercise.exercise_id,
            }, config)?;
        }

        tracing::debug!(template_id = id, workout_id = workout.id, exercises = exercises.len(), "Started workout from template");

        Workout::get_by_id(conn, workout.id)?.ok_or(DbError::NotFound { entity: "workout", id: workout.id })
    }
}

impl TemplateExercise {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            template_id: row.get("template_id")?,
            exercise_id: row.get("exercise_id")?,
            exercise_order: row.get("exercise_order")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Append an exercise to a template
    pub fn create(conn: &Connection, template_id: i64, exercise_id: i64) -> DbResult<Self> {
        let next_order: i32 = conn.query_row(
            "SELECT COALESCE(MAX(exercise_order), 0) + 1 FROM workout_template_exercises WHERE template_id = ?1",
            [template_id],
            |row| row.get(0),
        )?;

        conn.execute(
            "INSERT INTO workout_template_exercises (template_id, exercise_id, exercise_order) VALUES (?1, ?2, ?3)",
            params![template_id, exercise_id, next_order],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "template exercise", id })
    }

    /// Get a template exercise by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM workout_template_exercises WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(te) => Ok(Some(te)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List a template's exercises, in order
    pub fn list_for_template(conn: &Connection, template_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM workout_template_exercises WHERE template_id = ?1 ORDER BY exercise_order, id"
        )?;
        let items = stmt
            .query_map([template_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// List a template's exercises with catalog names and categories
    pub fn get_details_for_template(conn: &Connection, template_id: i64) -> DbResult<Vec<TemplateExerciseDetail>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT te.id, te.exercise_id, e.name AS exercise_name, e.category, te.exercise_order
            FROM workout_template_exercises te
            INNER JOIN exercises e ON te.exercise_id = e.id
            WHERE te.template_id = ?1
            ORDER BY te.exercise_order, te.id
            "#
        )?;

        let details = stmt
            .query_map([template_id], |row| {
                let category: String = row.get("category")?;
                Ok(TemplateExerciseDetail {
                    id: row.get("id")?,
                    exercise_id: row.get("exercise_id")?,
                    exercise_name: row.get("exercise_name")?,
                    category: ExerciseCategory::from_tag(&category),
                    exercise_order: row.get("exercise_order")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(details)
    }

    /// Remove an exercise from a template
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM workout_template_exercises WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use crate::models::{Exercise, ExerciseCreate, User, UserCreate};

    fn setup() -> (Connection, i64, i64, i64) {
        let conn = open_in_memory();
        let user = User::create(&conn, &UserCreate {
            email: "planner@example.com".to_string(),
            first_name: None,
            last_name: None,
        })
        .unwrap();

        let exercise = |name: &str, category| {
            Exercise::create(&conn, &ExerciseCreate {
                name: name.to_string(),
                description: None,
                primary_muscle: None,
                equipment_type: None,
                category,
                difficulty_level: None,
            })
            .unwrap()
            .id
        };
        let bench = exercise("Bench Press", ExerciseCategory::Compound);
        let fly = exercise("Cable Fly", ExerciseCategory::Isolation);

        (conn, user.id, bench, fly)
    }

    fn push_day(conn: &Connection, user_id: i64) -> WorkoutTemplate {
        WorkoutTemplate::create(conn, &WorkoutTemplateCreate {
            user_id,
            title: " Push day ".to_string(),
            notes: Some("Chest focus".to_string()),
        })
        .unwrap()
    }

    #[test]
    fn test_template_exercises_keep_order() {
        let (conn, user_id, bench, fly) = setup();
        let template = push_day(&conn, user_id);
        assert_eq!(template.title, "Push day");

        let first = TemplateExercise::create(&conn, template.id, fly).unwrap();
        let second = TemplateExercise::create(&conn, template.id, bench).unwrap();
        assert_eq!((first.exercise_order, second.exercise_order), (1, 2));

        let details = TemplateExercise::get_details_for_template(&conn, template.id).unwrap();
        let names: Vec<_> = details.iter().map(|d| d.exercise_name.as_str()).collect();
        assert_eq!(names, vec!["Cable Fly", "Bench Press"]);
        assert_eq!(details[1].category, ExerciseCategory::Compound);

        assert!(TemplateExercise::delete(&conn, first.id).unwrap());
        assert_eq!(TemplateExercise::list_for_template(&conn, template.id).unwrap().len(), 1);
    }

    #[test]
    fn test_start_workout_copies_exercises() {
        let (conn, user_id, bench, fly) = setup();
        let config = EnergyConfig::default();
        let template = push_day(&conn, user_id);
        TemplateExercise::create(&conn, template.id, bench).unwrap();
        TemplateExercise::create(&conn, template.id, fly).unwrap();

        let workout = WorkoutTemplate::start_workout(&conn, template.id, &TemplateStart {
            duration_seconds: 2700,
            intensity: Intensity::High,
            ..Default::default()
        }, &config)
        .unwrap();

        assert_eq!(workout.user_id, user_id);
        assert_eq!(workout.title, "Push day");
        assert_eq!(workout.notes.as_deref(), Some("Chest focus"));
        assert_eq!(workout.intensity, Intensity::High);
        // Exercises without sets carry no working volume yet
        assert_eq!(workout.calories_burned, Some(0.0));

        let exercises = WorkoutExercise::list_for_workout(&conn, workout.id).unwrap();
        let ids: Vec<_> = exercises.iter().map(|we| we.exercise_id).collect();
        assert_eq!(ids, vec![bench, fly]);

        // Deleting the template leaves the workout alone
        assert!(WorkoutTemplate::delete(&conn, template.id).unwrap());
        assert!(Workout::get_by_id(&conn, workout.id).unwrap().is_some());
        assert!(TemplateExercise::list_for_template(&conn, template.id).unwrap().is_empty());
    }

    #[test]
    fn test_start_missing_template() {
        let (conn, _, _, _) = setup();
        let result = WorkoutTemplate::start_workout(&conn, 404, &TemplateStart::default(), &EnergyConfig::default());
        assert!(matches!(result, Err(DbError::NotFound { entity: "workout template", id: 404 })));
    }

    #[test]
    fn test_list_for_user() {
        let (conn, user_id, _, _) = setup();
        push_day(&conn, user_id);
        WorkoutTemplate::create(&conn, &WorkoutTemplateCreate {
            user_id,
            title: "Legs".to_string(),
            notes: None,
        })
        .unwrap();

        let titles: Vec<_> = WorkoutTemplate::list_for_user(&conn, user_id)
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["Legs", "Push day"]);
        assert!(WorkoutTemplate::list_for_user(&conn, user_id + 1).unwrap().is_empty());
    }
}
