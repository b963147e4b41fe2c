//! Workout template MCP Tools
//!
//! Tools for saving exercise lists as templates and starting workouts from
//! them.

use serde::Serialize;

use crate::db::Database;
use crate::metrics::EnergyConfig;
use crate::models::{
    Exercise, TemplateExercise, TemplateExerciseDetail, TemplateStart, User, Workout,
    WorkoutTemplate, WorkoutTemplateCreate,
};

use super::workouts::{parse_intensity, DeleteResponse};

/// Template with its exercises
#[derive(Debug, Serialize)]
pub struct TemplateDetail {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub notes: Option<String>,
    pub exercises: Vec<TemplateExerciseDetail>,
    pub created_at: String,
    pub updated_at: String,
}

fn load_detail(conn: &rusqlite::Connection, template: WorkoutTemplate) -> Result<TemplateDetail, String> {
    let exercises = TemplateExercise::get_details_for_template(conn, template.id)
        .map_err(|e| format!("Failed to get template exercises: {}", e))?;

    Ok(TemplateDetail {
        id: template.id,
        user_id: template.user_id,
        title: template.title,
        notes: template.notes,
        exercises,
        created_at: template.created_at,
        updated_at: template.updated_at,
    })
}

fn require_exercise(conn: &rusqlite::Connection, exercise_id: i64) -> Result<(), String> {
    match Exercise::get_by_id(conn, exercise_id).map_err(|e| format!("Database error: {}", e))? {
        Some(_) => Ok(()),
        None => Err(format!("Exercise not found: {}", exercise_id)),
    }
}

/// Save a template from an ordered list of catalog exercises
pub fn create_workout_template(
    db: &Database,
    user_id: i64,
    title: &str,
    notes: Option<&str>,
    exercise_ids: &[i64],
) -> Result<TemplateDetail, String> {
    if title.trim().is_empty() {
        return Err("Template title cannot be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if User::get_by_id(&conn, user_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!("User not found: {}", user_id));
    }
    // Check everything up front so a bad id doesn't leave a partial template
    for &exercise_id in exercise_ids {
        require_exercise(&conn, exercise_id)?;
    }

    let template = WorkoutTemplate::create(&conn, &WorkoutTemplateCreate {
        user_id,
        title: title.to_string(),
        notes: notes.map(String::from),
    })
    .map_err(|e| format!("Failed to create template: {}", e))?;

    for &exercise_id in exercise_ids {
        TemplateExercise::create(&conn, template.id, exercise_id)
            .map_err(|e| format!("Failed to add exercise to template: {}", e))?;
    }

    load_detail(&conn, template)
}

/// Get a template with its exercises
pub fn get_workout_template(db: &Database, id: i64) -> Result<Option<TemplateDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    match WorkoutTemplate::get_by_id(&conn, id).map_err(|e| format!("Failed to get template: {}", e))? {
        Some(template) => load_detail(&conn, template).map(Some),
        None => Ok(None),
    }
}

/// List a user's templates
pub fn list_workout_templates(db: &Database, user_id: i64) -> Result<Vec<WorkoutTemplate>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    WorkoutTemplate::list_for_user(&conn, user_id).map_err(|e| format!("Failed to list templates: {}", e))
}

/// Append an exercise to a template
pub fn add_template_exercise(db: &Database, template_id: i64, exercise_id: i64) -> Result<TemplateExercise, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if WorkoutTemplate::get_by_id(&conn, template_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!("Workout template not found: {}", template_id));
    }
    require_exercise(&conn, exercise_id)?;

    TemplateExercise::create(&conn, template_id, exercise_id)
        .map_err(|e| format!("Failed to add exercise to template: {}", e))
}

/// Remove an exercise from a template
pub fn remove_template_exercise(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let success = TemplateExercise::delete(&conn, id)
        .map_err(|e| format!("Failed to remove template exercise: {}", e))?;

    Ok(DeleteResponse { success, deleted_id: id })
}

/// Delete a template (workouts started from it are kept)
pub fn delete_workout_template(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let success = WorkoutTemplate::delete(&conn, id)
        .map_err(|e| format!("Failed to delete template: {}", e))?;

    Ok(DeleteResponse { success, deleted_id: id })
}

/// Start a workout from a template
///
/// Returns None when the template doesn't exist.
pub fn start_workout_from_template(
    db: &Database,
    config: &EnergyConfig,
    template_id: i64,
    title: Option<&str>,
    datetime: Option<&str>,
    duration_seconds: u32,
    intensity: Option<&str>,
) -> Result<Option<Workout>, String> {
    let intensity = parse_intensity(intensity)?.unwrap_or_default();

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if WorkoutTemplate::get_by_id(&conn, template_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Ok(None);
    }

    let data = TemplateStart {
        title: title.map(String::from),
        datetime: datetime.map(String::from),
        duration_seconds,
        intensity,
    };

    WorkoutTemplate::start_workout(&conn, template_id, &data, config)
        .map(Some)
        .map_err(|e| format!("Failed to start workout from template: {}", e))
}
