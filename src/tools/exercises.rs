//! Exercise catalog MCP Tools

use crate::db::Database;
use crate::metrics::ExerciseCategory;
use crate::models::{Exercise, ExerciseCreate};

/// Add an exercise to the catalog
pub fn add_exercise(
    db: &Database,
    name: &str,
    category: &str,
    description: Option<&str>,
    primary_muscle: Option<&str>,
    equipment_type: Option<&str>,
    difficulty_level: Option<&str>,
) -> Result<Exercise, String> {
    let category = ExerciseCategory::from_str(category).ok_or_else(|| {
        format!("Invalid category: '{}'. Valid categories: compound, isolation", category)
    })?;

    if name.trim().is_empty() {
        return Err("Exercise name must not be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if let Some(existing) = Exercise::get_by_name(&conn, name)
        .map_err(|e| format!("Database error: {}", e))?
    {
        return Err(format!("Exercise '{}' already exists with id {}", existing.name, existing.id));
    }

    Exercise::create(&conn, &ExerciseCreate {
        name: name.to_string(),
        description: description.map(String::from),
        primary_muscle: primary_muscle.map(String::from),
        equipment_type: equipment_type.map(String::from),
        category,
        difficulty_level: difficulty_level.map(String::from),
    })
    .map_err(|e| format!("Failed to create exercise: {}", e))
}

/// Get a catalog exercise by ID
pub fn get_exercise(db: &Database, id: i64) -> Result<Option<Exercise>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Exercise::get_by_id(&conn, id).map_err(|e| format!("Failed to get exercise: {}", e))
}
