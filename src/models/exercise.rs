//! Exercise catalog model
//!
//! Exercise templates referenced by workouts. The category tag drives the
//! compound/isolation split in workout energy estimates.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::metrics::ExerciseCategory;

/// A catalog exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub primary_muscle: Option<String>,
    pub equipment_type: Option<String>,
    pub category: ExerciseCategory,
    pub difficulty_level: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a catalog exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseCreate {
    pub name: String,
    pub description: Option<String>,
    pub primary_muscle: Option<String>,
    pub equipment_type: Option<String>,
    pub category: ExerciseCategory,
    pub difficulty_level: Option<String>,
}

impl Exercise {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let category: String = row.get("category")?;

        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            primary_muscle: row.get("primary_muscle")?,
            equipment_type: row.get("equipment_type")?,
            category: ExerciseCategory::from_tag(&category),
            difficulty_level: row.get("difficulty_level")?,
            is_active: row.get::<_, i32>("is_active")? != 0,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new catalog exercise
    pub fn create(conn: &Connection, data: &ExerciseCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO exercises (name, description, primary_muscle, equipment_type, category, difficulty_level)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                data.name.trim(),
                data.description,
                data.primary_muscle,
                data.equipment_type,
                data.category.as_str(),
                data.difficulty_level,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "exercise", id })
    }

    /// Get an exercise by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM exercises WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(exercise) => Ok(Some(exercise)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get an exercise by exact name (case-insensitive)
    pub fn get_by_name(conn: &Connection, name: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM exercises WHERE name = ?1 COLLATE NOCASE")?;

        let result = stmt.query_row([name.trim()], Self::from_row);
        match result {
            Ok(exercise) => Ok(Some(exercise)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    #[test]
    fn test_create_and_lookup() {
        let conn = open_in_memory();
        let squat = Exercise::create(&conn, &ExerciseCreate {
            name: "Back Squat".to_string(),
            description: None,
            primary_muscle: Some("quadriceps".to_string()),
            equipment_type: Some("barbell".to_string()),
            category: ExerciseCategory::Compound,
            difficulty_level: None,
        })
        .unwrap();

        assert_eq!(squat.category, ExerciseCategory::Compound);
        assert!(squat.is_active);

        let found = Exercise::get_by_name(&conn, "back squat").unwrap().unwrap();
        assert_eq!(found.id, squat.id);
        assert!(Exercise::get_by_id(&conn, squat.id + 1).unwrap().is_none());
    }
}
