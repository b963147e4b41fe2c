//! Body measurement model
//!
//! Circumference measurements for progress tracking. The body-fat estimate is
//! computed before every insert or update and stored alongside the inputs.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::metrics::{body_fat_percentage, Gender, Measurement};
use super::UserProfile;

/// A stored body measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyMeasurement {
    pub id: i64,
    pub user_id: i64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub waist_cm: f64,
    pub neck_cm: f64,
    pub hips_cm: Option<f64>,
    pub gender: Gender,
    pub body_fat_percentage: Option<f64>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for logging a measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyMeasurementCreate {
    pub user_id: i64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub waist_cm: f64,
    pub neck_cm: f64,
    pub hips_cm: Option<f64>,
    /// Defaults to the profile gender, then male
    pub gender: Option<Gender>,
    pub notes: Option<String>,
}

/// Data for correcting a measurement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodyMeasurementUpdate {
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub waist_cm: Option<f64>,
    pub neck_cm: Option<f64>,
    pub hips_cm: Option<f64>,
    pub gender: Option<Gender>,
    pub notes: Option<String>,
}

/// Pick the gender for a measurement: explicit, then profile, then male
pub fn resolve_gender(conn: &Connection, user_id: i64, explicit: Option<Gender>) -> DbResult<Gender> {
    if let Some(gender) = explicit {
        return Ok(gender);
    }

    let profile_gender = UserProfile::get_for_user(conn, user_id)?.and_then(|p| p.gender);
    Ok(profile_gender.unwrap_or(Gender::Male))
}

impl BodyMeasurement {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let gender: String = row.get("gender")?;

        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            height_cm: row.get("height_cm")?,
            weight_kg: row.get("weight_kg")?,
            waist_cm: row.get("waist_cm")?,
            neck_cm: row.get("neck_cm")?,
            hips_cm: row.get("hips_cm")?,
            gender: Gender::from_str(&gender).unwrap_or(Gender::Male),
            body_fat_percentage: row.get("body_fat_percentage")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// The estimator input for this record
    pub fn measurement(&self) -> Measurement {
        Measurement {
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            waist_cm: self.waist_cm,
            neck_cm: self.neck_cm,
            hips_cm: self.hips_cm,
            gender: self.gender,
        }
    }

    /// Log a measurement with its body-fat estimate
    pub fn create(conn: &Connection, data: &BodyMeasurementCreate) -> DbResult<Self> {
        let gender = resolve_gender(conn, data.user_id, data.gender)?;

        let body_fat = body_fat_percentage(&Measurement {
            height_cm: data.height_cm,
            weight_kg: data.weight_kg,
            waist_cm: data.waist_cm,
            neck_cm: data.neck_cm,
            hips_cm: data.hips_cm,
            gender,
        });

        conn.execute(
            r#"
            INSERT INTO body_measurements
            (user_id, height_cm, weight_kg, waist_cm, neck_cm, hips_cm, gender, body_fat_percentage, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                data.user_id,
                data.height_cm,
                data.weight_kg,
                data.waist_cm,
                data.neck_cm,
                data.hips_cm,
                gender.as_str(),
                body_fat,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "body measurement", id })
    }

    /// Get a measurement by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM body_measurements WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(m) => Ok(Some(m)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent measurements for a user, newest first
    pub fn list_for_user(conn: &Connection, user_id: i64, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM body_measurements WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2"
        )?;
        let measurements = stmt
            .query_map(params![user_id, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(measurements)
    }

    /// Update a measurement and recompute its body-fat estimate
    pub fn update(conn: &Connection, id: i64, data: &BodyMeasurementUpdate) -> DbResult<Option<Self>> {
        let current = match Self::get_by_id(conn, id)? {
            Some(m) => m,
            None => return Ok(None),
        };

        let merged = Measurement {
            height_cm: data.height_cm.unwrap_or(current.height_cm),
            weight_kg: data.weight_kg.unwrap_or(current.weight_kg),
            waist_cm: data.waist_cm.unwrap_or(current.waist_cm),
            neck_cm: data.neck_cm.unwrap_or(current.neck_cm),
            hips_cm: data.hips_cm.or(current.hips_cm),
            gender: data.gender.unwrap_or(current.gender),
        };
        let body_fat = body_fat_percentage(&merged);

        conn.execute(
            r#"
            UPDATE body_measurements
            SET height_cm = ?1,
                weight_kg = ?2,
                waist_cm = ?3,
                neck_cm = ?4,
                hips_cm = ?5,
                gender = ?6,
                body_fat_percentage = ?7,
                notes = ?8,
                updated_at = datetime('now')
            WHERE id = ?9
            "#,
            params![
                merged.height_cm,
                merged.weight_kg,
                merged.waist_cm,
                merged.neck_cm,
                merged.hips_cm,
                merged.gender.as_str(),
                body_fat,
                data.notes.clone().or(current.notes),
                id,
            ],
        )?;

        Self::get_by_id(conn, id)
    }

    /// Delete a measurement
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM body_measurements WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
