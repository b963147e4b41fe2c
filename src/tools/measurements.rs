//! Body measurement MCP Tools
//!
//! Logging a measurement stores the Navy body-fat estimate with it. When no
//! estimate can be produced the response says why.

use serde::Serialize;

use crate::db::Database;
use crate::metrics::estimate_body_fat;
use crate::models::{BodyMeasurement, BodyMeasurementCreate, BodyMeasurementUpdate, User};

use super::users::parse_gender;

/// Measurement with the reason an estimate is missing, if it is
#[derive(Debug, Serialize)]
pub struct MeasurementResponse {
    pub measurement: BodyMeasurement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat_unavailable_reason: Option<String>,
}

/// Response for delete operations
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

fn respond(measurement: BodyMeasurement) -> MeasurementResponse {
    let body_fat_unavailable_reason = estimate_body_fat(&measurement.measurement())
        .err()
        .map(|e| e.to_string());

    MeasurementResponse { measurement, body_fat_unavailable_reason }
}

fn validate_lengths(values: &[(&str, Option<f64>)]) -> Result<(), String> {
    for (name, value) in values {
        if let Some(v) = value {
            if !v.is_finite() || *v <= 0.0 {
                return Err(format!("{} must be a positive number, got {}", name, v));
            }
        }
    }
    Ok(())
}

/// Log a body measurement
#[allow(clippy::too_many_arguments)]
pub fn log_body_measurement(
    db: &Database,
    user_id: i64,
    height_cm: f64,
    weight_kg: f64,
    waist_cm: f64,
    neck_cm: f64,
    hips_cm: Option<f64>,
    gender: Option<&str>,
    notes: Option<&str>,
) -> Result<MeasurementResponse, String> {
    let gender = parse_gender(gender)?;
    validate_lengths(&[
        ("height_cm", Some(height_cm)),
        ("weight_kg", Some(weight_kg)),
        ("waist_cm", Some(waist_cm)),
        ("neck_cm", Some(neck_cm)),
        ("hips_cm", hips_cm),
    ])?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if User::get_by_id(&conn, user_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!("User not found: {}", user_id));
    }

    let measurement = BodyMeasurement::create(&conn, &BodyMeasurementCreate {
        user_id,
        height_cm,
        weight_kg,
        waist_cm,
        neck_cm,
        hips_cm,
        gender,
        notes: notes.map(String::from),
    })
    .map_err(|e| format!("Failed to log measurement: {}", e))?;

    Ok(respond(measurement))
}

/// Get a measurement by ID
pub fn get_body_measurement(db: &Database, id: i64) -> Result<Option<MeasurementResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    BodyMeasurement::get_by_id(&conn, id)
        .map(|m| m.map(respond))
        .map_err(|e| format!("Failed to get measurement: {}", e))
}

/// Recent measurements for a user, newest first
pub fn list_body_measurements(db: &Database, user_id: i64, limit: Option<i64>) -> Result<Vec<BodyMeasurement>, String> {
    let limit = limit.unwrap_or(20).clamp(1, 500);
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    BodyMeasurement::list_for_user(&conn, user_id, limit)
        .map_err(|e| format!("Failed to list measurements: {}", e))
}

/// Correct a measurement; the estimate is recomputed
pub fn update_body_measurement(
    db: &Database,
    id: i64,
    data: BodyMeasurementUpdate,
) -> Result<Option<MeasurementResponse>, String> {
    validate_lengths(&[
        ("height_cm", data.height_cm),
        ("weight_kg", data.weight_kg),
        ("waist_cm", data.waist_cm),
        ("neck_cm", data.neck_cm),
        ("hips_cm", data.hips_cm),
    ])?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    BodyMeasurement::update(&conn, id, &data)
        .map(|m| m.map(respond))
        .map_err(|e| format!("Failed to update measurement: {}", e))
}

/// Delete a measurement
pub fn delete_body_measurement(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let success = BodyMeasurement::delete(&conn, id)
        .map_err(|e| format!("Failed to delete measurement: {}", e))?;

    Ok(DeleteResponse { success, deleted_id: id })
}
