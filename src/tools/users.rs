//! User MCP Tools
//!
//! Tools for registering users and maintaining the profile data the
//! estimators fall back on.

use serde::Serialize;

use crate::db::Database;
use crate::metrics::{EnergyConfig, Gender};
use crate::models::{User, UserCreate, UserProfile, UserProfileUpdate, Workout};

/// User with profile
#[derive(Debug, Serialize)]
pub struct UserDetail {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub profile: Option<UserProfile>,
    pub created_at: String,
}

fn detail(user: User, profile: Option<UserProfile>) -> UserDetail {
    UserDetail {
        id: user.id,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        profile,
        created_at: user.created_at,
    }
}

/// Response from a profile update
#[derive(Debug, Serialize)]
pub struct ProfileUpdateResponse {
    pub profile: UserProfile,
    /// Workouts re-estimated because the body weight changed
    pub workouts_recalculated: usize,
}

/// Parse an optional gender string
pub(crate) fn parse_gender(gender: Option<&str>) -> Result<Option<Gender>, String> {
    match gender {
        Some(g) => Gender::from_str(g)
            .map(Some)
            .ok_or_else(|| format!("Invalid gender: '{}'. Valid values: male, female", g)),
        None => Ok(None),
    }
}

/// Register a user (creates an empty profile)
pub fn create_user(
    db: &Database,
    email: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<UserDetail, String> {
    if !email.contains('@') {
        return Err(format!("Invalid email address: '{}'", email));
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if User::get_by_email(&conn, email)
        .map_err(|e| format!("Database error: {}", e))?
        .is_some()
    {
        return Err(format!("A user with email '{}' already exists", email.trim()));
    }

    let user = User::create(&conn, &UserCreate {
        email: email.to_string(),
        first_name: first_name.map(String::from),
        last_name: last_name.map(String::from),
    })
    .map_err(|e| format!("Failed to create user: {}", e))?;

    let profile = UserProfile::get_for_user(&conn, user.id)
        .map_err(|e| format!("Failed to get profile: {}", e))?;

    Ok(detail(user, profile))
}

/// Get a user with profile
pub fn get_user(db: &Database, id: i64) -> Result<Option<UserDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let user = match User::get_by_id(&conn, id).map_err(|e| format!("Failed to get user: {}", e))? {
        Some(u) => u,
        None => return Ok(None),
    };
    let profile = UserProfile::get_for_user(&conn, id)
        .map_err(|e| format!("Failed to get profile: {}", e))?;

    Ok(Some(detail(user, profile)))
}

/// Update profile gender, body weight or height
///
/// A new body weight re-estimates the calories of all the user's workouts.
pub fn update_user_profile(
    db: &Database,
    config: &EnergyConfig,
    user_id: i64,
    gender: Option<&str>,
    body_weight_kg: Option<f64>,
    height_cm: Option<f64>,
) -> Result<Option<ProfileUpdateResponse>, String> {
    let gender = parse_gender(gender)?;
    for (name, value) in [("body_weight_kg", body_weight_kg), ("height_cm", height_cm)] {
        if let Some(v) = value {
            if !v.is_finite() || v <= 0.0 {
                return Err(format!("{} must be a positive number, got {}", name, v));
            }
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let profile = match UserProfile::update(&conn, user_id, &UserProfileUpdate { gender, body_weight_kg, height_cm })
        .map_err(|e| format!("Failed to update profile: {}", e))?
    {
        Some(p) => p,
        None => return Ok(None),
    };

    let workouts_recalculated = if body_weight_kg.is_some() {
        Workout::recalculate_for_user(&conn, user_id, config)
            .map_err(|e| format!("Failed to recalculate workouts: {}", e))?
    } else {
        0
    };

    Ok(Some(ProfileUpdateResponse { profile, workouts_recalculated }))
}
