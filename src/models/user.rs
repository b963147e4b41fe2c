//! User and profile models
//!
//! A user row carries identity only; the 1:1 profile carries the body data the
//! estimators fall back on (gender, body weight).

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::metrics::Gender;

/// A registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Body data attached to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i64,
    pub gender: Option<Gender>,
    pub body_weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for updating a profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfileUpdate {
    pub gender: Option<Gender>,
    pub body_weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
}

impl User {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            email: row.get("email")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a user together with an empty profile
    pub fn create(conn: &Connection, data: &UserCreate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO users (email, first_name, last_name) VALUES (?1, ?2, ?3)",
            params![
                data.email.trim().to_lowercase(),
                data.first_name.clone().unwrap_or_default(),
                data.last_name.clone().unwrap_or_default(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        conn.execute("INSERT INTO user_profiles (user_id) VALUES (?1)", [id])?;

        Self::get_by_id(conn, id)?.ok_or(DbError::NotFound { entity: "user", id })
    }

    /// Get a user by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by email (case-insensitive)
    pub fn get_by_email(conn: &Connection, email: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE email = ?1")?;

        let result = stmt.query_row([email.trim().to_lowercase()], Self::from_row);
        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl UserProfile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let gender: Option<String> = row.get("gender")?;

        Ok(Self {
            user_id: row.get("user_id")?,
            gender: gender.as_deref().and_then(Gender::from_str),
            body_weight_kg: row.get("body_weight_kg")?,
            height_cm: row.get("height_cm")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the profile for a user
    pub fn get_for_user(conn: &Connection, user_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM user_profiles WHERE user_id = ?1")?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Update profile fields that are set
    pub fn update(conn: &Connection, user_id: i64, data: &UserProfileUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(gender) = data.gender {
            updates.push(format!("gender = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(gender.as_str()));
        }
        if let Some(weight) = data.body_weight_kg {
            updates.push(format!("body_weight_kg = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(weight));
        }
        if let Some(height) = data.height_cm {
            updates.push(format!("height_cm = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(height));
        }

        if updates.is_empty() {
            return Self::get_for_user(conn, user_id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE user_profiles SET {} WHERE user_id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(user_id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_for_user(conn, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    #[test]
    fn test_create_user_with_profile() {
        let conn = open_in_memory();
        let user = User::create(&conn, &UserCreate {
            email: " Lifter@Example.com ".to_string(),
            first_name: Some("Sam".to_string()),
            last_name: None,
        })
        .unwrap();

        assert_eq!(user.email, "lifter@example.com");
        assert_eq!(user.last_name, "");

        let profile = UserProfile::get_for_user(&conn, user.id).unwrap().unwrap();
        assert_eq!(profile.gender, None);
        assert_eq!(profile.body_weight_kg, None);

        let found = User::get_by_email(&conn, "LIFTER@example.com").unwrap().unwrap();
        assert_eq!(found.id, user.id);
    }

    #[test]
    fn test_update_profile() {
        let conn = open_in_memory();
        let user = User::create(&conn, &UserCreate {
            email: "a@b.c".to_string(),
            first_name: None,
            last_name: None,
        })
        .unwrap();

        let profile = UserProfile::update(&conn, user.id, &UserProfileUpdate {
            gender: Some(Gender::Female),
            body_weight_kg: Some(61.5),
            height_cm: None,
        })
        .unwrap()
        .unwrap();

        assert_eq!(profile.gender, Some(Gender::Female));
        assert_eq!(profile.body_weight_kg, Some(61.5));
        assert_eq!(profile.height_cm, None);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let conn = open_in_memory();
        let data = UserCreate { email: "dup@example.com".to_string(), first_name: None, last_name: None };
        User::create(&conn, &data).unwrap();
        assert!(User::create(&conn, &data).is_err());
    }
}
