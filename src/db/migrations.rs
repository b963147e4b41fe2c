//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 2;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    // Create migrations table if it doesn't exist
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    if current_version < 2 {
        migrate_v2(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (2)", [])?;
        tracing::info!("Applied schema migration v2");
    }

    Ok(())
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USERS
        -- Identity only; authentication lives elsewhere
        -- ============================================
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            first_name TEXT NOT NULL DEFAULT '',
            last_name TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- USER PROFILES
        -- One row per user, created with the user
        -- ============================================
        CREATE TABLE user_profiles (
            user_id INTEGER PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE,
            gender TEXT CHECK(gender IN ('male', 'female')),
            body_weight_kg REAL,                 -- used for calorie estimates
            height_cm REAL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- EXERCISES
        -- Catalog of exercise templates
        -- ============================================
        CREATE TABLE exercises (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            primary_muscle TEXT,
            equipment_type TEXT,
            category TEXT NOT NULL CHECK(category IN ('compound', 'isolation')),
            difficulty_level TEXT,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_exercises_category ON exercises(category);

        -- ============================================
        -- WORKOUTS
        -- ============================================
        CREATE TABLE workouts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            datetime TEXT NOT NULL,              -- when the workout happened
            duration_seconds INTEGER NOT NULL DEFAULT 0 CHECK(duration_seconds >= 0),
            intensity TEXT NOT NULL DEFAULT 'medium' CHECK(intensity IN ('low', 'medium', 'high')),
            notes TEXT,
            is_done INTEGER NOT NULL DEFAULT 0,
            is_rest_day INTEGER NOT NULL DEFAULT 0,

            -- Estimated on every change to the workout or its sets
            calories_burned REAL,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_workouts_user ON workouts(user_id);
        CREATE INDEX idx_workouts_datetime ON workouts(datetime);

        -- ============================================
        -- WORKOUT EXERCISES
        -- Junction table: which catalog exercises in which workouts
        -- ============================================
        CREATE TABLE workout_exercises (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            workout_id INTEGER NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
            exercise_id INTEGER NOT NULL REFERENCES exercises(id) ON DELETE RESTRICT,
            exercise_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_workout_exercises_workout ON workout_exercises(workout_id);

        -- ============================================
        -- EXERCISE SETS
        -- ============================================
        CREATE TABLE exercise_sets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            workout_exercise_id INTEGER NOT NULL REFERENCES workout_exercises(id) ON DELETE CASCADE,
            set_number INTEGER NOT NULL,
            reps INTEGER NOT NULL DEFAULT 0 CHECK(reps >= 0),
            weight_kg REAL NOT NULL DEFAULT 0,
            rest_time_before_set INTEGER NOT NULL DEFAULT 0 CHECK(rest_time_before_set >= 0),
            is_warmup INTEGER NOT NULL DEFAULT 0,
            reps_in_reserve INTEGER NOT NULL DEFAULT 0 CHECK(reps_in_reserve >= 0),
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_exercise_sets_workout_exercise ON exercise_sets(workout_exercise_id);

        -- ============================================
        -- BODY MEASUREMENTS
        -- Circumferences in cm, weight in kg
        -- ============================================
        CREATE TABLE body_measurements (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            height_cm REAL NOT NULL,
            weight_kg REAL NOT NULL,
            waist_cm REAL NOT NULL,
            neck_cm REAL NOT NULL,
            hips_cm REAL,                        -- required for women
            gender TEXT NOT NULL CHECK(gender IN ('male', 'female')),
            body_fat_percentage REAL,            -- US Navy estimate, null when unavailable
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_body_measurements_user ON body_measurements(user_id);
        "#,
    )?;

    Ok(())
}

/// Migration v2: estimated 1RM per workout exercise, workout templates
fn migrate_v2(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        ALTER TABLE workout_exercises ADD COLUMN one_rep_max REAL;  -- best working-set estimate

        -- ============================================
        -- WORKOUT TEMPLATES
        -- Reusable exercise lists a workout can be started from
        -- ============================================
        CREATE TABLE workout_templates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_workout_templates_user ON workout_templates(user_id);

        CREATE TABLE workout_template_exercises (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            template_id INTEGER NOT NULL REFERENCES workout_templates(id) ON DELETE CASCADE,
            exercise_id INTEGER NOT NULL REFERENCES exercises(id) ON DELETE RESTRICT,
            exercise_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_workout_template_exercises_template ON workout_template_exercises(template_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_migration(&conn).unwrap());

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_v1_database_upgrades_to_v2() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
        )
        .unwrap();
        migrate_v1(&conn).unwrap();
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", []).unwrap();
        assert!(needs_migration(&conn).unwrap());

        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), 2);
        conn.prepare("SELECT one_rep_max FROM workout_exercises").unwrap();
        conn.prepare("SELECT template_id, exercise_order FROM workout_template_exercises").unwrap();
    }
}
