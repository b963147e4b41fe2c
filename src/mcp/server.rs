//! Ironlog MCP Server Implementation
//!
//! Implements the MCP server with all ironlog tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::metrics::{EnergyConfig, ExerciseCategory, ExerciseEntry, Gender, Intensity, SetRecord};
use crate::models::{BodyMeasurementUpdate, ExerciseSetUpdate, WorkoutUpdate};
use crate::tools::estimates;
use crate::tools::exercises;
use crate::tools::measurements;
use crate::tools::status::StatusTracker;
use crate::tools::templates;
use crate::tools::users;
use crate::tools::workouts;

/// Ironlog MCP Service
#[derive(Clone)]
pub struct IronlogService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    config: EnergyConfig,
    tool_router: ToolRouter<IronlogService>,
}

impl IronlogService {
    pub fn new(database_path: PathBuf, database: Database, config: EnergyConfig) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path, config))),
            database,
            config,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(entity: &str, id: i64) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(format!(
        r#"{{"error": "{} not found", "id": {}}}"#,
        entity, id
    ))]))
}

fn parse_enum<T>(value: Option<String>, parse: fn(&str) -> Option<T>, field: &str) -> Result<Option<T>, McpError> {
    match value {
        Some(s) => parse(&s)
            .map(Some)
            .ok_or_else(|| McpError::invalid_params(format!("Invalid {}: '{}'", field, s), None)),
        None => Ok(None),
    }
}

// ============================================================================
// User Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateUserParams {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetUserParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateUserProfileParams {
    pub user_id: i64,
    /// "male" or "female"
    pub gender: Option<String>,
    pub body_weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
}

// ============================================================================
// Exercise Catalog Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddExerciseParams {
    pub name: String,
    /// "compound" or "isolation"
    pub category: String,
    pub description: Option<String>,
    pub primary_muscle: Option<String>,
    pub equipment_type: Option<String>,
    pub difficulty_level: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetExerciseParams {
    pub id: i64,
}

// ============================================================================
// Workout Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateWorkoutParams {
    pub user_id: i64,
    pub title: String,
    /// ISO 8601 timestamp, defaults to now
    pub datetime: Option<String>,
    #[serde(default)]
    pub duration_seconds: u32,
    /// "low", "medium" or "high"; medium lets the classifier decide
    pub intensity: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub is_rest_day: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetWorkoutParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateWorkoutParams {
    pub id: i64,
    pub title: Option<String>,
    pub datetime: Option<String>,
    pub duration_seconds: Option<u32>,
    pub intensity: Option<String>,
    pub notes: Option<String>,
    pub is_done: Option<bool>,
    pub is_rest_day: Option<bool>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteWorkoutParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddWorkoutExerciseParams {
    pub workout_id: i64,
    pub exercise_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveWorkoutExerciseParams {
    /// Workout exercise ID (not the catalog exercise ID)
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddExerciseSetParams {
    pub workout_exercise_id: i64,
    pub reps: u32,
    #[serde(default)]
    pub weight_kg: f64,
    /// Rest taken before this set, in seconds
    #[serde(default)]
    pub rest_time_before_set: u32,
    #[serde(default)]
    pub is_warmup: bool,
    #[serde(default)]
    pub reps_in_reserve: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateExerciseSetParams {
    pub id: i64,
    pub reps: Option<u32>,
    pub weight_kg: Option<f64>,
    pub rest_time_before_set: Option<u32>,
    pub is_warmup: Option<bool>,
    pub reps_in_reserve: Option<u32>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteExerciseSetParams {
    pub id: i64,
}

// ============================================================================
// Body Measurement Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogBodyMeasurementParams {
    pub user_id: i64,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub waist_cm: f64,
    pub neck_cm: f64,
    /// Required for women
    pub hips_cm: Option<f64>,
    /// Defaults to the profile gender, then male
    pub gender: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetBodyMeasurementParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListBodyMeasurementsParams {
    pub user_id: i64,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateBodyMeasurementParams {
    pub id: i64,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub waist_cm: Option<f64>,
    pub neck_cm: Option<f64>,
    pub hips_cm: Option<f64>,
    pub gender: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteBodyMeasurementParams {
    pub id: i64,
}

// ============================================================================
// Estimate Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateBodyFatParams {
    /// "male" or "female"
    pub gender: String,
    pub height_cm: f64,
    pub waist_cm: f64,
    pub neck_cm: f64,
    pub hips_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateSetParams {
    #[serde(default)]
    pub weight_kg: f64,
    pub reps: u32,
    #[serde(default)]
    pub rest_seconds: u32,
    #[serde(default)]
    pub is_warmup: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateExerciseParams {
    /// "compound" or "isolation"; anything else counts as isolation
    pub category: String,
    pub sets: Vec<EstimateSetParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateWorkoutEnergyParams {
    pub exercises: Vec<EstimateExerciseParams>,
    pub intensity: Option<String>,
    pub body_weight_kg: Option<f64>,
    pub duration_seconds: Option<u32>,
}

impl EstimateExerciseParams {
    fn into_entry(self) -> ExerciseEntry {
        ExerciseEntry {
            category: ExerciseCategory::from_tag(&self.category),
            sets: self
                .sets
                .into_iter()
                .map(|s| SetRecord {
                    is_warmup: s.is_warmup,
                    weight_kg: s.weight_kg,
                    reps: s.reps,
                    rest_seconds: s.rest_seconds,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RecalculateWorkoutCaloriesParams {
    pub id: i64,
}

// ============================================================================
// Template Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateWorkoutTemplateParams {
    pub user_id: i64,
    pub title: String,
    pub notes: Option<String>,
    /// Catalog exercise IDs, in the order they should be performed
    #[serde(default)]
    pub exercise_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetWorkoutTemplateParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListWorkoutTemplatesParams {
    pub user_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddTemplateExerciseParams {
    pub template_id: i64,
    pub exercise_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RemoveTemplateExerciseParams {
    /// Template exercise ID (not the catalog exercise ID)
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteWorkoutTemplateParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StartWorkoutFromTemplateParams {
    pub template_id: i64,
    /// Defaults to the template title
    pub title: Option<String>,
    /// ISO 8601 timestamp, defaults to now
    pub datetime: Option<String>,
    #[serde(default)]
    pub duration_seconds: u32,
    /// "low", "medium" or "high"; medium lets the classifier decide
    pub intensity: Option<String>,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl IronlogService {
    // --- Status ---

    #[tool(description = "Get the current status of the ironlog service including build info, database status, estimator settings, and process information")]
    async fn ironlog_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get step-by-step instructions for logging workouts and body measurements. Call this when starting a logging session or when unsure how calories are estimated.")]
    fn workout_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::WORKOUT_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(WORKOUT_INSTRUCTIONS)]))
    }

    // --- Users ---

    #[tool(description = "Register a user. An empty profile is created alongside.")]
    fn create_user(&self, Parameters(p): Parameters<CreateUserParams>) -> Result<CallToolResult, McpError> {
        let result = users::create_user(&self.database, &p.email, p.first_name.as_deref(), p.last_name.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a user with profile")]
    fn get_user(&self, Parameters(p): Parameters<GetUserParams>) -> Result<CallToolResult, McpError> {
        match users::get_user(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))? {
            Some(user) => to_json(&user),
            None => not_found("User", p.id),
        }
    }

    #[tool(description = "Update profile gender, body weight (kg) or height (cm). A new body weight re-estimates the calories of all the user's workouts.")]
    fn update_user_profile(&self, Parameters(p): Parameters<UpdateUserProfileParams>) -> Result<CallToolResult, McpError> {
        let result = users::update_user_profile(
            &self.database,
            &self.config,
            p.user_id,
            p.gender.as_deref(),
            p.body_weight_kg,
            p.height_cm,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(response) => to_json(&response),
            None => not_found("User profile", p.user_id),
        }
    }

    // --- Exercise Catalog ---

    #[tool(description = "Add an exercise to the catalog. Category must be compound or isolation.")]
    fn add_exercise(&self, Parameters(p): Parameters<AddExerciseParams>) -> Result<CallToolResult, McpError> {
        let result = exercises::add_exercise(
            &self.database,
            &p.name,
            &p.category,
            p.description.as_deref(),
            p.primary_muscle.as_deref(),
            p.equipment_type.as_deref(),
            p.difficulty_level.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a catalog exercise by ID")]
    fn get_exercise(&self, Parameters(p): Parameters<GetExerciseParams>) -> Result<CallToolResult, McpError> {
        match exercises::get_exercise(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))? {
            Some(exercise) => to_json(&exercise),
            None => not_found("Exercise", p.id),
        }
    }

    // --- Workouts ---

    #[tool(description = "Create a workout session. Intensity: low, medium (automatic), or high.")]
    fn create_workout(&self, Parameters(p): Parameters<CreateWorkoutParams>) -> Result<CallToolResult, McpError> {
        let result = workouts::create_workout(
            &self.database,
            &self.config,
            p.user_id,
            &p.title,
            p.datetime.as_deref(),
            p.duration_seconds,
            p.intensity.as_deref(),
            p.notes.as_deref(),
            p.is_rest_day,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a workout with its exercises, sets, summary, and calorie breakdown")]
    fn get_workout(&self, Parameters(p): Parameters<GetWorkoutParams>) -> Result<CallToolResult, McpError> {
        match workouts::get_workout(&self.database, &self.config, p.id).map_err(|e| McpError::internal_error(e, None))? {
            Some(detail) => to_json(&detail),
            None => not_found("Workout", p.id),
        }
    }

    #[tool(description = "Update a workout. Calories are re-estimated.")]
    fn update_workout(&self, Parameters(p): Parameters<UpdateWorkoutParams>) -> Result<CallToolResult, McpError> {
        let data = WorkoutUpdate {
            title: p.title,
            datetime: p.datetime,
            duration_seconds: p.duration_seconds,
            intensity: parse_enum(p.intensity, Intensity::from_str, "intensity")?,
            notes: p.notes,
            is_done: p.is_done,
            is_rest_day: p.is_rest_day,
        };
        match workouts::update_workout(&self.database, &self.config, p.id, data).map_err(|e| McpError::internal_error(e, None))? {
            Some(workout) => to_json(&workout),
            None => not_found("Workout", p.id),
        }
    }

    #[tool(description = "Delete a workout with all its exercises and sets")]
    fn delete_workout(&self, Parameters(p): Parameters<DeleteWorkoutParams>) -> Result<CallToolResult, McpError> {
        let result = workouts::delete_workout(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Re-estimate a workout's calories from its current sets and the user's body weight")]
    fn recalculate_workout_calories(&self, Parameters(p): Parameters<RecalculateWorkoutCaloriesParams>) -> Result<CallToolResult, McpError> {
        let result = workouts::recalculate_workout_calories(&self.database, &self.config, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Add a catalog exercise to a workout. Order is assigned automatically.")]
    fn add_workout_exercise(&self, Parameters(p): Parameters<AddWorkoutExerciseParams>) -> Result<CallToolResult, McpError> {
        let result = workouts::add_workout_exercise(&self.database, &self.config, p.workout_id, p.exercise_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Remove an exercise (and its sets) from a workout")]
    fn remove_workout_exercise(&self, Parameters(p): Parameters<RemoveWorkoutExerciseParams>) -> Result<CallToolResult, McpError> {
        let result = workouts::remove_workout_exercise(&self.database, &self.config, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Templates ---

    #[tool(description = "Save a workout template: an ordered list of catalog exercises")]
    fn create_workout_template(&self, Parameters(p): Parameters<CreateWorkoutTemplateParams>) -> Result<CallToolResult, McpError> {
        let result = templates::create_workout_template(
            &self.database,
            p.user_id,
            &p.title,
            p.notes.as_deref(),
            &p.exercise_ids,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a workout template with its exercises")]
    fn get_workout_template(&self, Parameters(p): Parameters<GetWorkoutTemplateParams>) -> Result<CallToolResult, McpError> {
        match templates::get_workout_template(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))? {
            Some(detail) => to_json(&detail),
            None => not_found("Workout template", p.id),
        }
    }

    #[tool(description = "List a user's workout templates")]
    fn list_workout_templates(&self, Parameters(p): Parameters<ListWorkoutTemplatesParams>) -> Result<CallToolResult, McpError> {
        let result = templates::list_workout_templates(&self.database, p.user_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Append a catalog exercise to a workout template")]
    fn add_template_exercise(&self, Parameters(p): Parameters<AddTemplateExerciseParams>) -> Result<CallToolResult, McpError> {
        let result = templates::add_template_exercise(&self.database, p.template_id, p.exercise_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Remove an exercise from a workout template")]
    fn remove_template_exercise(&self, Parameters(p): Parameters<RemoveTemplateExerciseParams>) -> Result<CallToolResult, McpError> {
        let result = templates::remove_template_exercise(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Delete a workout template. Workouts already started from it are kept.")]
    fn delete_workout_template(&self, Parameters(p): Parameters<DeleteWorkoutTemplateParams>) -> Result<CallToolResult, McpError> {
        let result = templates::delete_workout_template(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Start a workout from a template. The template's exercises are added in order; log sets as usual.")]
    fn start_workout_from_template(&self, Parameters(p): Parameters<StartWorkoutFromTemplateParams>) -> Result<CallToolResult, McpError> {
        let result = templates::start_workout_from_template(
            &self.database,
            &self.config,
            p.template_id,
            p.title.as_deref(),
            p.datetime.as_deref(),
            p.duration_seconds,
            p.intensity.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(workout) => to_json(&workout),
            None => not_found("Workout template", p.template_id),
        }
    }

    // --- Sets ---

    #[tool(description = "Log a set for a workout exercise. Returns the set and the workout's updated calories.")]
    fn add_exercise_set(&self, Parameters(p): Parameters<AddExerciseSetParams>) -> Result<CallToolResult, McpError> {
        let result = workouts::add_exercise_set(
            &self.database,
            &self.config,
            p.workout_exercise_id,
            p.reps,
            p.weight_kg,
            p.rest_time_before_set,
            p.is_warmup,
            p.reps_in_reserve,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Update a set. Calories are re-estimated.")]
    fn update_exercise_set(&self, Parameters(p): Parameters<UpdateExerciseSetParams>) -> Result<CallToolResult, McpError> {
        let data = ExerciseSetUpdate {
            reps: p.reps,
            weight_kg: p.weight_kg,
            rest_time_before_set: p.rest_time_before_set,
            is_warmup: p.is_warmup,
            reps_in_reserve: p.reps_in_reserve,
        };
        match workouts::update_exercise_set(&self.database, &self.config, p.id, data).map_err(|e| McpError::internal_error(e, None))? {
            Some(result) => to_json(&result),
            None => not_found("Exercise set", p.id),
        }
    }

    #[tool(description = "Delete a set. Calories are re-estimated.")]
    fn delete_exercise_set(&self, Parameters(p): Parameters<DeleteExerciseSetParams>) -> Result<CallToolResult, McpError> {
        let result = workouts::delete_exercise_set(&self.database, &self.config, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Body Measurements ---

    #[tool(description = "Log a body measurement. A US Navy body-fat estimate is stored with it when one can be computed.")]
    fn log_body_measurement(&self, Parameters(p): Parameters<LogBodyMeasurementParams>) -> Result<CallToolResult, McpError> {
        let result = measurements::log_body_measurement(
            &self.database,
            p.user_id,
            p.height_cm,
            p.weight_kg,
            p.waist_cm,
            p.neck_cm,
            p.hips_cm,
            p.gender.as_deref(),
            p.notes.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Get a body measurement by ID")]
    fn get_body_measurement(&self, Parameters(p): Parameters<GetBodyMeasurementParams>) -> Result<CallToolResult, McpError> {
        match measurements::get_body_measurement(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))? {
            Some(m) => to_json(&m),
            None => not_found("Body measurement", p.id),
        }
    }

    #[tool(description = "List a user's most recent body measurements, newest first")]
    fn list_body_measurements(&self, Parameters(p): Parameters<ListBodyMeasurementsParams>) -> Result<CallToolResult, McpError> {
        let result = measurements::list_body_measurements(&self.database, p.user_id, p.limit)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Correct a body measurement. The body-fat estimate is recomputed.")]
    fn update_body_measurement(&self, Parameters(p): Parameters<UpdateBodyMeasurementParams>) -> Result<CallToolResult, McpError> {
        let data = BodyMeasurementUpdate {
            height_cm: p.height_cm,
            weight_kg: p.weight_kg,
            waist_cm: p.waist_cm,
            neck_cm: p.neck_cm,
            hips_cm: p.hips_cm,
            gender: parse_enum(p.gender, Gender::from_str, "gender")?,
            notes: p.notes,
        };
        match measurements::update_body_measurement(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))? {
            Some(m) => to_json(&m),
            None => not_found("Body measurement", p.id),
        }
    }

    #[tool(description = "Delete a body measurement")]
    fn delete_body_measurement(&self, Parameters(p): Parameters<DeleteBodyMeasurementParams>) -> Result<CallToolResult, McpError> {
        let result = measurements::delete_body_measurement(&self.database, p.id)
            .map_err(|e| McpError::internal_error(e, None))?;
        to_json(&result)
    }

    // --- Estimates ---

    #[tool(description = "Estimate body fat with the US Navy formula without saving anything")]
    fn estimate_body_fat(&self, Parameters(p): Parameters<EstimateBodyFatParams>) -> Result<CallToolResult, McpError> {
        let result = estimates::estimate_body_fat(&p.gender, p.height_cm, p.waist_cm, p.neck_cm, p.hips_cm, p.weight_kg)
            .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }

    #[tool(description = "Estimate calories for an ad-hoc workout without saving anything")]
    fn estimate_workout_energy(&self, Parameters(p): Parameters<EstimateWorkoutEnergyParams>) -> Result<CallToolResult, McpError> {
        let entries: Vec<ExerciseEntry> = p.exercises.into_iter().map(EstimateExerciseParams::into_entry).collect();
        let result = estimates::estimate_workout_energy(
            &self.config,
            &entries,
            p.intensity.as_deref(),
            p.body_weight_kg,
            p.duration_seconds,
        )
        .map_err(|e| McpError::invalid_params(e, None))?;
        to_json(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for IronlogService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "ironlog".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Ironlog Strength Tracker".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Ironlog - Strength workout logging with calorie and body-fat estimates. \
                 IMPORTANT: Call workout_instructions before logging. \
                 Users: create_user/get_user/update_user_profile. \
                 Catalog: add_exercise/get_exercise. \
                 Workouts: create/get/update/delete_workout, recalculate_workout_calories, \
                 add/remove_workout_exercise, add/update/delete_exercise_set. \
                 Templates: create/get/list/delete_workout_template(s), add/remove_template_exercise, \
                 start_workout_from_template. \
                 Measurements: log/get/list/update/delete_body_measurement(s). \
                 Estimates (nothing saved): estimate_body_fat, estimate_workout_energy."
                    .into(),
            ),
        }
    }
}
