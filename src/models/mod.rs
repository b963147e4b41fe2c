//! Data models
//!
//! Rust structs representing database entities.

mod body_measurement;
mod exercise;
mod template;
mod user;
mod workout;

pub use body_measurement::{
    resolve_gender, BodyMeasurement, BodyMeasurementCreate, BodyMeasurementUpdate,
};
pub use exercise::{Exercise, ExerciseCreate};
pub use template::{
    TemplateExercise, TemplateExerciseDetail, TemplateStart, WorkoutTemplate,
    WorkoutTemplateCreate,
};
pub use user::{User, UserCreate, UserProfile, UserProfileUpdate};
pub use workout::{
    ExerciseSet, ExerciseSetCreate, ExerciseSetUpdate, Workout, WorkoutCreate, WorkoutExercise,
    WorkoutExerciseCreate, WorkoutUpdate,
};
