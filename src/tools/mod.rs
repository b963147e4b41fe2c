//! Ironlog Tools module
//!
//! MCP tool implementations for workout and body measurement tracking.

pub mod estimates;
pub mod exercises;
pub mod measurements;
pub mod status;
pub mod templates;
pub mod users;
pub mod workouts;
