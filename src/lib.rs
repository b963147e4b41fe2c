//! Ironlog Library
//!
//! Strength workout logging with calorie and body-fat estimation.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod metrics;
pub mod models;
pub mod tools;
