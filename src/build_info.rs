//! Build metadata and the startup report
//!
//! build.rs stamps a build number and timestamp into the binary. The startup
//! report pairs them with the settings the estimators will run under.

use serde::Serialize;

use crate::config::AppConfig;

/// Package version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build stamp for status output
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self::from_stamp(option_env!("IRONLOG_BUILD_NUMBER"), option_env!("IRONLOG_BUILD_TIMESTAMP"))
    }

    fn from_stamp(build_number: Option<&str>, build_timestamp: Option<&'static str>) -> Self {
        Self {
            version: VERSION,
            build_number: build_number.and_then(|n| n.trim().parse().ok()).unwrap_or(0),
            build_timestamp: build_timestamp.unwrap_or("unknown"),
        }
    }
}

/// Lines printed to stderr when a binary starts
pub fn startup_report(info: &BuildInfo, config: &AppConfig) -> Vec<String> {
    let energy = &config.energy;
    vec![
        "===============================================".to_string(),
        "  Ironlog Strength Tracker".to_string(),
        format!("  Version: {} | Build: {}", info.version, info.build_number),
        format!("  Compiled: {}", info.build_timestamp),
        format!("  Database: {}", config.database_path.display()),
        format!(
            "  Energy: default {} kg, logged >= {} h, {} s/set",
            energy.default_body_weight_kg, energy.min_logged_duration_hours, energy.seconds_per_set
        ),
        "===============================================".to_string(),
    ]
}

/// Print the startup report and log the estimator settings
pub fn print_startup_banner(config: &AppConfig) {
    for line in startup_report(&BuildInfo::current(), config) {
        eprintln!("{}", line);
    }

    tracing::info!(
        default_body_weight_kg = config.energy.default_body_weight_kg,
        min_logged_duration_hours = config.energy.min_logged_duration_hours,
        seconds_per_set = config.energy.seconds_per_set,
        "Energy estimator configured"
    );
}
