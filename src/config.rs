//! Runtime configuration
//!
//! Read from environment variables once at startup.

use std::path::PathBuf;

use thiserror::Error;

use crate::metrics::EnergyConfig;

pub const DATABASE_PATH_VAR: &str = "IRONLOG_DATABASE_PATH";
pub const DEFAULT_BODY_WEIGHT_VAR: &str = "IRONLOG_DEFAULT_BODY_WEIGHT_KG";
pub const MIN_LOGGED_DURATION_VAR: &str = "IRONLOG_MIN_LOGGED_DURATION_HOURS";
pub const SECONDS_PER_SET_VAR: &str = "IRONLOG_SECONDS_PER_SET";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive number, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub energy: EnergyConfig,
}

impl AppConfig {
    /// Load from the environment, falling back to defaults for bad values
    pub fn from_env() -> Self {
        Self {
            database_path: database_path(),
            energy: energy_config_from_env_or_default(),
        }
    }
}

/// Get the database path from environment or use default
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("ironlog.db");
            path
        })
}

fn parse_positive(var: &'static str, value: &str) -> Result<f64, ConfigError> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
        _ => Err(ConfigError::InvalidNumber { var, value: value.to_string() }),
    }
}

/// Build an energy config from variable lookups
///
/// Unset variables keep their defaults; set-but-invalid values are errors.
pub fn energy_config_from<F>(lookup: F) -> Result<EnergyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = EnergyConfig::default();

    if let Some(v) = lookup(DEFAULT_BODY_WEIGHT_VAR) {
        config.default_body_weight_kg = parse_positive(DEFAULT_BODY_WEIGHT_VAR, &v)?;
    }
    if let Some(v) = lookup(MIN_LOGGED_DURATION_VAR) {
        config.min_logged_duration_hours = parse_positive(MIN_LOGGED_DURATION_VAR, &v)?;
    }
    if let Some(v) = lookup(SECONDS_PER_SET_VAR) {
        config.seconds_per_set = parse_positive(SECONDS_PER_SET_VAR, &v)?;
    }

    Ok(config)
}

/// Energy config from the process environment
pub fn energy_config_from_env() -> Result<EnergyConfig, ConfigError> {
    energy_config_from(|var| std::env::var(var).ok())
}

/// Like [`energy_config_from`], but logs the error and keeps the defaults
pub fn energy_config_or_default_from<F>(lookup: F) -> EnergyConfig
where
    F: Fn(&str) -> Option<String>,
{
    match energy_config_from(lookup) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring energy configuration: {}", e);
            EnergyConfig::default()
        }
    }
}

/// Energy config from the process environment, keeping defaults on error
pub fn energy_config_from_env_or_default() -> EnergyConfig {
    energy_config_or_default_from(|var| std::env::var(var).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = energy_config_from(lookup_from(&[])).unwrap();
        assert_eq!(config, EnergyConfig::default());
        assert_eq!(config.default_body_weight_kg, 70.0);
        assert_eq!(config.min_logged_duration_hours, 0.1);
        assert_eq!(config.seconds_per_set, 30.0);
    }

    #[test]
    fn test_overrides() {
        let config = energy_config_from(lookup_from(&[
            (DEFAULT_BODY_WEIGHT_VAR, "82.5"),
            (SECONDS_PER_SET_VAR, " 45 "),
        ]))
        .unwrap();
        assert_eq!(config.default_body_weight_kg, 82.5);
        assert_eq!(config.seconds_per_set, 45.0);
        assert_eq!(config.min_logged_duration_hours, 0.1);
    }

    #[test]
    fn test_invalid_values_rejected() {
        for bad in ["abc", "0", "-3", "NaN", "inf"] {
            let result = energy_config_from(lookup_from(&[(MIN_LOGGED_DURATION_VAR, bad)]));
            assert!(matches!(result, Err(ConfigError::InvalidNumber { .. })), "{}", bad);
        }
    }

    #[test]
    fn test_invalid_value_warns_and_keeps_defaults() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            energy_config_or_default_from(lookup_from(&[(SECONDS_PER_SET_VAR, "fast")]))
        });
        assert_eq!(config, EnergyConfig::default());

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "{}", output);
        assert!(output.contains("IRONLOG_SECONDS_PER_SET must be a positive number, got 'fast'"), "{}", output);
    }
}
