//! Ironlog Status Tool
//!
//! Provides runtime status information about the ironlog service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::metrics::EnergyConfig;

/// Workout logging instructions for AI assistants
pub const WORKOUT_INSTRUCTIONS: &str = r#"
# Ironlog Workout Logging Instructions

This guide explains how to log strength workouts and body measurements with the ironlog tools.

## Overview

A workout is built from three layers:
1. **Workout** - one training session for a user (title, time, optional duration and intensity)
2. **Workout exercises** - catalog exercises added to the workout in order
3. **Sets** - reps, weight, rest before the set, and a warmup flag

Calories are re-estimated every time any of these change. You never supply calories yourself.

---

## Typical Workflow

1. `create_user` once, then `update_user_profile` with body weight (kg), height and gender
2. `add_exercise` for each movement not yet in the catalog (category: `compound` or `isolation`)
3. `create_workout` for the session
4. `add_workout_exercise` for each movement, in the order performed
5. `add_exercise_set` for every set, including warmups (`is_warmup: true`)
6. `get_workout` to review the summary and energy breakdown

For a routine session, save the exercise list once with `create_workout_template`, then
`start_workout_from_template` replaces steps 3 and 4.

Each workout exercise also carries `one_rep_max`: the best estimated 1RM over its working sets
(average of the Epley, Brzycki and Lander formulas, reps capped at 15).

---

## How Calories Are Estimated

```
Calories = MET x body_weight_kg x duration_hours
```

### MET selection

An explicit intensity overrides everything:

| Intensity | MET |
|-----------|-----|
| high | 6.0 |
| low | 3.0 |
| medium | automatic (see below) |

Automatic classification looks at working sets only (warmups are ignored) and takes the first rule that matches:

| Rule | Condition | MET |
|------|-----------|-----|
| powerlifting | max weight > 100 kg and average rest > 3 min | 5.0 |
| vigorous | compound share > 50%, max weight > 50 kg, average rest < 2 min | 6.0 |
| moderate | compound share > 30% or more than 15 sets | 3.5 |
| light | everything else | 3.0 |

### Duration

- If the workout's logged duration is at least 6 minutes it is used as-is
- Otherwise duration is inferred: 30 seconds per working set plus all logged rest

### Body weight

The profile body weight is used. Without one, 70 kg is assumed and the response says so (`body_weight_source: "default"`).
Changing the profile body weight re-estimates every stored workout of that user.

---

## Body Measurements

`log_body_measurement` stores height, weight, waist, neck and (for women) hips, all in cm/kg.
A US Navy body-fat estimate is computed and stored with the measurement.

- Men: waist must be larger than neck
- Women: hips are required
- Results outside 0-50% are discarded, never clamped

When no estimate is stored, `body_fat_unavailable_reason` explains why. Use `estimate_body_fat` to try numbers without saving them.

---

## Notes

- Timestamps default to the current time if not provided
- Deleting a workout deletes its exercises and sets (cascade)
- Exercise order and set numbers are assigned automatically (1, 2, 3, ...)
"#;

/// Runtime status of the ironlog service
#[derive(Debug, Clone, Serialize)]
pub struct IronlogStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Estimator settings in effect
    pub energy_config: EnergyConfig,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
    energy_config: EnergyConfig,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf, energy_config: EnergyConfig) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
            energy_config,
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> IronlogStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        IronlogStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            energy_config: self.energy_config,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_missing_database() {
        let tracker = StatusTracker::new(PathBuf::from("does/not/exist.db"), EnergyConfig::default());
        let status = tracker.get_status();

        assert_eq!(status.database_size_bytes, None);
        assert_eq!(status.process_id, std::process::id());
        assert_eq!(status.energy_config, EnergyConfig::default());
    }
}
