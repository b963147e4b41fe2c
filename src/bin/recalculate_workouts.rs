//! Recalculate stored workout calories
//! Usage: cargo run --bin recalculate_workouts -- [user_id]

use tracing_subscriber::EnvFilter;

use ironlog::config::AppConfig;
use ironlog::db::{migrations, Database};
use ironlog::models::Workout;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr, the per-workout report to stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ironlog=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let user_id = match std::env::args().nth(1) {
        Some(arg) => Some(arg.parse::<i64>().map_err(|_| format!("Invalid user id: {}", arg))?),
        None => None,
    };

    let config = AppConfig::from_env();
    tracing::info!(database = %config.database_path.display(), ?user_id, "Recalculating workout calories");

    let database = Database::new(&config.database_path)?;

    database.with_conn(|conn| {
        migrations::run_migrations(conn)?;

        let workouts = Workout::list(conn, user_id)?;
        tracing::info!(count = workouts.len(), "Found workouts");

        let mut changed = 0;
        for workout in &workouts {
            let old = workout.calories_burned.unwrap_or(0.0);
            let estimate = Workout::recalculate_calories(conn, workout.id, &config.energy)?;

            println!("\nWorkout {} ({}): {}", workout.id, workout.datetime, workout.title);
            println!("  Old calories: {:.2}", old);
            println!(
                "  New calories: {:.2} ({:.3} h {:?}, {:.1} kg {:?})",
                estimate.calories_burned,
                estimate.duration_hours,
                estimate.duration_source,
                estimate.body_weight_kg,
                estimate.body_weight_source,
            );
            if let Some(intensity) = estimate.intensity {
                println!("  MET: {:.1} ({:?})", intensity.met, intensity.rule);
            }

            if (estimate.calories_burned - old).abs() > f64::EPSILON {
                changed += 1;
                println!("  Difference: {:.2}", estimate.calories_burned - old);
            }
        }

        tracing::info!(changed, total = workouts.len(), "Recalculation complete");
        Ok(())
    })?;

    Ok(())
}
