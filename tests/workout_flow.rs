//! End-to-end flow through the tool layer against a file-backed database.

use ironlog::db::{migrations, Database};
use ironlog::metrics::{BodyWeightSource, DurationSource, EnergyConfig, IntensityRule};
use ironlog::models::WorkoutUpdate;
use ironlog::tools::{exercises, measurements, templates, users, workouts};

fn setup() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let database = Database::new(dir.path().join("ironlog.db")).unwrap();
    database.with_conn(migrations::run_migrations).unwrap();
    (dir, database)
}

#[test]
fn test_workout_calories_follow_sets_and_duration() {
    let (_dir, db) = setup();
    let config = EnergyConfig::default();

    let user = users::create_user(&db, "lifter@example.com", Some("Sam"), None).unwrap();
    users::update_user_profile(&db, &config, user.id, Some("male"), Some(80.0), Some(180.0)).unwrap();

    let squat = exercises::add_exercise(&db, "Back Squat", "compound", None, Some("quads"), Some("barbell"), None)
        .unwrap();
    assert!(exercises::add_exercise(&db, "back squat", "compound", None, None, None, None).is_err());

    let workout = workouts::create_workout(&db, &config, user.id, "Leg day", None, 3600, None, None, false)
        .unwrap();
    assert_eq!(workout.calories_burned, Some(0.0));

    let we = workouts::add_workout_exercise(&db, &config, workout.id, squat.id).unwrap();
    assert_eq!(we.exercise_order, 1);

    workouts::add_exercise_set(&db, &config, we.id, 10, 60.0, 0, true, 0).unwrap();
    let mut last = None;
    for _ in 0..3 {
        last = Some(workouts::add_exercise_set(&db, &config, we.id, 5, 120.0, 240, false, 2).unwrap());
    }
    let last = last.unwrap();
    // Powerlifting MET 5.0 x 80 kg x 1 h logged
    assert_eq!(last.workout_calories_burned, Some(400.0));
    assert_eq!(last.set.set_number, 4);

    let detail = workouts::get_workout(&db, &config, workout.id).unwrap().unwrap();
    assert_eq!(detail.exercises.len(), 1);
    assert_eq!(detail.exercises[0].name, "Back Squat");
    assert_eq!(detail.exercises[0].sets.len(), 4);
    // 120 kg x 5, warmup excluded
    assert_eq!(detail.exercises[0].one_rep_max, Some(137.15));
    assert_eq!(detail.summary.total_sets, 3);
    assert_eq!(detail.summary.max_weight, 120.0);
    assert_eq!(detail.energy.duration_source, DurationSource::Logged);
    assert_eq!(detail.energy.body_weight_source, BodyWeightSource::Profile);
    assert_eq!(detail.energy.intensity.map(|i| i.rule), Some(IntensityRule::Powerlifting));

    // Without a logged duration: 3 sets x 30 s + 720 s rest = 0.225 h
    let updated = workouts::update_workout(&db, &config, workout.id, WorkoutUpdate {
        duration_seconds: Some(0),
        ..Default::default()
    })
    .unwrap()
    .unwrap();
    assert_eq!(updated.calories_burned, Some(90.0));

    let recalculated = workouts::recalculate_workout_calories(&db, &config, workout.id).unwrap();
    assert_eq!(recalculated.previous_calories_burned, Some(90.0));
    assert_eq!(recalculated.estimate.duration_source, DurationSource::Inferred);
    assert_eq!(recalculated.estimate.calories_burned, 90.0);

    // Removing the only exercise empties the workout
    workouts::remove_workout_exercise(&db, &config, we.id).unwrap();
    let emptied = workouts::get_workout(&db, &config, workout.id).unwrap().unwrap();
    assert_eq!(emptied.workout.calories_burned, Some(0.0));
    assert_eq!(emptied.energy.duration_source, DurationSource::Empty);
    assert!(emptied.energy.intensity.is_none());

    assert!(workouts::delete_workout(&db, workout.id).unwrap().success);
    assert!(workouts::get_workout(&db, &config, workout.id).unwrap().is_none());
}

#[test]
fn test_invalid_workout_input_rejected() {
    let (_dir, db) = setup();
    let config = EnergyConfig::default();

    assert!(workouts::create_workout(&db, &config, 999, "Ghost", None, 0, None, None, false).is_err());

    let user = users::create_user(&db, "a@example.com", None, None).unwrap();
    assert!(workouts::create_workout(&db, &config, user.id, "Bad", None, 0, Some("max"), None, false).is_err());

    let workout = workouts::create_workout(&db, &config, user.id, "Ok", None, 0, Some("high"), None, false)
        .unwrap();
    assert!(workouts::add_workout_exercise(&db, &config, workout.id, 42).is_err());

    let curl = exercises::add_exercise(&db, "Curl", "isolation", None, None, None, None).unwrap();
    let we = workouts::add_workout_exercise(&db, &config, workout.id, curl.id).unwrap();
    assert!(workouts::add_exercise_set(&db, &config, we.id, 10, -1.0, 60, false, 0).is_err());
    assert!(workouts::add_exercise_set(&db, &config, we.id, 10, f64::NAN, 60, false, 0).is_err());
    assert!(workouts::add_exercise_set(&db, &config, 777, 10, 10.0, 60, false, 0).is_err());
}

#[test]
fn test_body_measurements_record_estimate_or_reason() {
    let (_dir, db) = setup();

    let user = users::create_user(&db, "measure@example.com", None, None).unwrap();

    let male = measurements::log_body_measurement(&db, user.id, 180.0, 82.0, 85.0, 38.0, None, Some("male"), None)
        .unwrap();
    assert_eq!(male.measurement.body_fat_percentage, Some(16.11));
    assert!(male.body_fat_unavailable_reason.is_none());

    let female = measurements::log_body_measurement(&db, user.id, 165.0, 60.0, 75.0, 33.0, None, Some("female"), None)
        .unwrap();
    assert_eq!(female.measurement.body_fat_percentage, None);
    assert!(female.body_fat_unavailable_reason.is_some());

    assert!(measurements::log_body_measurement(&db, user.id, 0.0, 60.0, 75.0, 33.0, None, None, None).is_err());
    assert!(measurements::log_body_measurement(&db, 555, 180.0, 80.0, 85.0, 38.0, None, None, None).is_err());

    assert_eq!(measurements::list_body_measurements(&db, user.id, None).unwrap().len(), 2);
}

#[test]
fn test_body_weight_change_updates_stored_calories() {
    let (_dir, db) = setup();
    let config = EnergyConfig::default();

    let user = users::create_user(&db, "weigh-in@example.com", None, None).unwrap();
    let press = exercises::add_exercise(&db, "Overhead Press", "compound", None, None, None, None).unwrap();

    let workout = workouts::create_workout(&db, &config, user.id, "Press", None, 3600, Some("high"), None, false)
        .unwrap();
    let we = workouts::add_workout_exercise(&db, &config, workout.id, press.id).unwrap();
    let logged = workouts::add_exercise_set(&db, &config, we.id, 5, 50.0, 120, false, 1).unwrap();
    // 6.0 x 70 kg default x 1 h
    assert_eq!(logged.workout_calories_burned, Some(420.0));

    let response = users::update_user_profile(&db, &config, user.id, None, Some(100.0), None)
        .unwrap()
        .unwrap();
    assert_eq!(response.profile.body_weight_kg, Some(100.0));
    assert_eq!(response.workouts_recalculated, 1);

    let detail = workouts::get_workout(&db, &config, workout.id).unwrap().unwrap();
    assert_eq!(detail.energy.calories_burned, 600.0);
    assert_eq!(detail.workout.calories_burned, Some(detail.energy.calories_burned));

    // Height alone leaves the workouts untouched
    let response = users::update_user_profile(&db, &config, user.id, None, None, Some(182.0))
        .unwrap()
        .unwrap();
    assert_eq!(response.workouts_recalculated, 0);

    assert!(users::update_user_profile(&db, &config, 9999, None, Some(80.0), None).unwrap().is_none());
    assert!(users::update_user_profile(&db, &config, user.id, None, Some(0.0), None).is_err());
}

#[test]
fn test_workout_started_from_template() {
    let (_dir, db) = setup();
    let config = EnergyConfig::default();

    let user = users::create_user(&db, "routine@example.com", None, None).unwrap();
    let deadlift = exercises::add_exercise(&db, "Deadlift", "compound", None, None, None, None).unwrap();
    let row = exercises::add_exercise(&db, "Barbell Row", "compound", None, None, None, None).unwrap();

    assert!(templates::create_workout_template(&db, user.id, "Pull", None, &[deadlift.id, 999]).is_err());
    assert!(templates::list_workout_templates(&db, user.id).unwrap().is_empty());
    assert!(templates::create_workout_template(&db, user.id, "  ", None, &[]).is_err());

    let template = templates::create_workout_template(&db, user.id, "Pull", Some("Heavy"), &[deadlift.id, row.id])
        .unwrap();
    assert_eq!(template.exercises.len(), 2);
    assert_eq!(template.exercises[0].exercise_name, "Deadlift");

    let workout = templates::start_workout_from_template(&db, &config, template.id, None, None, 3000, Some("medium"))
        .unwrap()
        .unwrap();
    assert_eq!(workout.title, "Pull");

    let detail = workouts::get_workout(&db, &config, workout.id).unwrap().unwrap();
    let names: Vec<_> = detail.exercises.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Deadlift", "Barbell Row"]);
    assert!(detail.exercises.iter().all(|e| e.sets.is_empty() && e.one_rep_max.is_none()));

    assert!(templates::start_workout_from_template(&db, &config, 404, None, None, 0, None).unwrap().is_none());
    assert!(templates::start_workout_from_template(&db, &config, template.id, None, None, 0, Some("max")).is_err());

    assert!(templates::delete_workout_template(&db, template.id).unwrap().success);
    assert!(templates::get_workout_template(&db, template.id).unwrap().is_none());
    assert!(workouts::get_workout(&db, &config, workout.id).unwrap().is_some());
}
