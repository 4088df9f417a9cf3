#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use liftplan::{
    Day, Exercise, ExerciseSet, PerformanceValue, PerformanceVariableCategory, Program, db::DB,
};
use tempfile::TempDir;

/// A fresh database in its own temp dir. Keep the dir alive for the test.
pub async fn temp_db() -> (TempDir, DB) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let pool = liftplan::db::open(&dir.path().join("test.db"))
        .await
        .expect("open database");
    (dir, pool)
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn push_day() -> Day {
    Day::new("Push")
        .with_exercise_added(
            Exercise::new("Bench", PerformanceVariableCategory::Reps)
                .with_set_added(
                    ExerciseSet::for_category(PerformanceVariableCategory::Reps)
                        .with_target(PerformanceValue::Reps { count: 5 })
                        .with_weight(100.0),
                )
                .unwrap(),
        )
        .with_exercise_added(
            Exercise::new("Fly", PerformanceVariableCategory::RepRange)
                .with_default_set_added()
                .with_superset(Some(0)),
        )
        .with_exercise_added(
            Exercise::new("Plank", PerformanceVariableCategory::Time)
                .with_set_added(
                    ExerciseSet::for_category(PerformanceVariableCategory::Time)
                        .with_target(PerformanceValue::Time { minutes: 1.5 }),
                )
                .unwrap(),
        )
}

pub fn program(name: &str) -> Program {
    Program::new(name)
        .with_day_added(push_day())
        .with_day_added(Day::new("Rest"))
}
