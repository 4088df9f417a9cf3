//! HistoryStore and the session lifecycle.

mod common;

use common::{at, program, push_day, temp_db};
use liftplan::{
    HistoryId, HistoryRecord, PerformanceValue, ProgramId, WorkoutPhase,
    commands::session::{SetLog, log_set},
    storage::{HistoryStore, ProgramStore},
};

#[tokio::test]
async fn unfinished_record_lifecycle() {
    let (_dir, pool) = temp_db().await;
    let programs = ProgramStore::new(&pool);
    let history = HistoryStore::new(&pool);

    let pid = programs.upsert(&program("PPL")).await.unwrap();
    assert!(history.get_unfinished().await.unwrap().is_none());

    let mut record = HistoryRecord::start(pid, 0, push_day(), at(2024, 4, 2, 17));
    record.id = history.upsert(&record).await.unwrap();
    assert!(record.id.is_assigned());

    let active = history.get_unfinished().await.unwrap().expect("active session");
    assert_eq!(active, record);

    let day = log_set(
        &active.day,
        1,
        1,
        SetLog {
            actual: PerformanceValue::Reps { count: 5 },
            weight_kg: Some(102.5),
            intensity: None,
            at: at(2024, 4, 2, 18),
        },
    )
    .unwrap();
    history.update(&active.with_day(day.clone())).await.unwrap();
    assert_eq!(history.get_unfinished().await.unwrap().unwrap().day, day);

    let done = active.with_day(day).finished().unwrap();
    history.update(&done).await.unwrap();
    assert!(history.get_unfinished().await.unwrap().is_none());

    let stored = history.get_by_id(done.id).await.unwrap().unwrap();
    assert_eq!(stored.phase, WorkoutPhase::After);
    assert_eq!(stored, done);
}

#[tokio::test]
async fn update_requires_a_stored_record() {
    let (_dir, pool) = temp_db().await;
    let history = HistoryStore::new(&pool);

    let record = HistoryRecord {
        id: HistoryId(77),
        ..HistoryRecord::start(Default::default(), 0, push_day(), at(2024, 1, 1, 9))
    };
    assert!(history.update(&record).await.is_err());
}

#[tokio::test]
async fn list_all_is_newest_first_and_delete_works() {
    let (_dir, pool) = temp_db().await;
    let history = HistoryStore::new(&pool);
    let pid = ProgramStore::new(&pool).upsert(&program("P")).await.unwrap();

    let older = HistoryRecord::start(pid, 0, push_day(), at(2024, 1, 1, 9))
        .finished()
        .unwrap();
    let newer = HistoryRecord::start(pid, 1, push_day(), at(2024, 2, 1, 9))
        .finished()
        .unwrap();
    let older_id = history.upsert(&older).await.unwrap();
    let newer_id = history.upsert(&newer).await.unwrap();

    let listed = history.list_all().await.unwrap();
    let ids: Vec<_> = listed.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![newer_id, older_id]);
    assert_eq!(listed[0].day_index, 1);

    assert!(history.delete(older_id).await.unwrap());
    assert!(!history.delete(older_id).await.unwrap());
    assert_eq!(history.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn records_with_unreadable_numbers_are_refused() {
    let (_dir, pool) = temp_db().await;
    let history = HistoryStore::new(&pool);

    let mut record = HistoryRecord::start(ProgramId(1), 0, push_day(), at(2024, 3, 3, 9));
    record.day.exercises[0].sets[0].intensity = Some(f32::NAN);
    assert!(history.upsert(&record).await.is_err());
    assert!(history.list_all().await.unwrap().is_empty());
}
