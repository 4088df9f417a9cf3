//! ProgramStore against a real SQLite file.

mod common;

use common::{at, program, temp_db};
use liftplan::{Day, Program, ProgramId, storage::ProgramStore};

#[tokio::test]
async fn upsert_assigns_id_and_round_trips() {
    let (_dir, pool) = temp_db().await;
    let store = ProgramStore::new(&pool);

    let programs = [
        Program::new("empty"),
        Program::new("one").with_day_added(Day::new("A")),
        program("many"),
    ];
    for p in programs {
        assert!(!p.id.is_assigned());
        let id = store.upsert(&p).await.unwrap();
        assert!(id.is_assigned());

        let loaded = store.get_by_id(id).await.unwrap().expect("stored program");
        assert_eq!(loaded, Program { id, ..p });
    }
}

#[tokio::test]
async fn upsert_with_id_updates_in_place() {
    let (_dir, pool) = temp_db().await;
    let store = ProgramStore::new(&pool);

    let id = store.upsert(&program("PPL")).await.unwrap();
    let stored = store.get_by_id(id).await.unwrap().unwrap();

    let edited = stored
        .with_name("Push Pull")
        .with_day_replaced_at(1, Day::new("Pull"))
        .unwrap()
        .with_workout_completed(at(2024, 3, 1, 8));
    assert_eq!(store.upsert(&edited).await.unwrap(), id);

    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], edited);
}

#[tokio::test]
async fn missing_program_is_none() {
    let (_dir, pool) = temp_db().await;
    let store = ProgramStore::new(&pool);
    assert!(store.get_by_id(ProgramId(42)).await.unwrap().is_none());
}

#[tokio::test]
async fn list_all_orders_by_most_recent_workout() {
    let (_dir, pool) = temp_db().await;
    let store = ProgramStore::new(&pool);

    store.upsert(&program("never")).await.unwrap();
    store
        .upsert(&program("old").with_workout_completed(at(2024, 1, 1, 9)))
        .await
        .unwrap();
    store
        .upsert(&program("new").with_workout_completed(at(2024, 6, 1, 9)))
        .await
        .unwrap();

    let names: Vec<String> = store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["new", "old", "never"]);
}

#[tokio::test]
async fn follow_keeps_a_single_followed_program() {
    let (_dir, pool) = temp_db().await;
    let store = ProgramStore::new(&pool);

    let a = store.upsert(&program("A").with_followed(true)).await.unwrap();
    let b = store.upsert(&program("B")).await.unwrap();

    let followed = store.list_followed().await.unwrap();
    assert_eq!(followed.len(), 1);
    assert_eq!(followed[0].id, a);

    store.follow(b).await.unwrap();
    let followed = store.list_followed().await.unwrap();
    assert_eq!(followed.iter().map(|p| p.id).collect::<Vec<_>>(), vec![b]);

    assert!(store.follow(ProgramId(999)).await.is_err());
    assert_eq!(store.list_followed().await.unwrap()[0].id, b);
}

#[tokio::test]
async fn delete_removes_the_row() {
    let (_dir, pool) = temp_db().await;
    let store = ProgramStore::new(&pool);

    let id = store.upsert(&program("gone")).await.unwrap();
    let p = store.get_by_id(id).await.unwrap().unwrap();
    store.delete(&p).await.unwrap();

    assert!(store.get_by_id(id).await.unwrap().is_none());
    assert!(store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn unreadable_numbers_are_never_written() {
    let (_dir, pool) = temp_db().await;
    let store = ProgramStore::new(&pool);
    let healthy = store.upsert(&program("healthy")).await.unwrap();

    // Bypasses the checked builders the way a hand-built value could.
    let mut broken = program("broken");
    broken.days[0].exercises[0].sets[0].weight = "inf".parse().unwrap();
    assert!(store.upsert(&broken).await.is_err());

    let stored = store.get_by_id(healthy).await.unwrap().unwrap();
    broken.id = stored.id;
    assert!(store.upsert(&broken).await.is_err());

    let all = store.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], stored);
}
