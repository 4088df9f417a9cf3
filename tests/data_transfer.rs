//! Export from one database, import into another.

mod common;

use common::{at, program, push_day, temp_db};
use liftplan::{
    HistoryRecord, LibraryExercise, PerformanceVariableCategory,
    commands::data::{Export, Imported, export, import},
    settings::Settings,
    storage::{HistoryStore, LibraryStore, ProgramStore},
    types::UnitSystem,
};

#[tokio::test]
async fn export_then_import_preserves_content() {
    let (_src_dir, src) = temp_db().await;
    let programs = ProgramStore::new(&src);
    let history = HistoryStore::new(&src);

    let filler = programs.upsert(&program("filler")).await.unwrap();
    let pid = programs
        .upsert(&program("PPL").with_followed(true).with_workout_completed(at(2024, 5, 6, 7)))
        .await
        .unwrap();
    history
        .upsert(
            &HistoryRecord::start(pid, 0, push_day(), at(2024, 5, 6, 6))
                .finished()
                .unwrap(),
        )
        .await
        .unwrap();
    programs.delete(&programs.get_by_id(filler).await.unwrap().unwrap()).await.unwrap();
    let plank = LibraryExercise::new("Plank", PerformanceVariableCategory::Time);
    LibraryStore::new(&src).add(&plank).await.unwrap();

    let settings = Settings {
        unit_system: UnitSystem::Imperial,
        ..Default::default()
    };
    let dump = export(&src, &settings).await.unwrap();
    let json = serde_json::to_string(&dump).unwrap();
    let parsed: Export = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.settings, settings);

    let (_dst_dir, dst) = temp_db().await;
    LibraryStore::new(&dst)
        .add(&LibraryExercise::new("plank", PerformanceVariableCategory::Reps))
        .await
        .unwrap();
    assert_eq!(
        import(&dst, &parsed).await.unwrap(),
        Imported {
            programs: 1,
            sessions: 1,
            exercises: 0,
        }
    );
    // The destination's own entry wins over the imported one.
    let lib = LibraryStore::new(&dst).list().await.unwrap();
    assert_eq!(lib.len(), 1);
    assert_eq!(lib[0].category, PerformanceVariableCategory::Reps);

    let imported = ProgramStore::new(&dst).list_all().await.unwrap();
    assert_eq!(imported.len(), 1);
    let original = &dump.programs[0];
    assert_eq!(imported[0].name, original.name);
    assert_eq!(imported[0].days, original.days);
    assert_eq!(imported[0].next_day, original.next_day);
    assert_eq!(imported[0].most_recent_workout_date, original.most_recent_workout_date);
    assert!(!imported[0].followed);

    let records = HistoryStore::new(&dst).list_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].program_id, imported[0].id);
    assert_eq!(records[0].day, push_day());
}

#[tokio::test]
async fn import_skips_second_unfinished_session() {
    let (_dir, pool) = temp_db().await;
    let pid = ProgramStore::new(&pool).upsert(&program("P")).await.unwrap();
    HistoryStore::new(&pool)
        .upsert(&HistoryRecord::start(pid, 0, push_day(), at(2024, 1, 1, 9)))
        .await
        .unwrap();

    let dump = Export {
        settings: Settings::default(),
        programs: vec![],
        history: vec![HistoryRecord::start(pid, 0, push_day(), at(2024, 1, 2, 9))],
        library: vec![LibraryExercise::new("Squat", PerformanceVariableCategory::Reps)],
    };
    assert_eq!(
        import(&pool, &dump).await.unwrap(),
        Imported {
            exercises: 1,
            ..Default::default()
        }
    );
    assert_eq!(HistoryStore::new(&pool).list_all().await.unwrap().len(), 1);
}
