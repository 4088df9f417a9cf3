use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;

use crate::{
    cli::SessionCmd,
    commands::{
        exercise::{exercise_at, set_at},
        resolve_program,
    },
    db::DB,
    error::ModelResult,
    models::{Day, ExerciseSet, HistoryRecord, PerformanceValue, Program},
    settings::Settings,
    storage::{HistoryStore, ProgramStore},
    types::{OutputFmt, emit},
    utils::format_duration,
};

/// What was actually done for one set.
pub struct SetLog {
    pub actual: PerformanceValue,
    pub weight_kg: Option<f32>,
    pub intensity: Option<f32>,
    pub at: DateTime<Utc>,
}

/// Records a performed set on `day`. `set` is 1-based; one past the last set
/// appends a fresh set for the exercise's category.
pub fn log_set(day: &Day, exercise: usize, set: usize, log: SetLog) -> ModelResult<Day> {
    let (ex_idx, ex) = exercise_at(day, exercise)?;

    let ex = if set == ex.sets.len() + 1 {
        ex.with_default_set_added()
    } else {
        ex.clone()
    };
    let (set_idx, current) = set_at(&ex, set)?;

    let mut done = current.with_actual(log.actual).completed(log.at);
    if let Some(w) = log.weight_kg {
        done = done.with_weight(w);
    }
    if log.intensity.is_some() {
        done = done.with_intensity(log.intensity);
    }

    day.with_exercise_replaced_at(ex_idx, ex.with_set_replaced_at(set_idx, done)?)
}

async fn pick_program(pool: &DB, selector: Option<&str>) -> Result<Option<Program>> {
    match selector {
        Some(sel) => resolve_program(pool, sel).await,
        None => {
            let followed = ProgramStore::new(pool).list_followed().await?;
            if followed.is_empty() {
                println!(
                    "{} no followed program – pass a program or run `program follow`",
                    "error:".red().bold()
                );
            }
            Ok(followed.into_iter().next())
        }
    }
}

fn print_set(idx: usize, set: &ExerciseSet, settings: &Settings) {
    let unit = settings.unit_system.weight_label();
    print!("    Set {}: target {}", idx + 1, set.target);
    if set.is_completed() {
        print!(
            " → {} @ {:.1}{}",
            set.actual.to_string().green(),
            settings.display_weight(set.weight),
            unit
        );
        if let Some(i) = set.intensity {
            print!(" ({})", i);
        }
    } else if set.weight > 0.0 {
        print!(" @ {:.1}{}", settings.display_weight(set.weight), unit);
    }
    println!();
}

pub fn print_record(record: &HistoryRecord, settings: &Settings) {
    let local = record.start_time.with_timezone(&chrono::Local);
    println!(
        "{} {} ({})",
        "Session:".cyan().bold(),
        record.day.name.bold(),
        record.phase
    );
    println!("⏱ Started: {}", local.format("%Y-%m-%d %H:%M"));

    for (ex_idx, ex) in record.day.exercises.iter().enumerate() {
        let intensity = ex.intensity.map(|c| format!(" [{}]", c)).unwrap_or_default();
        println!("\n{}. {}{}", ex_idx + 1, ex.name.bold(), intensity.dimmed());
        for (set_idx, set) in ex.sets.iter().enumerate() {
            print_set(set_idx, set, settings);
        }
    }
}

pub async fn handle(cmd: SessionCmd, pool: &DB, settings: &Settings, fmt: OutputFmt) -> Result<()> {
    let history = HistoryStore::new(pool);

    match cmd {
        SessionCmd::Start { program, day } => {
            if let Some(active) = history.get_unfinished().await? {
                println!(
                    "{} there is already an active session (id: {})",
                    "error:".red().bold(),
                    active.id
                );
                return Ok(());
            }

            let Some(p) = pick_program(pool, program.as_deref()).await? else {
                return Ok(());
            };

            let day_idx = match day {
                Some(d) => d.checked_sub(1).unwrap_or(usize::MAX),
                None => p.next_day,
            };
            let Some(chosen) = p.days.get(day_idx) else {
                println!("{} program `{}` has no such day", "error:".red().bold(), p.name);
                return Ok(());
            };

            let mut record = HistoryRecord::start(p.id, day_idx, chosen.clone(), Utc::now());
            record.id = history.upsert(&record).await?;

            println!("{}", "Exercises:".cyan().bold());
            for (i, ex) in chosen.exercises.iter().enumerate() {
                println!(
                    "{} • {} — {} sets",
                    format!("{}", i + 1).yellow(),
                    ex.name.bold(),
                    ex.sets.len()
                );
            }
            println!(
                "\n{} session started: `{}` / `{}` (id: {})",
                "ok:".green().bold(),
                p.name,
                chosen.name,
                record.id
            );
        }

        SessionCmd::Cancel => match history.get_unfinished().await? {
            Some(active) => {
                history.delete(active.id).await?;
                println!("{} session cancelled", "ok:".green().bold());
            }
            None => println!("{} no active session", "warning:".yellow().bold()),
        },

        SessionCmd::Show => match history.get_unfinished().await? {
            Some(active) => emit(fmt, &active, || {
                print_record(&active, settings);
                let elapsed = Utc::now() - active.start_time;
                println!("\n⏱️  Elapsed time: {}", format_duration(elapsed));
            }),
            None => println!("{} no active session", "warning:".yellow().bold()),
        },

        SessionCmd::Log {
            exercise,
            set,
            actual,
            weight,
            intensity,
        } => {
            let Some(active) = history.get_unfinished().await? else {
                println!("{} no active session", "error:".red().bold());
                return Ok(());
            };

            let category = match exercise_at(&active.day, exercise) {
                Ok((_, ex)) => ex.category,
                Err(e) => {
                    println!("{} {}", "error:".red().bold(), e);
                    return Ok(());
                }
            };
            let logged = PerformanceValue::parse(category, &actual).and_then(|actual| {
                log_set(
                    &active.day,
                    exercise,
                    set,
                    SetLog {
                        actual,
                        weight_kg: weight.map(|w| settings.weight_to_kg(w)),
                        intensity,
                        at: Utc::now(),
                    },
                )
            });

            match logged {
                Ok(day) => {
                    history.update(&active.with_day(day)).await?;
                    println!("{} logged set {}-{}", "ok:".green().bold(), exercise, set);
                }
                Err(e) => println!("{} {}", "error:".red().bold(), e),
            }
        }

        SessionCmd::End => {
            let Some(active) = history.get_unfinished().await? else {
                println!("{} no active session", "error:".red().bold());
                return Ok(());
            };

            let finished = active.finished()?;
            history.update(&finished).await?;

            let now = Utc::now();
            let programs = ProgramStore::new(pool);
            match programs.get_by_id(finished.program_id).await? {
                Some(p) => {
                    programs.upsert(&p.with_day_trained(finished.day_index, now)).await?;
                }
                None => tracing::warn!(
                    program_id = %finished.program_id,
                    "finished a session whose program no longer exists"
                ),
            }

            let duration = now - finished.start_time;
            println!(
                "🏁 Finished session in {} minutes",
                duration.num_minutes()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::{error::ModelError, models::Exercise, types::PerformanceVariableCategory};

    fn day() -> Day {
        Day::new("Push")
            .with_exercise_added(
                Exercise::new("Bench", PerformanceVariableCategory::Reps)
                    .with_default_set_added()
                    .with_default_set_added(),
            )
            .with_exercise_added(Exercise::new("Plank", PerformanceVariableCategory::Time))
    }

    fn log(actual: PerformanceValue) -> SetLog {
        SetLog {
            actual,
            weight_kg: Some(80.0),
            intensity: Some(8.0),
            at: Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn logs_an_existing_set() {
        let d = day();
        let logged = log_set(&d, 1, 2, log(PerformanceValue::Reps { count: 6 })).unwrap();
        let set = &logged.exercises[0].sets[1];
        assert_eq!(set.actual, PerformanceValue::Reps { count: 6 });
        assert_eq!(set.weight, 80.0);
        assert_eq!(set.intensity, Some(8.0));
        assert!(set.is_completed());
        assert!(!logged.exercises[0].sets[0].is_completed());
        assert_eq!(logged.exercises[1], d.exercises[1]);
    }

    #[test]
    fn one_past_the_end_appends_a_set() {
        let logged = log_set(&day(), 2, 1, log(PerformanceValue::Time { minutes: 1.0 })).unwrap();
        assert_eq!(logged.exercises[1].sets.len(), 1);
        assert_eq!(logged.exercises[1].sets[0].target, PerformanceValue::Time { minutes: 0.0 });
    }

    #[test]
    fn rejects_bad_addresses_and_shapes() {
        let d = day();
        assert!(matches!(
            log_set(&d, 3, 1, log(PerformanceValue::Reps { count: 1 })),
            Err(ModelError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            log_set(&d, 1, 4, log(PerformanceValue::Reps { count: 1 })),
            Err(ModelError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            log_set(&d, 1, 1, log(PerformanceValue::Time { minutes: 1.0 })),
            Err(ModelError::CategoryMismatch { .. })
        ));
    }
}
