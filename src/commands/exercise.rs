use anyhow::Result;
use colored::Colorize;

use crate::{
    cli::{ExerciseCmd, SetCmd},
    commands::{edit_day, library},
    db::DB,
    error::{ModelError, ModelResult},
    models::{Day, Exercise, ExerciseSet, PerformanceValue, Program},
    settings::Settings,
    types::{IntensityCategory, PerformanceVariableCategory},
};

pub(crate) fn exercise_at(day: &Day, exercise: usize) -> ModelResult<(usize, &Exercise)> {
    let idx = exercise.checked_sub(1).unwrap_or(usize::MAX);
    day.exercises
        .get(idx)
        .map(|ex| (idx, ex))
        .ok_or(ModelError::IndexOutOfRange {
            index: exercise,
            len: day.exercises.len(),
        })
}

pub(crate) fn set_at(exercise: &Exercise, set: usize) -> ModelResult<(usize, &ExerciseSet)> {
    let idx = set.checked_sub(1).unwrap_or(usize::MAX);
    exercise
        .sets
        .get(idx)
        .map(|s| (idx, s))
        .ok_or(ModelError::IndexOutOfRange {
            index: set,
            len: exercise.sets.len(),
        })
}

/// Builds the exercise described by `exercise add`.
pub fn build_exercise(
    name: &str,
    category: PerformanceVariableCategory,
    intensity: Option<IntensityCategory>,
    sets: usize,
    target: Option<&str>,
) -> ModelResult<Exercise> {
    let target = target
        .map(|t| PerformanceValue::parse(category, t))
        .transpose()?
        .unwrap_or(PerformanceValue::zero(category));

    let template = ExerciseSet::for_category(category).with_target(target);
    (0..sets).try_fold(
        Exercise::new(name, category).with_intensity(intensity),
        |ex, _| ex.with_set_added(template.clone()),
    )
}

/// Turns 1-based relation indices from the command line into positions.
/// `0` clears a superset.
fn relation_index(one_based: usize) -> Option<usize> {
    one_based.checked_sub(1)
}

fn report(res: Result<Option<Program>>, what: &str) -> Result<()> {
    match res {
        Ok(Some(_)) => println!("{} {}", "ok:".green().bold(), what),
        Ok(None) => {}
        Err(e) => match e.downcast_ref::<ModelError>() {
            Some(model_err) => println!("{} {}", "error:".red().bold(), model_err),
            None => return Err(e),
        },
    }
    Ok(())
}

pub async fn handle(cmd: ExerciseCmd, pool: &DB) -> Result<()> {
    match cmd {
        ExerciseCmd::Add {
            at,
            name,
            category,
            intensity,
            sets,
            target,
        } => {
            let entry = library::lookup(pool, &name).await?;
            let name = entry.as_ref().map_or(name, |e| e.name.clone());
            let category = category
                .or(entry.as_ref().map(|e| e.category))
                .unwrap_or_default();
            let intensity = intensity.or(entry.and_then(|e| e.intensity));

            let exercise =
                match build_exercise(&name, category, intensity, sets, target.as_deref()) {
                    Ok(ex) => ex,
                    Err(e) => {
                        println!("{} {}", "error:".red().bold(), e);
                        return Ok(());
                    }
                };
            let res = edit_day(pool, &at, |day| Ok(day.with_exercise_added(exercise))).await;
            report(res, &format!("added `{}` ({} sets, {})", name, sets, category))
        }

        ExerciseCmd::Remove { at, exercise } => {
            let res = edit_day(pool, &at, |day| {
                let (idx, _) = exercise_at(day, exercise)?;
                day.with_exercise_removed_at(idx)
            })
            .await;
            report(res, &format!("removed exercise {}", exercise))
        }

        ExerciseCmd::Edit {
            at,
            exercise,
            name,
            category,
            intensity,
            no_intensity,
            superset,
            alternatives,
        } => {
            let res = edit_day(pool, &at, |day| {
                let (idx, ex) = exercise_at(day, exercise)?;
                let mut edited = ex.clone();
                if let Some(n) = &name {
                    edited = edited.with_name(n);
                }
                if let Some(c) = category {
                    edited = edited.with_category(c);
                }
                if intensity.is_some() || no_intensity {
                    edited = edited.with_intensity(intensity);
                }
                if let Some(s) = superset {
                    edited = edited.with_superset(relation_index(s));
                }
                if let Some(alts) = &alternatives {
                    let alts = alts.iter().filter_map(|&a| relation_index(a)).collect();
                    edited = edited.with_alternatives(alts);
                }
                day.with_exercise_replaced_at(idx, edited)
            })
            .await;
            report(res, &format!("updated exercise {}", exercise))
        }
    }
}

pub async fn handle_set(cmd: SetCmd, pool: &DB, settings: &Settings) -> Result<()> {
    match cmd {
        SetCmd::Add {
            at,
            exercise,
            target,
            weight,
        } => {
            let res = edit_day(pool, &at, |day| {
                let (idx, ex) = exercise_at(day, exercise)?;
                let mut set = ExerciseSet::for_category(ex.category);
                if let Some(t) = &target {
                    set = set.with_target(PerformanceValue::parse(ex.category, t)?);
                }
                if let Some(w) = weight {
                    set = set.with_weight(settings.weight_to_kg(w));
                }
                day.with_exercise_replaced_at(idx, ex.with_set_added(set)?)
            })
            .await;
            report(res, &format!("added a set to exercise {}", exercise))
        }

        SetCmd::Remove { at, exercise, set } => {
            let res = edit_day(pool, &at, |day| {
                let (idx, ex) = exercise_at(day, exercise)?;
                let (set_idx, _) = set_at(ex, set)?;
                day.with_exercise_replaced_at(idx, ex.with_set_removed_at(set_idx)?)
            })
            .await;
            report(res, &format!("removed set {} of exercise {}", set, exercise))
        }

        SetCmd::Edit {
            at,
            exercise,
            set,
            target,
            weight,
        } => {
            let res = edit_day(pool, &at, |day| {
                let (idx, ex) = exercise_at(day, exercise)?;
                let (set_idx, s) = set_at(ex, set)?;
                let mut edited = s.clone();
                if let Some(t) = &target {
                    edited = edited.with_target(PerformanceValue::parse(ex.category, t)?);
                }
                if let Some(w) = weight {
                    edited = edited.with_weight(settings.weight_to_kg(w));
                }
                day.with_exercise_replaced_at(idx, ex.with_set_replaced_at(set_idx, edited)?)
            })
            .await;
            report(res, &format!("updated set {} of exercise {}", set, exercise))
        }
    }
}
