pub mod calendar;
pub mod config;
pub mod data;
pub mod exercise;
pub mod history;
pub mod library;
pub mod program;
pub mod session;

use anyhow::Result;
use colored::Colorize;

use crate::{
    cli::DayRef,
    db::DB,
    editor::ProgramEditor,
    error::ModelResult,
    models::{Day, Program},
    storage::ProgramStore,
    types::best_name_suggestion,
};

/// Finds a program by its 1-based position in `p list` or by exact name.
/// Prints an error (with a suggestion when one is close) and returns `None`
/// when nothing matches.
pub async fn resolve_program(pool: &DB, selector: &str) -> Result<Option<Program>> {
    let programs = ProgramStore::new(pool).list_all().await?;

    if let Ok(idx) = selector.parse::<usize>() {
        let found = idx.checked_sub(1).and_then(|i| programs.get(i)).cloned();
        if found.is_none() {
            println!("{} no program at index {}", "error:".red().bold(), idx);
        }
        return Ok(found);
    }

    if let Some(p) = programs.iter().find(|p| p.name == selector) {
        return Ok(Some(p.clone()));
    }

    let names: Vec<String> = programs.iter().map(|p| p.name.clone()).collect();
    match best_name_suggestion(selector, &names) {
        Some(s) => println!(
            "{} no program named `{}` (did you mean `{}`?)",
            "error:".red().bold(),
            selector,
            s.green()
        ),
        None => println!("{} no program named `{}`", "error:".red().bold(), selector),
    }
    Ok(None)
}

/// Loads the addressed program, rewrites one of its days with `edit` and
/// stores the result. Returns the saved program, or `None` if the program or
/// day could not be found (already reported to the user).
pub async fn edit_day<F>(pool: &DB, at: &DayRef, edit: F) -> Result<Option<Program>>
where
    F: FnOnce(&Day) -> ModelResult<Day>,
{
    let Some(program) = resolve_program(pool, &at.program).await? else {
        return Ok(None);
    };

    let Some(day_idx) = at.day.checked_sub(1).filter(|&i| i < program.days.len()) else {
        println!(
            "{} program `{}` has no day {}",
            "error:".red().bold(),
            program.name,
            at.day
        );
        return Ok(None);
    };

    let editor = ProgramEditor::new(program);
    editor.try_apply(|p| {
        let day = edit(&p.days[day_idx])?;
        p.with_day_replaced_at(day_idx, day)
    })?;

    let updated = editor.into_program();
    ProgramStore::new(pool).upsert(&updated).await?;
    Ok(Some(updated))
}
