use std::{collections::HashMap, path::PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::{
    cli::DataCmd,
    db::DB,
    models::{HistoryId, HistoryRecord, LibraryExercise, Program, ProgramId},
    settings::Settings,
    storage::{HistoryStore, LibraryStore, ProgramStore},
};

const DEFAULT_EXPORT: &str = "liftplan-export.json";

#[derive(Debug, Serialize, Deserialize)]
pub struct Export {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub programs: Vec<Program>,
    #[serde(default)]
    pub history: Vec<HistoryRecord>,
    #[serde(default)]
    pub library: Vec<LibraryExercise>,
}

/// How many rows an import added.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Imported {
    pub programs: usize,
    pub sessions: usize,
    pub exercises: usize,
}

pub async fn export(pool: &DB, settings: &Settings) -> Result<Export> {
    Ok(Export {
        settings: *settings,
        programs: ProgramStore::new(pool).list_all().await?,
        history: HistoryStore::new(pool).list_all().await?,
        library: LibraryStore::new(pool).list().await?,
    })
}

/// Stores everything in `dump` under fresh ids. History records follow
/// their program to its new id; records whose program is not part of the
/// dump keep the id they had. Library exercises already present are kept.
pub async fn import(pool: &DB, dump: &Export) -> Result<Imported> {
    let programs = ProgramStore::new(pool);
    let history = HistoryStore::new(pool);

    let mut new_ids = HashMap::<ProgramId, ProgramId>::new();
    for p in &dump.programs {
        let fresh = Program {
            id: ProgramId::UNASSIGNED,
            followed: false,
            ..p.clone()
        };
        let id = programs.upsert(&fresh).await?;
        new_ids.insert(p.id, id);
    }

    let mut skipped_unfinished = false;
    let mut has_unfinished = history.get_unfinished().await?.is_some();
    let mut imported = 0;
    for r in &dump.history {
        if r.is_unfinished() && has_unfinished {
            skipped_unfinished = true;
            continue;
        }
        let fresh = HistoryRecord {
            id: HistoryId::UNASSIGNED,
            program_id: new_ids.get(&r.program_id).copied().unwrap_or(r.program_id),
            ..r.clone()
        };
        history.upsert(&fresh).await?;
        has_unfinished |= fresh.is_unfinished();
        imported += 1;
    }

    if skipped_unfinished {
        tracing::warn!("skipped an in-progress session: one is already active");
    }

    let library = LibraryStore::new(pool);
    let mut exercises = 0;
    for entry in &dump.library {
        if library.add(entry).await? {
            exercises += 1;
        }
    }

    Ok(Imported {
        programs: dump.programs.len(),
        sessions: imported,
        exercises,
    })
}

pub async fn handle(cmd: DataCmd, pool: &DB, settings: &Settings) -> Result<()> {
    match cmd {
        DataCmd::Export { file } => {
            let path = file.unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT));
            let dump = export(pool, settings).await?;
            let content = serde_json::to_string_pretty(&dump)?;
            tokio::fs::write(&path, content)
                .await
                .with_context(|| format!("Failed to write export to {}", path.display()))?;
            println!(
                "{} exported {} program(s), {} session(s) and {} library exercise(s) to {}",
                "ok:".green().bold(),
                dump.programs.len(),
                dump.history.len(),
                dump.library.len(),
                path.display()
            );
        }

        DataCmd::Import { file } => {
            let content = match tokio::fs::read_to_string(&file).await {
                Ok(c) => c,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    println!(
                        "{} cannot open file `{}` – file not found",
                        "error:".red().bold(),
                        file.display()
                    );
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };
            let dump: Export = serde_json::from_str(&content)
                .with_context(|| format!("parsing `{}`", file.display()))?;

            let added = import(pool, &dump).await?;
            println!(
                "{} imported {} program(s), {} session(s) and {} library exercise(s)",
                "ok:".green().bold(),
                added.programs,
                added.sessions,
                added.exercises
            );
        }
    }

    Ok(())
}
