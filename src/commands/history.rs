use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::{
    cli::HistoryCmd,
    commands::{calendar, session::print_record},
    db::DB,
    models::HistoryId,
    settings::Settings,
    storage::{HistoryStore, ProgramStore},
    types::{OutputFmt, emit},
};

#[derive(Serialize)]
struct HistJson {
    id: i64,
    date: String,
    program: String,
    day: String,
    phase: String,
    sets_done: usize,
    sets_total: usize,
}

pub async fn handle(cmd: HistoryCmd, pool: &DB, settings: &Settings, fmt: OutputFmt) -> Result<()> {
    let history = HistoryStore::new(pool);

    match cmd {
        HistoryCmd::List => {
            let programs = ProgramStore::new(pool).list_all().await?;
            let rows: Vec<HistJson> = history
                .list_all()
                .await?
                .into_iter()
                .map(|r| {
                    let sets = r.day.exercises.iter().flat_map(|e| e.sets.iter());
                    HistJson {
                        id: r.id.0,
                        date: r.date.to_string(),
                        program: programs
                            .iter()
                            .find(|p| p.id == r.program_id)
                            .map(|p| p.name.clone())
                            .unwrap_or_else(|| "(deleted program)".to_string()),
                        day: r.day.name.clone(),
                        phase: r.phase.to_string(),
                        sets_done: sets.clone().filter(|s| s.is_completed()).count(),
                        sets_total: sets.count(),
                    }
                })
                .collect();

            emit(fmt, &rows, || {
                if rows.is_empty() {
                    println!("{}", "  (no sessions recorded)".dimmed());
                    return;
                }
                println!("{}", "History:".cyan().bold());
                for r in &rows {
                    let phase = if r.phase == "during" {
                        "in progress".yellow().to_string()
                    } else {
                        format!("{}/{} sets", r.sets_done, r.sets_total)
                            .dimmed()
                            .to_string()
                    };
                    println!(
                        " {} • {} {} / {} {}",
                        format!("{:>4}", r.id).yellow(),
                        r.date.green(),
                        r.program.bold(),
                        r.day,
                        phase
                    );
                }
            });
        }

        HistoryCmd::Show { id } => match history.get_by_id(HistoryId(id)).await? {
            Some(record) => emit(fmt, &record, || print_record(&record, settings)),
            None => println!("{} no session with id {}", "error:".red().bold(), id),
        },

        HistoryCmd::Calendar { year, month } => {
            let records = history.list_all().await?;
            calendar::show(&records, year, month)?;
        }
    }

    Ok(())
}
