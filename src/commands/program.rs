use anyhow::Result;
use colored::Colorize;
use itertools::Itertools;
use serde::Serialize;

use crate::{
    cli::{DayCmd, ProgramCmd},
    commands::resolve_program,
    db::DB,
    models::{Day, Program},
    storage::ProgramStore,
    types::{OutputFmt, emit},
};

#[derive(Serialize)]
struct ProgJson {
    idx: usize,
    id: i64,
    name: String,
    followed: bool,
    days: usize,
    next_day: Option<String>,
    week_streak: u32,
    last_workout: Option<String>,
}

fn plain_len(s: &str) -> usize {
    let mut n = 0;
    let mut esc = false;
    for c in s.chars() {
        match (esc, c) {
            (true, 'm') => esc = false,
            (true, _) => {}
            (false, '\x1B') => esc = true,
            (false, _) => n += 1,
        }
    }
    n
}

fn pretty_print(progs: &[ProgJson]) {
    if progs.is_empty() {
        println!("{}", "  (no programs found)".dimmed());
        return;
    }

    println!("{}", "Programs:".cyan().bold());

    let idx_w = progs
        .iter()
        .map(|p| p.idx.to_string().len())
        .max()
        .unwrap_or(1);

    let mut left = Vec::<String>::new();
    let mut right = Vec::<String>::new();
    for p in progs {
        let idx = format!("{:>width$}", p.idx, width = idx_w).yellow();
        let star = if p.followed { "★".yellow().to_string() } else { " ".to_string() };
        left.push(format!(
            " {} {} {} {}",
            idx,
            star,
            p.name.bold(),
            format!("({} days)", p.days).dimmed()
        ));
        right.push(match &p.last_workout {
            Some(d) => format!("last {} · streak {}w", d, p.week_streak)
                .dimmed()
                .to_string(),
            None => "never trained".dimmed().to_string(),
        });
    }

    let pad_plain = left.iter().map(|s| plain_len(s)).max().unwrap_or(0);
    for (l, r) in left.into_iter().zip(right) {
        let pad = pad_plain + (l.chars().count() - plain_len(&l));
        println!("{:<pad$} {} {}", l, "|".blue(), r, pad = pad);
    }
}

pub fn print_day(idx: usize, day: &Day, is_next: bool) {
    let marker = if is_next { " ← next".green().to_string() } else { String::new() };
    println!("{} • {}{}", format!("{}", idx + 1).yellow(), day.name.bold(), marker);

    if day.is_rest_day() {
        println!("   {}", "(rest day)".dimmed());
        return;
    }

    for (i, ex) in day.exercises.iter().enumerate() {
        let connector = if i + 1 == day.exercises.len() { "└─" } else { "├─" };
        let intensity = ex
            .intensity
            .map(|c| format!(" @ {}", c))
            .unwrap_or_default();
        let targets = ex.sets.iter().map(|s| s.target.to_string()).join(", ");
        println!(
            "   {} {} {}{} {}",
            connector,
            format!("{}.", i + 1).yellow(),
            ex.name.bold(),
            intensity.dimmed(),
            format!("[{}]", targets).dimmed()
        );

        if let Some(partner) = day.superset_of(i) {
            println!("        {} {}", "superset with".dimmed(), partner.name);
        }
        let alts = day.alternatives_of(i);
        if !alts.is_empty() {
            println!(
                "        {} {}",
                "alternatives:".dimmed(),
                alts.iter().map(|e| e.name.as_str()).join(", ")
            );
        }
    }

    for (ex, target) in day.dangling_references() {
        println!(
            "   {} exercise {} refers to missing exercise {}",
            "warning:".yellow().bold(),
            ex + 1,
            target + 1
        );
    }
}

fn show(program: &Program) {
    println!("{} {}", "Program:".cyan().bold(), program.name.bold());
    if program.followed {
        println!("{}", "  followed".yellow());
    }
    if let Some(last) = program.most_recent_workout_date {
        println!(
            "  last workout {} · streak {} week(s)",
            last.with_timezone(&chrono::Local).format("%Y-%m-%d"),
            program.week_streak
        );
    }
    println!();

    if program.days.is_empty() {
        println!("{}", "  (no days)".dimmed());
    }
    for (i, day) in program.days.iter().enumerate() {
        print_day(i, day, i == program.next_day);
    }
}

pub async fn handle(cmd: ProgramCmd, pool: &DB, fmt: OutputFmt) -> Result<()> {
    let store = ProgramStore::new(pool);

    match cmd {
        ProgramCmd::New { name } => {
            if store.list_all().await?.iter().any(|p| p.name == name) {
                println!(
                    "{} program `{}` already exists – skipping",
                    "warning:".yellow().bold(),
                    name
                );
                return Ok(());
            }

            let program = Program::new_draft().with_name(&name);
            let id = store.upsert(&program).await?;
            println!("{} `{}` created (id: {})", "ok:".green().bold(), name, id);
        }

        ProgramCmd::List => {
            let progs: Vec<ProgJson> = store
                .list_all()
                .await?
                .into_iter()
                .enumerate()
                .map(|(i, p)| ProgJson {
                    idx: i + 1,
                    id: p.id.0,
                    followed: p.followed,
                    days: p.days.len(),
                    next_day: p.next_day().map(|d| d.name.clone()),
                    week_streak: p.week_streak,
                    last_workout: p
                        .most_recent_workout_date
                        .map(|d| d.with_timezone(&chrono::Local).format("%Y-%m-%d").to_string()),
                    name: p.name,
                })
                .collect();

            emit(fmt, &progs, || pretty_print(&progs));
        }

        ProgramCmd::Show { program } => {
            if let Some(p) = resolve_program(pool, &program).await? {
                emit(fmt, &p, || show(&p));
            }
        }

        ProgramCmd::Rename { program, name } => {
            if let Some(p) = resolve_program(pool, &program).await? {
                let renamed = p.with_name(&name);
                store.upsert(&renamed).await?;
                println!("{} `{}` renamed to `{}`", "ok:".green().bold(), p.name, name);
            }
        }

        ProgramCmd::Delete { program } => {
            if let Some(p) = resolve_program(pool, &program).await? {
                store.delete(&p).await?;
                println!("{} deleted `{}`", "ok:".green().bold(), p.name);
            }
        }

        ProgramCmd::Follow { program } => {
            if let Some(p) = resolve_program(pool, &program).await? {
                store.follow(p.id).await?;
                println!("{} now following `{}`", "ok:".green().bold(), p.name);
            }
        }
    }

    Ok(())
}

pub async fn handle_day(cmd: DayCmd, pool: &DB) -> Result<()> {
    let store = ProgramStore::new(pool);

    match cmd {
        DayCmd::Add { program, name } => {
            if let Some(p) = resolve_program(pool, &program).await? {
                let updated = p.with_day_added(Day::new(&name));
                store.upsert(&updated).await?;
                println!(
                    "{} added day {} `{}` to `{}`",
                    "ok:".green().bold(),
                    updated.days.len(),
                    name,
                    p.name
                );
            }
        }

        DayCmd::Remove { program, day } => {
            let Some(p) = resolve_program(pool, &program).await? else {
                return Ok(());
            };
            let Some((idx, target)) = day
                .checked_sub(1)
                .and_then(|i| p.days.get(i).map(|d| (i, d)))
            else {
                println!("{} program `{}` has no day {}", "error:".red().bold(), p.name, day);
                return Ok(());
            };

            let updated = p.with_day_removed_at(idx)?;
            store.upsert(&updated).await?;
            println!(
                "{} removed day {} `{}` from `{}`",
                "ok:".green().bold(),
                day,
                target.name,
                p.name
            );
        }

        DayCmd::Rename { program, day, name } => {
            let Some(p) = resolve_program(pool, &program).await? else {
                return Ok(());
            };
            let Some(idx) = day.checked_sub(1).filter(|&i| i < p.days.len()) else {
                println!("{} program `{}` has no day {}", "error:".red().bold(), p.name, day);
                return Ok(());
            };

            let updated = p.with_day_replaced_at(idx, p.days[idx].with_name(&name))?;
            store.upsert(&updated).await?;
            println!("{} day {} is now `{}`", "ok:".green().bold(), day, name);
        }
    }

    Ok(())
}
