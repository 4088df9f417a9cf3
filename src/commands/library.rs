use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::{
    cli::LibraryCmd,
    db::DB,
    models::LibraryExercise,
    storage::LibraryStore,
    types::{OutputFmt, best_name_suggestion, emit},
};

/// A TOML file of `[[exercise]]` tables.
#[derive(Debug, Deserialize)]
pub struct LibraryImport {
    #[serde(default)]
    pub exercise: Vec<LibraryExercise>,
}

#[derive(Serialize)]
struct LibJson {
    idx: usize,
    name: String,
    category: String,
    intensity: Option<String>,
}

/// Looks `name` up in the library. When there is no entry, prints a hint
/// naming the closest one, if any.
pub async fn lookup(pool: &DB, name: &str) -> Result<Option<LibraryExercise>> {
    let store = LibraryStore::new(pool);
    if let Some(entry) = store.find(name).await? {
        return Ok(Some(entry));
    }

    let names: Vec<String> = store.list().await?.into_iter().map(|e| e.name).collect();
    if let Some(s) = best_name_suggestion(name, &names) {
        println!(
            "{} `{}` is not in the library (did you mean `{}`?)",
            "info:".blue().bold(),
            name,
            s.green()
        );
    }
    Ok(None)
}

pub async fn handle(cmd: LibraryCmd, pool: &DB, fmt: OutputFmt) -> Result<()> {
    let store = LibraryStore::new(pool);

    match cmd {
        LibraryCmd::Add {
            name,
            category,
            intensity,
        } => {
            if name.trim().is_empty() {
                println!("{} exercise name must not be empty", "error:".red().bold());
                return Ok(());
            }

            let entry = LibraryExercise {
                intensity,
                ..LibraryExercise::new(name.trim(), category)
            };
            if store.add(&entry).await? {
                println!("{} `{}` added to the library", "ok:".green().bold(), entry.name);
            } else {
                println!(
                    "{} `{}` already exists – use `library list` to view all exercises",
                    "warning:".yellow().bold(),
                    entry.name
                );
            }
        }

        LibraryCmd::List => {
            let rows: Vec<LibJson> = store
                .list()
                .await?
                .into_iter()
                .enumerate()
                .map(|(i, e)| LibJson {
                    idx: i + 1,
                    category: e.category.to_string(),
                    intensity: e.intensity.map(|i| i.to_string()),
                    name: e.name,
                })
                .collect();

            emit(fmt, &rows, || {
                if rows.is_empty() {
                    println!("{}", "  (library is empty)".dimmed());
                    return;
                }
                println!("{}", "Exercises:".cyan().bold());
                let name_w = rows.iter().map(|r| r.name.chars().count()).max().unwrap_or(0);
                for r in &rows {
                    let intensity = r
                        .intensity
                        .as_deref()
                        .map(|i| format!(" @ {}", i))
                        .unwrap_or_default();
                    println!(
                        " {} {:<name_w$} {} {}{}",
                        format!("{:>3}", r.idx).yellow(),
                        r.name,
                        "|".blue(),
                        r.category.dimmed(),
                        intensity.dimmed(),
                        name_w = name_w
                    );
                }
            });
        }

        LibraryCmd::Remove { name } => {
            if store.remove(&name).await? {
                println!("{} removed `{}` from the library", "ok:".green().bold(), name);
            } else {
                lookup(pool, &name).await?;
                println!("{} no library exercise named `{}`", "error:".red().bold(), name);
            }
        }

        LibraryCmd::Import { file } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Could not read file: `{}`", file.display()))?;
            let import: LibraryImport = toml::from_str(&content)
                .context("Failed to parse TOML: Expected `[[exercise]]` entries")?;

            if import.exercise.is_empty() {
                println!("{}", "warning: no [[exercise]] entries found".yellow().bold());
                return Ok(());
            }

            let (mut inserted, mut skipped) = (0, 0);
            for entry in import.exercise {
                if entry.name.trim().is_empty() {
                    println!("{} skipped an entry without a name", "warning:".yellow().bold());
                    skipped += 1;
                } else if store.add(&entry).await? {
                    println!("{} `{}`", "ok:".green().bold(), entry.name);
                    inserted += 1;
                } else {
                    println!("{} `{}` (already exists)", "info:".blue().bold(), entry.name);
                    skipped += 1;
                }
            }

            println!(
                "\n{} {} inserted, {} skipped",
                "Summary:".cyan().bold(),
                inserted,
                skipped
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IntensityCategory, PerformanceVariableCategory};

    #[test]
    fn parses_exercise_tables() {
        let import: LibraryImport = toml::from_str(
            r#"
            [[exercise]]
            name = "Bench Press"
            category = "reps"
            intensity = "rpe"

            [[exercise]]
            name = "Plank"
            category = "time"

            [[exercise]]
            name = "Curl"
            "#,
        )
        .unwrap();

        assert_eq!(
            import.exercise,
            vec![
                LibraryExercise {
                    intensity: Some(IntensityCategory::Rpe),
                    ..LibraryExercise::new("Bench Press", PerformanceVariableCategory::Reps)
                },
                LibraryExercise::new("Plank", PerformanceVariableCategory::Time),
                LibraryExercise::new("Curl", PerformanceVariableCategory::Reps),
            ]
        );
    }

    #[test]
    fn empty_file_has_no_entries() {
        let import: LibraryImport = toml::from_str("").unwrap();
        assert!(import.exercise.is_empty());
    }
}
