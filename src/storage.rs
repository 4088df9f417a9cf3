use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use clap::ValueEnum;
use sqlx::{Row, sqlite::SqliteRow};

use crate::{
    db::DB,
    models::{Day, HistoryId, HistoryRecord, LibraryExercise, Program, ProgramId},
    types::{IntensityCategory, PerformanceVariableCategory, WorkoutPhase},
};

// Fixed-width UTC text keeps `ORDER BY` on these columns chronological.
fn ts_to_text(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn ts_from_text(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("bad timestamp `{s}`"))?
        .with_timezone(&Utc))
}

/// Serializes days for a JSON column, refusing sets whose numbers would not
/// survive being read back.
fn days_to_json(days: &[Day]) -> Result<String> {
    for (d, day) in days.iter().enumerate() {
        check_day(day).with_context(|| format!("day {} `{}`", d + 1, day.name))?;
    }
    serde_json::to_string(days).context("serializing days")
}

fn check_day(day: &Day) -> Result<()> {
    for ex in &day.exercises {
        for set in &ex.sets {
            set.check().with_context(|| format!("exercise `{}`", ex.name))?;
        }
    }
    Ok(())
}

pub struct ProgramStore<'a> {
    pool: &'a DB,
}

impl<'a> ProgramStore<'a> {
    pub fn new(pool: &'a DB) -> Self {
        Self { pool }
    }

    /// Inserts a program that has never been stored, or overwrites the row
    /// with its id. Returns the (possibly new) id.
    pub async fn upsert(&self, program: &Program) -> Result<ProgramId> {
        let days = days_to_json(&program.days)?;
        let last = program.most_recent_workout_date.map(ts_to_text);

        if !program.id.is_assigned() {
            let res = sqlx::query(
                r#"INSERT INTO programs
                     (name, days, followed, next_day, week_streak, most_recent_workout_date)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            )
            .bind(&program.name)
            .bind(&days)
            .bind(program.followed)
            .bind(program.next_day as i64)
            .bind(program.week_streak as i64)
            .bind(last)
            .execute(self.pool)
            .await?;

            let id = ProgramId(res.last_insert_rowid());
            tracing::info!(%id, name = %program.name, "program created");
            return Ok(id);
        }

        sqlx::query(
            r#"INSERT INTO programs
                 (id, name, days, followed, next_day, week_streak, most_recent_workout_date)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
               ON CONFLICT(id) DO UPDATE SET
                 name = excluded.name,
                 days = excluded.days,
                 followed = excluded.followed,
                 next_day = excluded.next_day,
                 week_streak = excluded.week_streak,
                 most_recent_workout_date = excluded.most_recent_workout_date"#,
        )
        .bind(program.id.0)
        .bind(&program.name)
        .bind(&days)
        .bind(program.followed)
        .bind(program.next_day as i64)
        .bind(program.week_streak as i64)
        .bind(last)
        .execute(self.pool)
        .await?;

        tracing::debug!(id = %program.id, "program updated");
        Ok(program.id)
    }

    pub async fn delete(&self, program: &Program) -> Result<()> {
        let res = sqlx::query("DELETE FROM programs WHERE id = ?")
            .bind(program.id.0)
            .execute(self.pool)
            .await?;
        tracing::info!(id = %program.id, removed = res.rows_affected(), "program deleted");
        Ok(())
    }

    pub async fn get_by_id(&self, id: ProgramId) -> Result<Option<Program>> {
        let row = sqlx::query("SELECT * FROM programs WHERE id = ?")
            .bind(id.0)
            .fetch_optional(self.pool)
            .await?;
        row.as_ref().map(program_from_row).transpose()
    }

    /// Most recently trained first; programs never trained come last.
    pub async fn list_all(&self) -> Result<Vec<Program>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM programs
            ORDER  BY most_recent_workout_date IS NULL,
                      most_recent_workout_date DESC,
                      id
            "#,
        )
        .fetch_all(self.pool)
        .await?;
        rows.iter().map(program_from_row).collect()
    }

    pub async fn list_followed(&self) -> Result<Vec<Program>> {
        let rows = sqlx::query("SELECT * FROM programs WHERE followed = 1 ORDER BY id")
            .fetch_all(self.pool)
            .await?;
        rows.iter().map(program_from_row).collect()
    }

    /// Marks `id` as the followed program and unfollows every other one.
    pub async fn follow(&self, id: ProgramId) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM programs WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            tx.rollback().await?;
            return Err(anyhow!("no program with id {id}"));
        }

        sqlx::query("UPDATE programs SET followed = (id = ?)")
            .bind(id.0)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!(%id, "program followed");
        Ok(())
    }
}

fn program_from_row(row: &SqliteRow) -> Result<Program> {
    let days: String = row.try_get("days")?;
    let days: Vec<Day> = serde_json::from_str(&days).context("parsing stored days")?;
    let last: Option<String> = row.try_get("most_recent_workout_date")?;
    let next_day: i64 = row.try_get("next_day")?;
    let week_streak: i64 = row.try_get("week_streak")?;

    Ok(Program {
        id: ProgramId(row.try_get("id")?),
        name: row.try_get("name")?,
        days,
        followed: row.try_get("followed")?,
        next_day: usize::try_from(next_day).unwrap_or_default(),
        week_streak: u32::try_from(week_streak).unwrap_or_default(),
        most_recent_workout_date: last.as_deref().map(ts_from_text).transpose()?,
    })
}

pub struct HistoryStore<'a> {
    pool: &'a DB,
}

impl<'a> HistoryStore<'a> {
    pub fn new(pool: &'a DB) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, record: &HistoryRecord) -> Result<HistoryId> {
        check_day(&record.day)?;
        let day = serde_json::to_string(&record.day).context("serializing day")?;
        let id = (record.id.is_assigned()).then_some(record.id.0);

        let res = sqlx::query(
            r#"INSERT INTO history (id, program_id, day_index, day, phase, date, start_time)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
               ON CONFLICT(id) DO UPDATE SET
                 program_id = excluded.program_id,
                 day_index = excluded.day_index,
                 day = excluded.day,
                 phase = excluded.phase,
                 date = excluded.date,
                 start_time = excluded.start_time"#,
        )
        .bind(id)
        .bind(record.program_id.0)
        .bind(record.day_index as i64)
        .bind(&day)
        .bind(record.phase.to_string())
        .bind(record.date.to_string())
        .bind(ts_to_text(record.start_time))
        .execute(self.pool)
        .await?;

        let id = if record.id.is_assigned() {
            record.id
        } else {
            HistoryId(res.last_insert_rowid())
        };
        tracing::debug!(%id, phase = %record.phase, "history record stored");
        Ok(id)
    }

    /// Overwrites a record that is already stored.
    pub async fn update(&self, record: &HistoryRecord) -> Result<()> {
        check_day(&record.day)?;
        let day = serde_json::to_string(&record.day).context("serializing day")?;
        let res = sqlx::query(
            r#"UPDATE history
               SET program_id = ?1, day_index = ?2, day = ?3, phase = ?4, date = ?5,
                   start_time = ?6
               WHERE id = ?7"#,
        )
        .bind(record.program_id.0)
        .bind(record.day_index as i64)
        .bind(&day)
        .bind(record.phase.to_string())
        .bind(record.date.to_string())
        .bind(ts_to_text(record.start_time))
        .bind(record.id.0)
        .execute(self.pool)
        .await?;

        if res.rows_affected() == 0 {
            anyhow::bail!("no history record with id {}", record.id);
        }
        Ok(())
    }

    /// The in-progress session, if any. Should more than one exist, the most
    /// recently started wins.
    pub async fn get_unfinished(&self) -> Result<Option<HistoryRecord>> {
        let row = sqlx::query(
            "SELECT * FROM history WHERE phase = ? ORDER BY start_time DESC, id DESC LIMIT 1",
        )
        .bind(WorkoutPhase::During.to_string())
        .fetch_optional(self.pool)
        .await?;
        row.as_ref().map(history_from_row).transpose()
    }

    pub async fn get_by_id(&self, id: HistoryId) -> Result<Option<HistoryRecord>> {
        let row = sqlx::query("SELECT * FROM history WHERE id = ?")
            .bind(id.0)
            .fetch_optional(self.pool)
            .await?;
        row.as_ref().map(history_from_row).transpose()
    }

    /// Newest session first.
    pub async fn list_all(&self) -> Result<Vec<HistoryRecord>> {
        let rows = sqlx::query("SELECT * FROM history ORDER BY start_time DESC, id DESC")
            .fetch_all(self.pool)
            .await?;
        rows.iter().map(history_from_row).collect()
    }

    pub async fn delete(&self, id: HistoryId) -> Result<bool> {
        let res = sqlx::query("DELETE FROM history WHERE id = ?")
            .bind(id.0)
            .execute(self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

fn history_from_row(row: &SqliteRow) -> Result<HistoryRecord> {
    let day: String = row.try_get("day")?;
    let phase: String = row.try_get("phase")?;
    let date: String = row.try_get("date")?;
    let start: String = row.try_get("start_time")?;
    let day_index: i64 = row.try_get("day_index")?;

    Ok(HistoryRecord {
        id: HistoryId(row.try_get("id")?),
        program_id: ProgramId(row.try_get("program_id")?),
        day_index: usize::try_from(day_index).unwrap_or_default(),
        day: serde_json::from_str(&day).context("parsing stored day")?,
        phase: phase.parse()?,
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .with_context(|| format!("bad date `{date}`"))?,
        start_time: ts_from_text(&start)?,
    })
}

/// The exercise catalog. Names are unique ignoring case.
pub struct LibraryStore<'a> {
    pool: &'a DB,
}

impl<'a> LibraryStore<'a> {
    pub fn new(pool: &'a DB) -> Self {
        Self { pool }
    }

    /// Adds `entry` unless an exercise with the same name exists. Returns
    /// whether a row was inserted.
    pub async fn add(&self, entry: &LibraryExercise) -> Result<bool> {
        let res = sqlx::query(
            r#"INSERT OR IGNORE INTO library (name, category, intensity)
               VALUES (?1, ?2, ?3)"#,
        )
        .bind(entry.name.trim())
        .bind(entry.category.to_string())
        .bind(entry.intensity.map(|i| i.to_string()))
        .execute(self.pool)
        .await
        .with_context(|| format!("inserting `{}`", entry.name))?;

        let added = res.rows_affected() == 1;
        tracing::debug!(name = %entry.name, added, "library entry stored");
        Ok(added)
    }

    pub async fn remove(&self, name: &str) -> Result<bool> {
        let res = sqlx::query("DELETE FROM library WHERE name = ?")
            .bind(name.trim())
            .execute(self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn find(&self, name: &str) -> Result<Option<LibraryExercise>> {
        let row = sqlx::query("SELECT * FROM library WHERE name = ?")
            .bind(name.trim())
            .fetch_optional(self.pool)
            .await?;
        row.as_ref().map(library_from_row).transpose()
    }

    /// In insertion order.
    pub async fn list(&self) -> Result<Vec<LibraryExercise>> {
        let rows = sqlx::query("SELECT * FROM library ORDER BY id")
            .fetch_all(self.pool)
            .await?;
        rows.iter().map(library_from_row).collect()
    }
}

fn library_from_row(row: &SqliteRow) -> Result<LibraryExercise> {
    let category: String = row.try_get("category")?;
    let intensity: Option<String> = row.try_get("intensity")?;

    Ok(LibraryExercise {
        name: row.try_get("name")?,
        category: PerformanceVariableCategory::from_str(&category, true).map_err(|e| anyhow!(e))?,
        intensity: intensity
            .as_deref()
            .map(|i| IntensityCategory::from_str(i, true).map_err(|e| anyhow!(e)))
            .transpose()?,
    })
}
