use std::path::Path;

use anyhow::{Context, Result};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

pub type DB = SqlitePool;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS programs (
    id                       INTEGER PRIMARY KEY AUTOINCREMENT,
    name                     TEXT    NOT NULL,
    days                     TEXT    NOT NULL,
    followed                 INTEGER NOT NULL DEFAULT 0,
    next_day                 INTEGER NOT NULL DEFAULT 0,
    week_streak              INTEGER NOT NULL DEFAULT 0,
    most_recent_workout_date TEXT
);

CREATE TABLE IF NOT EXISTS history (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    program_id INTEGER NOT NULL,
    day_index  INTEGER NOT NULL DEFAULT 0,
    day        TEXT    NOT NULL,
    phase      TEXT    NOT NULL,
    date       TEXT    NOT NULL,
    start_time TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS history_phase ON history(phase);

CREATE TABLE IF NOT EXISTS library (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    name      TEXT    NOT NULL UNIQUE COLLATE NOCASE,
    category  TEXT    NOT NULL,
    intensity TEXT
);
"#;

/// Opens (creating if needed) the database at `path` and makes sure the
/// schema exists.
pub async fn open(path: &Path) -> Result<DB> {
    let opts = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .with_context(|| format!("opening database `{}`", path.display()))?;

    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &DB) -> Result<()> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .context("creating schema")?;
    tracing::debug!("schema ready");
    Ok(())
}
