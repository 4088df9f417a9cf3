use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use liftplan::{
    cli::{Cli, Commands},
    commands,
    db::open,
    settings::Settings,
    types::OutputFmt,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let fmt = OutputFmt::from_flag(cli.json);

    let settings_path = Settings::default_path()?;
    let settings = Settings::load(&settings_path);
    if let Ok(s) = &settings {
        s.theme.apply();
    }

    match cli.cmd {
        // Settings don't need the database.
        Commands::Config(cmd) => commands::config::handle(cmd, &settings_path, fmt)?,
        cmd => run(cmd, &cli.db, &settings_path, settings?, fmt).await?,
    }

    Ok(())
}

async fn run(
    cmd: Commands,
    db_path: &Path,
    settings_path: &Path,
    settings: Settings,
    fmt: OutputFmt,
) -> Result<()> {
    let pool = open(db_path).await?;
    tracing::debug!(db = %db_path.display(), "database open");

    match cmd {
        Commands::Program(cmd) => commands::program::handle(cmd, &pool, fmt).await,
        Commands::Day(cmd) => commands::program::handle_day(cmd, &pool).await,
        Commands::Exercise(cmd) => commands::exercise::handle(cmd, &pool).await,
        Commands::Library(cmd) => commands::library::handle(cmd, &pool, fmt).await,
        Commands::Set(cmd) => commands::exercise::handle_set(cmd, &pool, &settings).await,
        Commands::Session(cmd) => commands::session::handle(cmd, &pool, &settings, fmt).await,
        Commands::History(cmd) => commands::history::handle(cmd, &pool, &settings, fmt).await,
        Commands::Data(cmd) => commands::data::handle(cmd, &pool, &settings).await,
        Commands::Config(cmd) => commands::config::handle(cmd, settings_path, fmt),
    }
}
