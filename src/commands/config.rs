use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;

use crate::{
    cli::ConfigCmd,
    settings::Settings,
    types::{OutputFmt, Theme, UnitSystem, emit},
};

const KEYS: [&str; 2] = ["unit_system", "theme"];

fn get(cfg: &Settings, key: &str) -> Option<String> {
    match key {
        "unit_system" => Some(cfg.unit_system.to_string()),
        "theme" => Some(cfg.theme.to_string()),
        _ => None,
    }
}

/// Applies `key = val`. Returns a message describing what went wrong.
fn set(cfg: &mut Settings, key: &str, val: &str) -> Result<(), String> {
    match key {
        "unit_system" => cfg.unit_system = UnitSystem::from_str(val, true)?,
        "theme" => cfg.theme = Theme::from_str(val, true)?,
        _ => return Err(format!("unknown key `{key}` (expected one of: {})", KEYS.join(", "))),
    }
    Ok(())
}

pub fn handle(cmd: ConfigCmd, config_path: &Path, fmt: OutputFmt) -> Result<()> {
    let mut cfg = Settings::load(config_path)?;

    match cmd {
        ConfigCmd::List => emit(fmt, &cfg, || {
            println!("{}", "Config:".cyan().bold());
            for key in KEYS {
                if let Some(v) = get(&cfg, key) {
                    println!("  {} = {}", key.green(), v);
                }
            }
        }),

        ConfigCmd::Get { key } => match get(&cfg, &key) {
            Some(val) => println!("{}", val),
            None => println!("{} key `{}` not found", "warning:".yellow().bold(), key),
        },

        ConfigCmd::Set { key, val } => match set(&mut cfg, &key, &val) {
            Ok(()) => {
                cfg.save(config_path)?;
                println!("{} set `{}` = `{}`", "info:".blue().bold(), key.green(), val);
            }
            Err(msg) => println!("{} {}", "error:".red().bold(), msg),
        },

        ConfigCmd::Unset { key } => {
            let defaults = Settings::default();
            match get(&defaults, &key) {
                Some(val) => {
                    set(&mut cfg, &key, &val).map_err(anyhow::Error::msg)?;
                    cfg.save(config_path)?;
                    println!("{} reset `{}` to `{}`", "info:".blue().bold(), key.green(), val);
                }
                None => println!("{} key `{}` not found", "warning:".yellow().bold(), key),
            }
        }
    }

    Ok(())
}
