use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{IntensityCategory, PerformanceVariableCategory};

#[derive(Parser)]
#[command(name = "liftplan", version, about = "Build training programs and log workouts")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Emit machine-readable JSON instead of colorful text.
    #[arg(global = true, long)]
    pub json: bool,

    /// Database file
    #[arg(global = true, long, env = "LIFTPLAN_DB", default_value = "./liftplan.db")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Program management
    #[command(subcommand, visible_alias = "p")]
    Program(ProgramCmd),

    /// Edit the days of a program
    #[command(subcommand, visible_alias = "d")]
    Day(DayCmd),

    /// Edit the exercises of a program day
    #[command(subcommand, visible_alias = "ex")]
    Exercise(ExerciseCmd),

    /// Manage the exercise library
    #[command(subcommand, visible_alias = "lib")]
    Library(LibraryCmd),

    /// Edit the planned sets of an exercise
    #[command(subcommand)]
    Set(SetCmd),

    /// Session-scoped commands
    #[command(subcommand, visible_alias = "s")]
    Session(SessionCmd),

    /// Browse finished workouts
    #[command(subcommand, visible_alias = "h")]
    History(HistoryCmd),

    /// View or edit liftplan settings
    #[command(subcommand)]
    Config(ConfigCmd),

    /// Export or import everything as JSON
    #[command(subcommand)]
    Data(DataCmd),
}

//
// Commands
//

/// Weights are entered in the configured unit and must be non-negative.
fn parse_weight(s: &str) -> Result<f32, String> {
    match s.parse::<f32>() {
        Ok(w) if w.is_finite() && w >= 0.0 => Ok(w),
        _ => Err(format!("`{s}` is not a valid weight")),
    }
}

fn parse_intensity(s: &str) -> Result<f32, String> {
    match s.parse::<f32>() {
        Ok(i) if i.is_finite() => Ok(i),
        _ => Err(format!("`{s}` is not a valid intensity")),
    }
}

#[derive(Subcommand)]
pub enum ProgramCmd {
    /// Create a program with a single empty "Day 1"
    #[command(visible_alias = "n")]
    New { name: String },

    /// List programs, most recently trained first
    #[command(visible_alias = "l")]
    List,

    /// Show a single program in detail
    #[command(visible_alias = "s")]
    Show {
        /// Program index (from `p list`) or exact name
        program: String,
    },

    /// Rename a program
    #[command(visible_alias = "r")]
    Rename { program: String, name: String },

    /// Delete a program
    #[command(visible_alias = "del")]
    Delete { program: String },

    /// Follow a program (unfollows every other one)
    #[command(visible_alias = "f")]
    Follow { program: String },
}

#[derive(Subcommand)]
pub enum DayCmd {
    /// Append a day to a program
    #[command(visible_alias = "a")]
    Add { program: String, name: String },

    /// Remove the day at the given position
    #[command(visible_alias = "rm")]
    Remove {
        program: String,
        /// 1-based day index (same order shown in `p show`)
        day: usize,
    },

    /// Rename a day, keeping its exercises
    #[command(visible_alias = "r")]
    Rename {
        program: String,
        day: usize,
        name: String,
    },
}

/// Addresses one day of one program.
#[derive(Args, Clone)]
pub struct DayRef {
    /// Program index (from `p list`) or exact name
    pub program: String,
    /// 1-based day index
    pub day: usize,
}

#[derive(Subcommand)]
pub enum ExerciseCmd {
    /// Add an exercise to a day
    #[command(visible_alias = "a")]
    Add {
        #[command(flatten)]
        at: DayRef,

        /// Exercise name; a library entry with this name supplies defaults
        name: String,

        /// How the target is measured (library entry or `reps` when omitted)
        #[arg(short, long, value_enum)]
        category: Option<PerformanceVariableCategory>,

        /// Intensity scale tracked per set (library entry when omitted)
        #[arg(short, long, value_enum)]
        intensity: Option<IntensityCategory>,

        /// Number of planned sets
        #[arg(short, long, default_value = "3")]
        sets: usize,

        /// Target for every set: `8`, `8-12` or `1.5` (minutes)
        #[arg(short, long)]
        target: Option<String>,
    },

    /// Remove the exercise at the given position
    #[command(visible_alias = "rm")]
    Remove {
        #[command(flatten)]
        at: DayRef,
        /// 1-based exercise index
        exercise: usize,
    },

    /// Change an exercise's name, category, intensity or relations
    #[command(visible_alias = "e")]
    Edit {
        #[command(flatten)]
        at: DayRef,
        exercise: usize,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long, value_enum)]
        category: Option<PerformanceVariableCategory>,

        #[arg(short, long, value_enum)]
        intensity: Option<IntensityCategory>,

        /// Drop the intensity scale
        #[arg(long, conflicts_with = "intensity")]
        no_intensity: bool,

        /// 1-based index of the exercise to superset with (0 clears it)
        #[arg(long)]
        superset: Option<usize>,

        /// 1-based indices of alternative exercises (replaces the list)
        #[arg(long, num_args = 0.., value_delimiter = ',')]
        alternatives: Option<Vec<usize>>,
    },
}

#[derive(Subcommand)]
pub enum SetCmd {
    /// Append a planned set
    #[command(visible_alias = "a")]
    Add {
        #[command(flatten)]
        at: DayRef,
        exercise: usize,

        #[arg(short, long)]
        target: Option<String>,

        #[arg(short, long, value_parser = parse_weight)]
        weight: Option<f32>,
    },

    /// Remove the planned set at the given position
    #[command(visible_alias = "rm")]
    Remove {
        #[command(flatten)]
        at: DayRef,
        exercise: usize,
        set: usize,
    },

    /// Change a planned set's target or weight
    #[command(visible_alias = "e")]
    Edit {
        #[command(flatten)]
        at: DayRef,
        exercise: usize,
        set: usize,

        #[arg(short, long)]
        target: Option<String>,

        #[arg(short, long, value_parser = parse_weight)]
        weight: Option<f32>,
    },
}

#[derive(Subcommand)]
pub enum SessionCmd {
    /// Start a session
    #[command(visible_alias = "s")]
    Start {
        /// Program index or name (defaults to the followed program)
        program: Option<String>,

        /// 1-based day to train (defaults to the program's next day)
        #[arg(short, long)]
        day: Option<usize>,
    },

    /// Cancel the current session
    #[command(visible_alias = "c")]
    Cancel,

    /// Show current session details
    #[command(visible_alias = "i")]
    Show,

    /// Finish the current session
    End,

    /// Record a set in the current session - Usage: session log EXERCISE SET ACTUAL
    #[command(visible_alias = "l")]
    #[command(override_usage = "session log <EXERCISE> <SET> <ACTUAL>")]
    Log {
        /// Exercise index
        #[arg(value_name = "EXERCISE")]
        exercise: usize,

        /// Set index; one past the last set appends a new one
        #[arg(value_name = "SET")]
        set: usize,

        /// Achieved value: `8`, `8-12` or `1.5` (minutes)
        #[arg(value_name = "ACTUAL")]
        actual: String,

        /// Weight in the configured unit
        #[arg(short, long, value_parser = parse_weight)]
        weight: Option<f32>,

        /// Intensity reading (RPE/RIR)
        #[arg(short, long, value_parser = parse_intensity)]
        intensity: Option<f32>,
    },
}

#[derive(Subcommand)]
pub enum LibraryCmd {
    /// Add an exercise to the library
    #[command(visible_alias = "a")]
    Add {
        name: String,

        #[arg(short, long, value_enum, default_value = "reps")]
        category: PerformanceVariableCategory,

        #[arg(short, long, value_enum)]
        intensity: Option<IntensityCategory>,
    },

    /// List library exercises
    #[command(visible_alias = "l")]
    List,

    /// Remove an exercise from the library
    #[command(visible_alias = "rm")]
    Remove { name: String },

    /// Import exercises from a TOML file of `[[exercise]]` entries
    #[command(visible_alias = "i")]
    Import { file: PathBuf },
}

#[derive(Subcommand)]
pub enum HistoryCmd {
    /// List recorded sessions, newest first
    #[command(visible_alias = "l")]
    List,

    /// Show one recorded session
    #[command(visible_alias = "s")]
    Show { id: i64 },

    /// Show training sessions in a calendar view
    #[command(visible_alias = "cal")]
    Calendar {
        /// Year to show (defaults to current year)
        #[arg(short, long)]
        year: Option<i32>,

        /// Month to show (1-12, defaults to current month)
        #[arg(short, long)]
        month: Option<u32>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Show all config keys
    List,

    /// Get the value of a key
    Get { key: String },

    /// Set or override a key
    Set { key: String, val: String },

    /// Reset a key to its default
    Unset { key: String },
}

#[derive(Subcommand)]
pub enum DataCmd {
    /// Export programs, history and settings to a JSON file
    Export {
        /// Output file path (defaults to liftplan-export.json)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Import programs and history from a JSON export
    Import {
        /// Input JSON file path
        file: PathBuf,
    },
}
