pub mod cli;
pub mod commands;
pub mod db;
pub mod editor;
pub mod error;
pub mod models;
pub mod program;
pub mod settings;
pub mod storage;
pub mod types;
pub mod utils;

pub use error::{ModelError, ModelResult};
pub use models::{
    Day, Exercise, ExerciseSet, HistoryId, HistoryRecord, LibraryExercise, PerformanceValue,
    Program, ProgramId,
};
pub use types::{IntensityCategory, OutputFmt, PerformanceVariableCategory, WorkoutPhase};
