use thiserror::Error;

use crate::types::{PerformanceVariableCategory, WorkoutPhase};

/// Failures of the program model. An operation that returns one of these
/// leaves its receiver untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("index {index} is out of range for {len} element(s)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("set is measured in {found} but the exercise expects {expected}")]
    CategoryMismatch {
        expected: PerformanceVariableCategory,
        found: PerformanceVariableCategory,
    },

    #[error("cannot move a workout from `{from}` to `{to}`")]
    InvalidPhaseTransition { from: WorkoutPhase, to: WorkoutPhase },

    #[error("invalid value: {0}")]
    InvalidValue(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
