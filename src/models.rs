use std::fmt::Display;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{ModelError, ModelResult},
    types::{IntensityCategory, PerformanceVariableCategory, WorkoutPhase},
};

/// Store-assigned program identity. `0` until the program is first persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(pub i64);

impl ProgramId {
    pub const UNASSIGNED: Self = Self(0);

    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }
}

impl Display for ProgramId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryId(pub i64);

impl HistoryId {
    pub const UNASSIGNED: Self = Self(0);

    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }
}

impl Display for HistoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, ordered collection of training days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub id: ProgramId,
    pub name: String,
    pub days: Vec<Day>,
    #[serde(default)]
    pub followed: bool,
    #[serde(default)]
    pub next_day: usize,
    #[serde(default)]
    pub week_streak: u32,
    #[serde(default)]
    pub most_recent_workout_date: Option<DateTime<Utc>>,
}

/// The exercises performed in one session. An empty day is a rest day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub category: PerformanceVariableCategory,
    #[serde(default)]
    pub intensity: Option<IntensityCategory>,
    #[serde(default)]
    pub sets: Vec<ExerciseSet>,
    /// Position of the exercise this one is supersetted with, in the same day.
    #[serde(default)]
    pub superset: Option<usize>,
    /// Positions of interchangeable exercises, in the same day.
    #[serde(default)]
    pub alternatives: Vec<usize>,
}

/// Target or achieved performance. The variant always matches the owning
/// exercise's [`PerformanceVariableCategory`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PerformanceValue {
    Reps { count: u32 },
    Time { minutes: f64 },
    RepRange { min: u32, max: u32 },
}

impl PerformanceValue {
    pub fn zero(category: PerformanceVariableCategory) -> Self {
        match category {
            PerformanceVariableCategory::Reps => Self::Reps { count: 0 },
            PerformanceVariableCategory::RepRange => Self::RepRange { min: 0, max: 0 },
            PerformanceVariableCategory::Time => Self::Time { minutes: 0.0 },
        }
    }

    pub fn category(&self) -> PerformanceVariableCategory {
        match self {
            Self::Reps { .. } => PerformanceVariableCategory::Reps,
            Self::RepRange { .. } => PerformanceVariableCategory::RepRange,
            Self::Time { .. } => PerformanceVariableCategory::Time,
        }
    }

    /// Parses user input for the given category: `8` for reps, `8-12` for a
    /// rep range and `1.5` (minutes) for time.
    pub fn parse(category: PerformanceVariableCategory, text: &str) -> ModelResult<Self> {
        let raw = text.trim();
        let bad = || ModelError::InvalidValue(format!("`{raw}` is not a valid {category} value"));

        match category {
            PerformanceVariableCategory::Reps => {
                let count = raw.parse::<u32>().map_err(|_| bad())?;
                Ok(Self::Reps { count })
            }
            PerformanceVariableCategory::RepRange => {
                let (lo, hi) = raw.split_once('-').ok_or_else(bad)?;
                let min = lo.trim().parse::<u32>().map_err(|_| bad())?;
                let max = hi.trim().parse::<u32>().map_err(|_| bad())?;
                if min > max {
                    return Err(bad());
                }
                Ok(Self::RepRange { min, max })
            }
            PerformanceVariableCategory::Time => {
                let minutes = raw.trim_end_matches('m').parse::<f64>().map_err(|_| bad())?;
                if !minutes.is_finite() || minutes < 0.0 {
                    return Err(bad());
                }
                Ok(Self::Time { minutes })
            }
        }
    }

    /// Rejects values that could not be stored and read back: durations that
    /// are negative or not finite, and inverted rep ranges.
    pub fn check(&self) -> ModelResult<()> {
        match *self {
            Self::Time { minutes } if !minutes.is_finite() || minutes < 0.0 => Err(
                ModelError::InvalidValue(format!("{minutes} is not a valid duration")),
            ),
            Self::RepRange { min, max } if min > max => Err(ModelError::InvalidValue(format!(
                "rep range {min}-{max} is inverted"
            ))),
            _ => Ok(()),
        }
    }
}

impl Display for PerformanceValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reps { count } => write!(f, "{} reps", count),
            Self::RepRange { min, max } => write!(f, "{}-{} reps", min, max),
            Self::Time { minutes } => write!(f, "{} min", minutes),
        }
    }
}

/// One planned or recorded attempt at an exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    pub target: PerformanceValue,
    pub actual: PerformanceValue,
    #[serde(default)]
    pub intensity: Option<f32>,
    #[serde(default)]
    pub weight: f32,
    /// `None` until the set has been performed.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ExerciseSet {
    pub fn for_category(category: PerformanceVariableCategory) -> Self {
        Self {
            target: PerformanceValue::zero(category),
            actual: PerformanceValue::zero(category),
            intensity: None,
            weight: 0.0,
            completed_at: None,
        }
    }

    pub fn category(&self) -> PerformanceVariableCategory {
        self.target.category()
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Both values must be valid, the weight a non-negative number and the
    /// intensity reading finite.
    pub fn check(&self) -> ModelResult<()> {
        self.target.check()?;
        self.actual.check()?;
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(ModelError::InvalidValue(format!(
                "weight {} must be a non-negative number",
                self.weight
            )));
        }
        if let Some(i) = self.intensity.filter(|i| !i.is_finite()) {
            return Err(ModelError::InvalidValue(format!("intensity {i} is not a number")));
        }
        Ok(())
    }
}

/// A catalog entry that `exercise add` can take its defaults from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryExercise {
    pub name: String,
    #[serde(default)]
    pub category: PerformanceVariableCategory,
    #[serde(default)]
    pub intensity: Option<IntensityCategory>,
}

impl LibraryExercise {
    pub fn new(name: impl Into<String>, category: PerformanceVariableCategory) -> Self {
        Self {
            name: name.into(),
            category,
            intensity: None,
        }
    }
}

/// Snapshot of a day as it was (or is being) performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub id: HistoryId,
    pub program_id: ProgramId,
    /// Position of `day` in the program when the session started.
    #[serde(default)]
    pub day_index: usize,
    pub day: Day,
    pub phase: WorkoutPhase,
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
}

impl HistoryRecord {
    /// Opens an in-progress record for `day`, the `day_index`-th day of the
    /// program.
    pub fn start(program_id: ProgramId, day_index: usize, day: Day, at: DateTime<Utc>) -> Self {
        Self {
            id: HistoryId::UNASSIGNED,
            program_id,
            day_index,
            day,
            phase: WorkoutPhase::During,
            date: at.date_naive(),
            start_time: at,
        }
    }

    pub fn is_unfinished(&self) -> bool {
        self.phase == WorkoutPhase::During
    }

    pub fn with_day(&self, day: Day) -> Self {
        Self {
            day,
            ..self.clone()
        }
    }

    /// The only transition a record ever makes: `During` to `After`.
    pub fn finished(&self) -> ModelResult<Self> {
        if self.phase != WorkoutPhase::During {
            return Err(ModelError::InvalidPhaseTransition {
                from: self.phase,
                to: WorkoutPhase::After,
            });
        }

        Ok(Self {
            phase: WorkoutPhase::After,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn default_set_matches_category() {
        let set = ExerciseSet::for_category(PerformanceVariableCategory::RepRange);
        assert_eq!(set.target, PerformanceValue::RepRange { min: 0, max: 0 });
        assert_eq!(set.actual, PerformanceValue::RepRange { min: 0, max: 0 });
        assert!(!set.is_completed());

        for category in [
            PerformanceVariableCategory::Reps,
            PerformanceVariableCategory::RepRange,
            PerformanceVariableCategory::Time,
        ] {
            assert_eq!(ExerciseSet::for_category(category).category(), category);
        }
    }

    #[test]
    fn parses_values_per_category() {
        use PerformanceVariableCategory::*;

        assert_eq!(
            PerformanceValue::parse(Reps, "8").unwrap(),
            PerformanceValue::Reps { count: 8 }
        );
        assert_eq!(
            PerformanceValue::parse(RepRange, "8 - 12").unwrap(),
            PerformanceValue::RepRange { min: 8, max: 12 }
        );
        assert_eq!(
            PerformanceValue::parse(Time, "1.5m").unwrap(),
            PerformanceValue::Time { minutes: 1.5 }
        );

        assert!(PerformanceValue::parse(Reps, "8-12").is_err());
        assert!(PerformanceValue::parse(RepRange, "12-8").is_err());
        assert!(PerformanceValue::parse(Time, "-3").is_err());
        assert!(matches!(
            PerformanceValue::parse(Reps, "lots"),
            Err(ModelError::InvalidValue(_))
        ));
    }

    #[test]
    fn history_record_only_finishes_from_during() {
        let at = Utc.with_ymd_and_hms(2024, 3, 4, 18, 30, 0).unwrap();
        let record = HistoryRecord::start(ProgramId(7), 2, Day::new("Legs"), at);
        assert!(record.is_unfinished());
        assert_eq!(record.day_index, 2);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());

        let done = record.finished().unwrap();
        assert_eq!(done.phase, WorkoutPhase::After);
        assert_eq!(record.phase, WorkoutPhase::During);

        assert_eq!(
            done.finished(),
            Err(ModelError::InvalidPhaseTransition {
                from: WorkoutPhase::After,
                to: WorkoutPhase::After,
            })
        );
    }

    #[test]
    fn sets_that_cannot_round_trip_are_rejected() {
        let set = ExerciseSet::for_category(PerformanceVariableCategory::Reps);
        assert_eq!(set.check(), Ok(()));

        for weight in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN, -2.5] {
            let bad = ExerciseSet { weight, ..set.clone() };
            assert!(matches!(bad.check(), Err(ModelError::InvalidValue(_))), "{weight}");
        }

        let bad = ExerciseSet {
            intensity: Some(f32::NAN),
            ..set.clone()
        };
        assert!(matches!(bad.check(), Err(ModelError::InvalidValue(_))));

        let bad = ExerciseSet {
            target: PerformanceValue::Time { minutes: f64::INFINITY },
            actual: PerformanceValue::Time { minutes: 0.0 },
            ..set.clone()
        };
        assert!(bad.check().is_err());

        let inverted = PerformanceValue::RepRange { min: 12, max: 8 };
        assert!(inverted.check().is_err());
    }

    #[test]
    fn library_entry_defaults_to_reps() {
        let entry: LibraryExercise = serde_json::from_str(r#"{"name":"Bench"}"#).unwrap();
        assert_eq!(entry, LibraryExercise::new("Bench", PerformanceVariableCategory::Reps));
    }

    #[test]
    fn ids_start_unassigned() {
        assert!(!ProgramId::default().is_assigned());
        assert!(ProgramId(3).is_assigned());
        assert!(!HistoryId::default().is_assigned());
    }
}
