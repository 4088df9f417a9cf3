//! Immutable editing operations over [`Program`], [`Day`] and [`Exercise`].
//!
//! Every operation takes `&self` and returns a fresh value; the receiver is
//! never touched, including when an operation fails.

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, Utc};

use crate::{
    error::{ModelError, ModelResult},
    models::{Day, Exercise, ExerciseSet, PerformanceValue, Program},
    types::{IntensityCategory, PerformanceVariableCategory},
};

/// `result[i] = if i == index { new } else { items[i] }`.
fn replaced_at<T: Clone>(items: &[T], index: usize, new: T) -> ModelResult<Vec<T>> {
    if index >= items.len() {
        return Err(ModelError::IndexOutOfRange {
            index,
            len: items.len(),
        });
    }

    let mut out = items.to_vec();
    out[index] = new;
    Ok(out)
}

fn removed_at<T: Clone>(items: &[T], index: usize) -> ModelResult<Vec<T>> {
    if index >= items.len() {
        return Err(ModelError::IndexOutOfRange {
            index,
            len: items.len(),
        });
    }

    let mut out = Vec::with_capacity(items.len() - 1);
    out.extend_from_slice(&items[..index]);
    out.extend_from_slice(&items[index + 1..]);
    Ok(out)
}

fn first_position<T: PartialEq>(items: &[T], value: &T) -> Option<usize> {
    items.iter().position(|item| item == value)
}

fn appended<T: Clone>(items: &[T], value: T) -> Vec<T> {
    let mut out = Vec::with_capacity(items.len() + 1);
    out.extend_from_slice(items);
    out.push(value);
    out
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Default::default(),
            name: name.into(),
            days: Vec::new(),
            followed: false,
            next_day: 0,
            week_streak: 0,
            most_recent_workout_date: None,
        }
    }

    /// What a freshly opened "create program" form starts with.
    pub fn new_draft() -> Self {
        Self::new("").with_day_added(Day::new("Day 1"))
    }

    pub fn with_name(&self, new_name: impl Into<String>) -> Self {
        Self {
            name: new_name.into(),
            ..self.clone()
        }
    }

    pub fn with_followed(&self, followed: bool) -> Self {
        Self {
            followed,
            ..self.clone()
        }
    }

    pub fn with_day_added(&self, day: Day) -> Self {
        Self {
            days: appended(&self.days, day),
            ..self.clone()
        }
    }

    /// Removes the first day structurally equal to `day`; a no-op when there
    /// is none.
    pub fn with_day_removed(&self, day: &Day) -> Self {
        match first_position(&self.days, day) {
            Some(pos) => self.with_day_removed_at(pos).unwrap_or_else(|_| self.clone()),
            None => self.clone(),
        }
    }

    pub fn with_day_removed_at(&self, index: usize) -> ModelResult<Self> {
        let days = removed_at(&self.days, index)?;
        Ok(Self {
            next_day: clamp_cursor(self.next_day, days.len()),
            days,
            ..self.clone()
        })
    }

    pub fn with_day_replaced_at(&self, index: usize, new_day: Day) -> ModelResult<Self> {
        Ok(Self {
            days: replaced_at(&self.days, index, new_day)?,
            ..self.clone()
        })
    }

    /// The day the cursor points at, if the program has any days.
    pub fn next_day(&self) -> Option<&Day> {
        self.days.get(self.next_day)
    }

    /// Advances the cursor to the following day (wrapping), stamps the workout
    /// date and updates the weekly streak.
    pub fn with_workout_completed(&self, at: DateTime<Utc>) -> Self {
        self.with_day_trained(self.next_day, at)
    }

    /// Like [`Program::with_workout_completed`] for a workout of the day at
    /// `day`, which need not be the one the cursor pointed at. The cursor
    /// moves to the day after it.
    pub fn with_day_trained(&self, day: usize, at: DateTime<Utc>) -> Self {
        let next_day = if self.days.is_empty() {
            0
        } else {
            (day % self.days.len() + 1) % self.days.len()
        };

        Self {
            next_day,
            week_streak: next_streak(self.week_streak, self.most_recent_workout_date, at),
            most_recent_workout_date: Some(at),
            ..self.clone()
        }
    }
}

fn clamp_cursor(cursor: usize, len: usize) -> usize {
    if cursor < len { cursor } else { 0 }
}

fn next_streak(streak: u32, previous: Option<DateTime<Utc>>, at: DateTime<Utc>) -> u32 {
    let Some(previous) = previous else {
        return 1;
    };

    let prev_week = previous.date_naive().iso_week();
    let this_week = at.date_naive().iso_week();
    if (prev_week.year(), prev_week.week()) == (this_week.year(), this_week.week()) {
        return streak.max(1);
    }

    let following = (previous.date_naive() + chrono::Days::new(7)).iso_week();
    if (following.year(), following.week()) == (this_week.year(), this_week.week()) {
        streak + 1
    } else {
        1
    }
}

impl Day {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exercises: Vec::new(),
        }
    }

    pub fn with_name(&self, new_name: impl Into<String>) -> Self {
        Self {
            name: new_name.into(),
            ..self.clone()
        }
    }

    pub fn with_exercise_added(&self, exercise: Exercise) -> Self {
        Self {
            exercises: appended(&self.exercises, exercise),
            ..self.clone()
        }
    }

    /// Removes the first structurally equal exercise; a no-op when there is
    /// none. See [`Day::with_exercise_removed_at`] for what happens to
    /// relations.
    pub fn with_exercise_removed(&self, exercise: &Exercise) -> Self {
        match first_position(&self.exercises, exercise) {
            Some(pos) => self.with_exercise_removed_at(pos).unwrap_or_else(|_| self.clone()),
            None => self.clone(),
        }
    }

    /// Removes the exercise at `index`. The remaining exercises keep pointing
    /// at the same partners: later positions shift down by one and links to
    /// the removed exercise are dropped.
    pub fn with_exercise_removed_at(&self, index: usize) -> ModelResult<Self> {
        let exercises = removed_at(&self.exercises, index)?
            .iter()
            .map(|ex| ex.with_position_removed(index))
            .collect();
        Ok(Self {
            exercises,
            ..self.clone()
        })
    }

    pub fn with_exercise_replaced_at(&self, index: usize, exercise: Exercise) -> ModelResult<Self> {
        Ok(Self {
            exercises: replaced_at(&self.exercises, index, exercise)?,
            ..self.clone()
        })
    }

    /// Looks up a relation target. A reference that points past the end of
    /// the day resolves to no relation.
    pub fn resolve(&self, index: usize) -> Option<&Exercise> {
        self.exercises.get(index)
    }

    /// The exercise supersetted with the one at `index`, if that relation
    /// resolves to a different exercise of this day.
    pub fn superset_of(&self, index: usize) -> Option<&Exercise> {
        let target = self.exercises.get(index)?.superset?;
        if target == index {
            return None;
        }
        self.resolve(target)
    }

    pub fn alternatives_of(&self, index: usize) -> Vec<&Exercise> {
        let Some(exercise) = self.exercises.get(index) else {
            return Vec::new();
        };

        exercise
            .alternatives
            .iter()
            .filter(|&&alt| alt != index)
            .filter_map(|&alt| self.resolve(alt))
            .collect()
    }

    /// `(exercise, target)` pairs whose relation points outside this day.
    pub fn dangling_references(&self) -> Vec<(usize, usize)> {
        let len = self.exercises.len();
        self.exercises
            .iter()
            .enumerate()
            .flat_map(|(i, ex)| {
                ex.superset
                    .into_iter()
                    .chain(ex.alternatives.iter().copied())
                    .filter(move |&target| target >= len)
                    .map(move |target| (i, target))
            })
            .collect()
    }

    pub fn is_rest_day(&self) -> bool {
        self.exercises.is_empty()
    }
}

impl Exercise {
    pub fn new(name: impl Into<String>, category: PerformanceVariableCategory) -> Self {
        Self {
            name: name.into(),
            category,
            intensity: None,
            sets: Vec::new(),
            superset: None,
            alternatives: Vec::new(),
        }
    }

    pub fn with_name(&self, new_name: impl Into<String>) -> Self {
        Self {
            name: new_name.into(),
            ..self.clone()
        }
    }

    /// Switches the category. Every set is reset to the zero value of the new
    /// category so targets never disagree with it.
    pub fn with_category(&self, category: PerformanceVariableCategory) -> Self {
        if category == self.category {
            return self.clone();
        }

        Self {
            category,
            sets: self
                .sets
                .iter()
                .map(|set| ExerciseSet {
                    target: PerformanceValue::zero(category),
                    actual: PerformanceValue::zero(category),
                    ..set.clone()
                })
                .collect(),
            ..self.clone()
        }
    }

    pub fn with_intensity(&self, intensity: Option<IntensityCategory>) -> Self {
        Self {
            intensity,
            ..self.clone()
        }
    }

    pub fn with_superset(&self, superset: Option<usize>) -> Self {
        Self {
            superset,
            ..self.clone()
        }
    }

    pub fn with_alternatives(&self, alternatives: Vec<usize>) -> Self {
        Self {
            alternatives,
            ..self.clone()
        }
    }

    fn with_position_removed(&self, removed: usize) -> Self {
        let shift = |target: usize| match target.cmp(&removed) {
            Ordering::Less => Some(target),
            Ordering::Equal => None,
            Ordering::Greater => Some(target - 1),
        };

        Self {
            superset: self.superset.and_then(shift),
            alternatives: self.alternatives.iter().filter_map(|&t| shift(t)).collect(),
            ..self.clone()
        }
    }

    pub fn with_set_added(&self, set: ExerciseSet) -> ModelResult<Self> {
        self.check_set(&set)?;
        Ok(Self {
            sets: appended(&self.sets, set),
            ..self.clone()
        })
    }

    pub fn with_default_set_added(&self) -> Self {
        Self {
            sets: appended(&self.sets, ExerciseSet::for_category(self.category)),
            ..self.clone()
        }
    }

    pub fn with_set_removed(&self, set: &ExerciseSet) -> Self {
        match first_position(&self.sets, set) {
            Some(pos) => self.with_set_removed_at(pos).unwrap_or_else(|_| self.clone()),
            None => self.clone(),
        }
    }

    pub fn with_set_removed_at(&self, index: usize) -> ModelResult<Self> {
        Ok(Self {
            sets: removed_at(&self.sets, index)?,
            ..self.clone()
        })
    }

    pub fn with_set_replaced_at(&self, index: usize, set: ExerciseSet) -> ModelResult<Self> {
        self.check_set(&set)?;
        Ok(Self {
            sets: replaced_at(&self.sets, index, set)?,
            ..self.clone()
        })
    }

    fn check_set(&self, set: &ExerciseSet) -> ModelResult<()> {
        for value in [set.target, set.actual] {
            if value.category() != self.category {
                return Err(ModelError::CategoryMismatch {
                    expected: self.category,
                    found: value.category(),
                });
            }
        }
        set.check()
    }
}

impl ExerciseSet {
    pub fn with_target(&self, target: PerformanceValue) -> Self {
        Self {
            target,
            ..self.clone()
        }
    }

    pub fn with_actual(&self, actual: PerformanceValue) -> Self {
        Self {
            actual,
            ..self.clone()
        }
    }

    pub fn with_weight(&self, weight: f32) -> Self {
        Self {
            weight,
            ..self.clone()
        }
    }

    pub fn with_intensity(&self, intensity: Option<f32>) -> Self {
        Self {
            intensity,
            ..self.clone()
        }
    }

    pub fn completed(&self, at: DateTime<Utc>) -> Self {
        Self {
            completed_at: Some(at),
            ..self.clone()
        }
    }
}
