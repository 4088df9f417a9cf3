use std::{fmt::Display, str::FromStr};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

/// Shape of an exercise's target: a rep count, a rep range, or a duration.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum PerformanceVariableCategory {
    #[default]
    Reps,
    RepRange,
    Time,
}

impl Display for PerformanceVariableCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Reps => "reps",
            Self::RepRange => "rep-range",
            Self::Time => "time",
        };

        write!(f, "{}", s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntensityCategory {
    Rpe,
    Amrap,
    Rir,
}

impl Display for IntensityCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Rpe => "RPE",
            Self::Amrap => "AMRAP",
            Self::Rir => "RIR",
        };

        write!(f, "{}", s)
    }
}

/// Where a history record sits relative to the workout it describes.
/// `During` marks an unfinished session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutPhase {
    Before,
    During,
    After,
}

impl Display for WorkoutPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Before => "before",
            Self::During => "during",
            Self::After => "after",
        };

        write!(f, "{}", s)
    }
}

impl FromStr for WorkoutPhase {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "before" => Ok(Self::Before),
            "during" => Ok(Self::During),
            "after" => Ok(Self::After),
            other => anyhow::bail!("unknown workout phase `{other}`"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn weight_label(self) -> &'static str {
        match self {
            Self::Metric => "kg",
            Self::Imperial => "lb",
        }
    }
}

impl Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        };

        write!(f, "{}", s)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
    /// No colors or text styling.
    Plain,
}

impl Theme {
    pub fn uses_color(self) -> bool {
        self != Self::Plain
    }

    /// Switches terminal styling for the rest of the process.
    pub fn apply(self) {
        if !self.uses_color() {
            colored::control::set_override(false);
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::System => "system",
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Plain => "plain",
        };

        write!(f, "{}", s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFmt {
    Pretty,
    Json,
}

impl OutputFmt {
    pub fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Pretty }
    }
}

/// Prints `value` as JSON or hands off to the colorful renderer.
pub fn emit<T: Serialize, F: FnOnce()>(fmt: OutputFmt, value: &T, pretty: F) {
    match fmt {
        OutputFmt::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => tracing::error!(error = %e, "failed to serialize output"),
        },
        OutputFmt::Pretty => pretty(),
    }
}

/// Return the closest of `candidates` to `input`
/// if similarity ≥ 0.80 *and* clearly better than the runner-up.
/// Otherwise return `None` (no suggestion shown).
pub fn best_name_suggestion<'a>(input: &str, candidates: &'a [String]) -> Option<&'a str> {
    let inp = input.to_lowercase();
    if inp.trim().is_empty() {
        return None;
    }

    let mut scores: Vec<(&'a str, f64)> = candidates
        .iter()
        .map(|c| (c.as_str(), jaro_winkler(&inp, &c.to_lowercase())))
        .collect();

    // Highest score first.
    scores.sort_by(|a, b| b.1.total_cmp(&a.1));

    let (best, best_score) = *scores.first()?;
    let second_score = scores.get(1).map(|(_, s)| *s).unwrap_or(0.0);

    const MIN_SCORE: f64 = 0.80;
    const GAP: f64 = 0.02;

    if best_score >= MIN_SCORE && best_score - second_score >= GAP {
        Some(best)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_round_trips_through_text() {
        for phase in [WorkoutPhase::Before, WorkoutPhase::During, WorkoutPhase::After] {
            assert_eq!(phase.to_string().parse::<WorkoutPhase>().unwrap(), phase);
        }
        assert!("finished".parse::<WorkoutPhase>().is_err());
    }

    #[test]
    fn only_plain_theme_drops_color() {
        assert!(Theme::default().uses_color());
        assert!(Theme::Dark.uses_color());
        assert!(!Theme::Plain.uses_color());
        assert_eq!(Theme::from_str("PLAIN", true), Ok(Theme::Plain));
    }

    #[test]
    fn suggestion_picks_close_unique_match() {
        let names = vec!["Push Pull Legs".to_string(), "Upper Lower".to_string()];
        assert_eq!(best_name_suggestion("push pull leg", &names), Some("Push Pull Legs"));
        assert_eq!(best_name_suggestion("zzz", &names), None);
        assert_eq!(best_name_suggestion("  ", &names), None);
        assert_eq!(best_name_suggestion("anything", &[]), None);
    }
}
