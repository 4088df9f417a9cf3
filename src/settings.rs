use std::{fs, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::{Theme, UnitSystem};

const POUNDS_PER_KG: f32 = 2.204_622_6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub unit_system: UnitSystem,
    pub theme: Theme,
}

impl Settings {
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join("liftplan").join("settings.toml"))
            .context("Could not determine config directory")
    }

    /// Reads the settings file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid settings file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to save settings to {}", path.display()))
    }

    /// Weights are stored in kilograms; this converts for display.
    pub fn display_weight(&self, kg: f32) -> f32 {
        match self.unit_system {
            UnitSystem::Metric => kg,
            UnitSystem::Imperial => kg * POUNDS_PER_KG,
        }
    }

    /// Converts a weight typed by the user into kilograms.
    pub fn weight_to_kg(&self, entered: f32) -> f32 {
        match self.unit_system {
            UnitSystem::Metric => entered,
            UnitSystem::Imperial => entered / POUNDS_PER_KG,
        }
    }
}
