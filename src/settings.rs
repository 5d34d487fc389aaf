//! Walkthrough settings with persistence
//!
//! Settings are read from `~/.config/stride/settings.toml` unless a path is
//! given on the command line.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stride_game::MovementConfig;
use tracing::Level;

/// All walkthrough settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub movement: MovementConfig,
    pub simulation: SimulationSettings,
}

/// Headless simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Fixed step in seconds
    pub fixed_timestep: f32,
    /// Length of the scripted walkthrough in seconds
    pub duration_secs: f32,
    /// Feet height above the ground at spawn
    pub spawn_height: f32,
    /// Camera yaw in degrees, held constant for the run
    pub camera_yaw: f32,
    /// Log level: error, warn, info, debug, or trace
    pub log_level: String,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            duration_secs: 8.0,
            spawn_height: 0.5,
            camera_yaw: 0.0,
            log_level: "info".to_owned(),
        }
    }
}

impl SimulationSettings {
    /// Parsed log level, INFO when unrecognised
    pub fn level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }
}

/// Where a settings file was looked for, and what came of it.
///
/// Logging is not up yet while settings load, so the outcome is reported
/// afterwards.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(PathBuf),
    Missing(Option<PathBuf>),
    Invalid(PathBuf, String),
}

impl Settings {
    /// Default settings file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("stride").join("settings.toml"))
    }

    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load settings, or fall back to defaults if missing or unreadable
    pub fn load(path: Option<&Path>) -> (Self, LoadOutcome) {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return (Self::default(), LoadOutcome::Missing(None)),
            },
        };

        if !path.exists() {
            return (Self::default(), LoadOutcome::Missing(Some(path)));
        }

        match fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(settings) => (settings, LoadOutcome::Loaded(path)),
                Err(e) => (Self::default(), LoadOutcome::Invalid(path, e.to_string())),
            },
            Err(e) => (Self::default(), LoadOutcome::Invalid(path, e.to_string())),
        }
    }
}
