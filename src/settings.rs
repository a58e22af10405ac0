use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::player::{Movement, MovementError};

pub const SETTINGS_FILE: &str = "grid_caster.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),

    #[error("invalid settings: {0}")]
    Movement(#[from] MovementError),
}

/// Startup configuration. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub target_fps: u32,
    pub move_speed: f32,     // cells/s
    pub rot_speed: f32,      // rad/s
    pub max_frame_time: f32, // seconds
    pub parallel_columns: bool,
    pub debug_overlay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Grid Caster".to_owned(),
            width: 800,
            height: 600,
            target_fps: 60,
            move_speed: 3.0,
            rot_speed: 1.5,
            max_frame_time: 0.1,
            parallel_columns: false,
            debug_overlay: true,
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads `path` if it exists, falls back to defaults otherwise.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("{} not found, using default settings", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_toml(&text)?;
        log::info!("loaded settings from {}", path.display());
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.width == 0 || self.height == 0 {
            return Err(SettingsError::Invalid(format!(
                "window size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if self.target_fps == 0 {
            return Err(SettingsError::Invalid("target_fps must be positive".to_owned()));
        }
        self.movement()?;
        Ok(())
    }

    pub fn movement(&self) -> Result<Movement, MovementError> {
        Movement::new(self.move_speed, self.rot_speed, self.max_frame_time)
    }
}
