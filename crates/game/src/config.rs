//! Game configuration (window, data paths, save slot, driving model). Loaded from config.ron at startup.

use crate::vehicle::VehicleTuning;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Mission definitions file.
    #[serde(default = "default_missions_path")]
    pub missions_path: PathBuf,
    /// Directory holding the save slot.
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,
    /// Key of the single save slot.
    #[serde(default = "default_save_key")]
    pub save_key: String,
    /// Upper bound on a frame's delta time, in seconds.
    #[serde(default = "default_max_frame_delta")]
    pub max_frame_delta: f32,
    /// Seconds between periodic achievement checks.
    #[serde(default = "default_achievement_interval")]
    pub achievement_check_interval: f32,
    /// How long a notification stays up, in seconds.
    #[serde(default = "default_notification_duration")]
    pub notification_duration: f32,
    #[serde(default)]
    pub vehicle: VehicleTuning,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_missions_path() -> PathBuf {
    PathBuf::from("assets/data/missions.ron")
}
fn default_save_dir() -> PathBuf {
    PathBuf::from("saves")
}
fn default_save_key() -> String {
    "legacy_city_save".to_string()
}
fn default_max_frame_delta() -> f32 {
    engine_core::DEFAULT_MAX_DELTA
}
fn default_achievement_interval() -> f32 {
    2.0
}
fn default_notification_duration() -> f32 {
    3.0
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            missions_path: default_missions_path(),
            save_dir: default_save_dir(),
            save_key: default_save_key(),
            max_frame_delta: default_max_frame_delta(),
            achievement_check_interval: default_achievement_interval(),
            notification_duration: default_notification_duration(),
            vehicle: VehicleTuning::default(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(data) => Self::from_ron(&data).unwrap_or_else(|e| {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }),
            Err(_) => {
                log::info!("No config at {:?}, writing defaults", path);
                let config = Self::default();
                config.save();
                config
            }
        }
    }

    pub fn from_ron(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(&path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("Could not serialize config: {}", e),
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
