//! Configuration management for EZPlayer
//!
//! This module handles loading and managing application configuration
//! from the user config file and environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::utils::error::{PlayerError, Result};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Window configuration
    pub window: WindowConfig,

    /// Playback session behaviour
    pub player: PlayerConfig,

    /// Headless engine settings
    pub engine: EngineConfig,

    /// General application settings
    pub general: GeneralConfig,
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial window width
    pub width: u32,

    /// Initial window height
    pub height: u32,

    /// Start in full-screen mode
    pub fullscreen: bool,

    /// Window title shown before any media is loaded
    pub title: String,
}

/// Playback session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Volume applied at startup (0 - 100)
    pub initial_volume: f64,

    /// Volume change per volume key press
    pub volume_step: f64,

    /// Volume change per mouse wheel notch
    pub wheel_step: f64,

    /// Position nudge applied by rewind/forward, as a fraction of the media
    pub nudge_fraction: f32,

    /// Delay before a lone click is treated as a single click
    pub click_settle_ms: u64,

    /// Idle monitor cadence
    pub idle_cadence_ms: u64,

    /// Input idleness after which the console hides during playback
    pub idle_threshold_ms: u64,

    /// Resume the last session when play is pressed with nothing loaded
    pub resume_last_session: bool,
}

/// Headless engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Duration reported for media the headless engine cannot probe
    pub nominal_duration_secs: u64,

    /// Playhead clock tick
    pub tick_ms: u64,
}

/// General application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            title: "EZPlayer".to_string(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            initial_volume: 100.0,
            volume_step: 12.0,
            wheel_step: 12.0,
            nudge_fraction: 0.001,
            click_settle_ms: 500,
            idle_cadence_ms: 1500,
            idle_threshold_ms: 1500,
            resume_last_session: true,
        }
    }
}

impl PlayerConfig {
    /// Settle delay for the click disambiguator
    pub fn click_settle(&self) -> Duration {
        Duration::from_millis(self.click_settle_ms)
    }

    /// Idle monitor cadence
    pub fn idle_cadence(&self) -> Duration {
        Duration::from_millis(self.idle_cadence_ms)
    }

    /// Idle threshold for hiding the console
    pub fn idle_threshold(&self) -> Duration {
        Duration::from_millis(self.idle_threshold_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            nominal_duration_secs: 90 * 60,
            tick_ms: 250,
        }
    }
}

impl EngineConfig {
    /// Playhead clock tick
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Duration reported for loaded media
    pub fn nominal_duration(&self) -> Duration {
        Duration::from_secs(self.nominal_duration_secs)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from various sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. User config file (~/.config/ezplayer/config.toml on Linux)
    /// 3. Environment variables (EZPLAYER_* prefix)
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                config = Self::from_file(&user_path)?;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Save configuration to user config file
    pub fn save(&self) -> Result<()> {
        let path = Self::user_config_path()
            .ok_or_else(|| PlayerError::Config("Cannot determine user config path".to_string()))?;
        self.save_to(&path)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| PlayerError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| PlayerError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, toml)
            .map_err(|e| PlayerError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Read a configuration from a TOML file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| PlayerError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| PlayerError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(width) = std::env::var("EZPLAYER_WINDOW_WIDTH") {
            self.window.width = width.parse()
                .map_err(|_| PlayerError::Config("Invalid EZPLAYER_WINDOW_WIDTH".to_string()))?;
        }

        if let Ok(height) = std::env::var("EZPLAYER_WINDOW_HEIGHT") {
            self.window.height = height.parse()
                .map_err(|_| PlayerError::Config("Invalid EZPLAYER_WINDOW_HEIGHT".to_string()))?;
        }

        if let Ok(volume) = std::env::var("EZPLAYER_VOLUME") {
            self.player.initial_volume = volume.parse()
                .map_err(|_| PlayerError::Config("Invalid EZPLAYER_VOLUME".to_string()))?;
        }

        if let Ok(log_level) = std::env::var("EZPLAYER_LOG_LEVEL") {
            self.general.log_level = log_level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(PlayerError::Config("Window dimensions must be non-zero".to_string()));
        }

        if !(0.0..=100.0).contains(&self.player.initial_volume) {
            return Err(PlayerError::Config("Initial volume must be between 0 and 100".to_string()));
        }

        if self.player.idle_cadence_ms == 0 || self.player.click_settle_ms == 0 || self.engine.tick_ms == 0 {
            return Err(PlayerError::Config("Timer intervals must be non-zero".to_string()));
        }

        if !(0.0..=1.0).contains(&self.player.nudge_fraction) {
            return Err(PlayerError::Config("Nudge fraction must be between 0.0 and 1.0".to_string()));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.general.log_level.as_str()) {
            return Err(PlayerError::Config(format!(
                "Invalid log level '{}', must be one of: {:?}",
                self.general.log_level,
                valid_log_levels
            )));
        }

        Ok(())
    }

    /// Get user config file path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("ezplayer").join("config.toml"))
    }
}
