//! Utility module for EZPlayer
//!
//! This module provides common utilities used throughout the application:
//! - Error handling with custom error types
//! - Configuration management
//! - Time label formatting and clamping helpers

pub mod config;
pub mod error;

// Re-export commonly used items
pub use config::{Config, EngineConfig, GeneralConfig, PlayerConfig, WindowConfig};
pub use error::{PlayerError, Result};

use std::time::Duration;

/// Initialize the application configuration
///
/// Loads configuration from:
/// 1. Default values
/// 2. User configuration file
/// 3. Environment variables
///
/// # Returns
///
/// Returns the loaded configuration or an error if loading fails
pub fn load_config() -> Result<Config> {
    Config::load()
}

/// Format a duration as a clock reading
///
/// Always renders three fields ("HH:MM:SS") so the label width does not
/// jump when media crosses the one hour mark.
pub fn format_clock(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format the "elapsed / total" time label
pub fn format_time_label(elapsed: Duration, total: Duration) -> String {
    format!("{} / {}", format_clock(elapsed), format_clock(total))
}

/// Scale a duration by a playback fraction
///
/// Non-finite or negative fractions yield zero rather than panicking.
pub fn scale_duration(duration: Duration, fraction: f64) -> Duration {
    if !fraction.is_finite() || fraction <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(duration.as_secs_f64() * fraction).unwrap_or(Duration::ZERO)
}

/// Clamp a value between min and max
///
/// # Arguments
///
/// * `value` - Value to clamp
/// * `min` - Minimum value
/// * `max` - Maximum value
///
/// # Returns
///
/// The clamped value
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Clamp a playback fraction to [0, 1], mapping NaN to 0
pub fn clamp_fraction(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        clamp(value, 0.0, 1.0)
    }
}
