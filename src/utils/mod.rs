//! Utility module for VideoView
//!
//! This module provides common utilities used throughout the crate:
//! - Error handling with custom error types
//! - Configuration management
//! - Logging initialization
//! - Time formatting helpers

pub mod config;
pub mod error;

pub use config::{DisplayConfig, GeneralConfig, PlaybackConfig, PlayerConfig};
pub use error::{IntoPlayerError, Result, VideoViewError};

use env_logger::Env;

/// Load the player configuration
///
/// Loads configuration from:
/// 1. Default values
/// 2. System configuration file
/// 3. User configuration file
/// 4. Environment variables
///
/// # Returns
///
/// Returns the loaded configuration or an error if loading fails
pub fn load_config() -> Result<PlayerConfig> {
    PlayerConfig::load()
}

/// Initialize logging from the general configuration section
///
/// Logging stays silent when `enable_log` is false unless `RUST_LOG`
/// says otherwise. Calling this twice is harmless.
pub fn init_logging(config: &PlayerConfig) {
    let level = if config.general.enable_log {
        config.general.log_level.as_str()
    } else {
        "off"
    };

    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .try_init();
}

/// Format a millisecond position for display
///
/// # Arguments
///
/// * `time_ms` - Position or duration in milliseconds
///
/// # Returns
///
/// Formatted string in the format "HH:MM:SS" or "MM:SS" for times under an hour
pub fn string_for_time(time_ms: u64) -> String {
    let total_secs = time_ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
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
