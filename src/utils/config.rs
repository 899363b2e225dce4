//! Configuration management for VideoView
//!
//! This module handles loading the player configuration from config files
//! and environment variables. The embedding application hands the loaded
//! [`PlayerConfig`] to a [`crate::player::PlayerContext`], which freezes it
//! on first read.

use crate::surface::ScaleMode;
use crate::utils::error::{Result, VideoViewError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlayerConfig {
    /// Playback behaviour
    pub playback: PlaybackConfig,

    /// Display and orientation behaviour
    pub display: DisplayConfig,

    /// General settings
    pub general: GeneralConfig,
}

/// Playback configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Acquire audio focus when playback starts
    pub enable_audio_focus: bool,

    /// Allow playback to start on a metered mobile network without confirmation
    pub play_on_mobile_network: bool,

    /// Loop the media when it completes
    pub looping: bool,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Follow the device orientation sensor in normal mode
    pub enable_orientation: bool,

    /// Default scale mode applied to new surfaces
    pub screen_scale: ScaleMode,

    /// Adapt the chrome to a display cutout
    pub adapt_cutout: bool,

    /// Delay before the controller chrome hides itself
    pub dismiss_timeout_ms: u64,
}

/// General configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Emit log output at all
    pub enable_log: bool,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            enable_audio_focus: true,
            play_on_mobile_network: false,
            looping: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enable_orientation: false,
            screen_scale: ScaleMode::Default,
            adapt_cutout: true,
            dismiss_timeout_ms: 4000,
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enable_log: false,
            log_level: "info".to_string(),
        }
    }
}

impl PlayerConfig {
    /// Load configuration from various sources
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default values
    /// 2. System config file (/etc/videoview/config.toml on Linux)
    /// 3. User config file (~/.config/videoview/config.toml on Linux)
    /// 4. Environment variables (VIDEOVIEW_* prefix)
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(system_path) = Self::system_config_path() {
            if system_path.exists() {
                config = Self::read_file(&system_path)?;
            }
        }

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                config = Self::read_file(&user_path)?;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from an explicit file, then apply env overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> Result<()> {
        let path = Self::user_config_path()
            .ok_or_else(|| VideoViewError::Config("Cannot determine user config path".to_string()))?;
        self.save_to(&path)
    }

    /// Save configuration to an explicit file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| VideoViewError::Config(format!("Failed to create config directory: {}", e)))?;
        }

        let toml = toml::to_string_pretty(self)
            .map_err(|e| VideoViewError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, toml)
            .map_err(|e| VideoViewError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Parse a TOML file; missing keys keep their defaults
    fn read_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| VideoViewError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| VideoViewError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        fn flag(name: &str) -> Result<Option<bool>> {
            match std::env::var(name) {
                Ok(value) => value
                    .parse()
                    .map(Some)
                    .map_err(|_| VideoViewError::Config(format!("Invalid {}", name))),
                Err(_) => Ok(None),
            }
        }

        if let Some(value) = flag("VIDEOVIEW_ENABLE_AUDIO_FOCUS")? {
            self.playback.enable_audio_focus = value;
        }

        if let Some(value) = flag("VIDEOVIEW_PLAY_ON_MOBILE_NETWORK")? {
            self.playback.play_on_mobile_network = value;
        }

        if let Some(value) = flag("VIDEOVIEW_ENABLE_ORIENTATION")? {
            self.display.enable_orientation = value;
        }

        if let Some(value) = flag("VIDEOVIEW_ENABLE_LOG")? {
            self.general.enable_log = value;
        }

        if let Ok(scale) = std::env::var("VIDEOVIEW_SCREEN_SCALE") {
            self.display.screen_scale = scale.parse()?;
        }

        if let Ok(log_level) = std::env::var("VIDEOVIEW_LOG_LEVEL") {
            self.general.log_level = log_level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.display.dismiss_timeout_ms == 0 {
            return Err(VideoViewError::Config("Dismiss timeout must be non-zero".to_string()));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.general.log_level.as_str()) {
            return Err(VideoViewError::Config(format!(
                "Invalid log level '{}', must be one of: {:?}",
                self.general.log_level,
                valid_log_levels
            )));
        }

        Ok(())
    }

    /// Get system config file path
    fn system_config_path() -> Option<PathBuf> {
        #[cfg(target_os = "linux")]
        return Some(PathBuf::from("/etc/videoview/config.toml"));

        #[cfg(target_os = "windows")]
        return std::env::var("PROGRAMDATA").ok()
            .map(|p| PathBuf::from(p).join("VideoView").join("config.toml"));

        #[cfg(target_os = "macos")]
        return Some(PathBuf::from("/Library/Application Support/VideoView/config.toml"));

        #[allow(unreachable_code)]
        None
    }

    /// Get user config file path
    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("videoview").join("config.toml"))
    }
}
