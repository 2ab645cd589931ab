//! Configuration management for screen-recorder.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        AudioDriverConfig, CaptureConfig, DEFAULT_ENGINE_NAME, DisplayConfig,
        default_supported_architectures,
    },
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::{ProjectDirs, UserDirs};
use error_location::ErrorLocation;
use screen_recorder_core::{AudioSource, RecorderSettings};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Main configuration struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Capture engine executable and installation.
    pub capture: CaptureConfig,
    /// Internal audio driver commands.
    #[serde(default)]
    pub audio_driver: AudioDriverConfig,
    /// Display settings.
    #[serde(default)]
    pub display: DisplayConfig,
    /// Recorder settings handed to the orchestrator.
    pub recording: RecorderSettings,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config found, creating default");
            Self::create_default()
        }
    }

    /// Load configuration from an explicit path.
    #[track_caller]
    #[instrument]
    pub fn load_from(config_path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config = Self::parse(&contents)?;
        info!(config_path = ?config_path, "Configuration loaded");

        Ok(config)
    }

    /// Parse configuration from TOML text.
    #[track_caller]
    pub fn parse(contents: &str) -> AppResult<Self> {
        toml::from_str(contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Save configuration to disk using atomic write pattern.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to an explicit path.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Record an audio source change made by the orchestrator.
    ///
    /// Returns whether the configuration changed.
    pub fn set_audio_source(&mut self, audio_source: AudioSource) -> bool {
        let changed = self.recording.audio_source != audio_source;
        self.recording.audio_source = audio_source;
        changed
    }

    /// Record that the stop help has been shown.
    ///
    /// Returns whether the configuration changed.
    pub fn mark_stop_help_displayed(&mut self) -> bool {
        let changed = !self.recording.stop_help_displayed;
        self.recording.stop_help_displayed = true;
        changed
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "iwobanas", "ScreenRecorder").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn create_default() -> AppResult<Self> {
        let proj_dirs = Self::project_dirs()?;
        let data_dir = proj_dirs.data_dir();

        let output_dir = UserDirs::new()
            .and_then(|dirs| dirs.video_dir().map(|dir| dir.join("ScreenRecorder")))
            .unwrap_or_else(|| data_dir.join("recordings"));

        let config = Self::with_dirs(data_dir, output_dir);
        config.save()?;

        warn!(
            source_executable = ?config.capture.source_executable,
            "Default config created. Point capture.source_executable at the capture engine."
        );

        Ok(config)
    }

    /// Default configuration rooted at the given data and output directories.
    pub fn with_dirs(data_dir: &Path, output_dir: PathBuf) -> Self {
        Config {
            capture: CaptureConfig {
                source_executable: data_dir.join("engine").join(DEFAULT_ENGINE_NAME),
                install_dir: data_dir.join("bin"),
                args: Vec::new(),
                supported_architectures: default_supported_architectures(),
            },
            audio_driver: AudioDriverConfig::default(),
            display: DisplayConfig::default(),
            recording: RecorderSettings::new(output_dir),
        }
    }
}
