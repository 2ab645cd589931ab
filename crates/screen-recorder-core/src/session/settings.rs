use std::{path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};

/// Default `strftime` pattern for output file names.
pub const DEFAULT_FILE_NAME_FORMAT: &str = "screenrecord_%Y%m%d_%H%M%S.mp4";

/// Audio captured alongside the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioSource {
    /// Microphone input.
    #[default]
    Mic,
    /// Internal (system) audio. Requires the privileged audio driver.
    Internal,
    /// No audio.
    Mute,
}

impl AudioSource {
    /// Only internal audio depends on the installable driver.
    pub fn requires_driver(self) -> bool {
        self == AudioSource::Internal
    }
}

/// Recorder settings read by the orchestrator.
///
/// Passed in explicitly at construction; the orchestrator keeps its own
/// copy and reports changes it makes (e.g. the mute fallback) through
/// notifications so the owner can persist them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecorderSettings {
    /// Directory recordings are written to.
    pub output_dir: PathBuf,

    /// Used when `output_dir` cannot be created.
    #[serde(default = "default_legacy_output_dir")]
    pub legacy_output_dir: PathBuf,

    /// `strftime` pattern used to name output files (local time).
    #[serde(default = "default_file_name_format")]
    pub file_name_format: String,

    /// Audio source for new sessions.
    #[serde(default)]
    pub audio_source: AudioSource,

    /// Stop recording when the display turns off.
    #[serde(default)]
    pub stop_on_screen_off: bool,

    /// Visualize touches while recording.
    #[serde(default = "default_show_touches")]
    pub show_touches: bool,

    /// Time-boxed recording policy. `None` means unlimited.
    #[serde(default)]
    pub time_limit_secs: Option<u64>,

    /// Whether the "how to stop" help has already been shown.
    #[serde(default)]
    pub stop_help_displayed: bool,
}

impl RecorderSettings {
    /// Settings with defaults for everything but the output directory.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            legacy_output_dir: default_legacy_output_dir(),
            file_name_format: default_file_name_format(),
            audio_source: AudioSource::default(),
            stop_on_screen_off: false,
            show_touches: default_show_touches(),
            time_limit_secs: None,
            stop_help_displayed: false,
        }
    }

    /// Duration of the time-boxed policy, if active.
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs.map(Duration::from_secs)
    }
}

fn default_legacy_output_dir() -> PathBuf {
    PathBuf::from("/sdcard/ScreenRecorder")
}

fn default_file_name_format() -> String {
    DEFAULT_FILE_NAME_FORMAT.to_string()
}

fn default_show_touches() -> bool {
    true
}
