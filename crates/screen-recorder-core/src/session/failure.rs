use std::path::Path;

/// How the orchestrator recovers from a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Surface the error, restore the display, and re-arm via `reinitialize()`.
    Restart,
    /// Offer to retry the recording with audio muted.
    MuteRetry,
    /// Not a failure: handled exactly like a finished recording.
    Success,
    /// Inform the user once and terminate.
    Fatal,
}

/// Whether partial output is kept after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Salvage {
    /// Output is discarded.
    Never,
    /// Output is kept if the file exists and is non-empty.
    IfNonEmpty,
    /// Output is always kept.
    Always,
}

/// Recovery attributes of a [`FailureKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPolicy {
    /// Recovery action.
    pub recovery: Recovery,
    /// Whether the user is offered to report the error.
    pub reportable: bool,
    /// Partial output handling.
    pub salvage: Salvage,
}

impl ErrorPolicy {
    const fn new(recovery: Recovery, reportable: bool, salvage: Salvage) -> Self {
        Self {
            recovery,
            reportable,
            salvage,
        }
    }
}

/// Every failure the capture engine, executable installer, or audio driver can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The capture engine failed to launch.
    StartupError,
    /// Generic failure while recording.
    RecordingError,
    /// Internal media recorder failure.
    MediaRecorderError,
    /// The output file could not be written.
    OutputFileError,
    /// Another application holds the microphone.
    MicrophoneBusy,
    /// OpenGL failure in the capture pipeline.
    OpenGlError,
    /// Protected (DRM) content is on screen.
    SecureSurfaceError,
    /// Audio configuration is not supported.
    AudioConfigError,
    /// Output reached the maximum file size. Treated as a successful finish.
    MaxFileSizeReached,
    /// The audio driver could not be installed.
    AudioDriverInstallation,
    /// The audio driver is installed but unstable.
    AudioDriverUnstable,
    /// The device CPU architecture is not supported.
    CpuNotSupported,
    /// The platform version is not supported.
    UnsupportedPlatform,
    /// The capture engine executable could not be installed.
    InstallationError,
    /// Privileged (root) access is unavailable.
    PrivilegedAccessUnavailable,
}

impl FailureKind {
    /// Recovery table.
    pub const fn policy(self) -> ErrorPolicy {
        use {Recovery::*, Salvage::*};

        match self {
            FailureKind::StartupError => ErrorPolicy::new(Fatal, true, Never),
            FailureKind::RecordingError => ErrorPolicy::new(Restart, true, IfNonEmpty),
            FailureKind::MediaRecorderError => ErrorPolicy::new(Restart, true, IfNonEmpty),
            FailureKind::OutputFileError => ErrorPolicy::new(Restart, false, Never),
            FailureKind::MicrophoneBusy => ErrorPolicy::new(MuteRetry, false, Never),
            FailureKind::OpenGlError => ErrorPolicy::new(Restart, true, Never),
            FailureKind::SecureSurfaceError => ErrorPolicy::new(Restart, false, Never),
            FailureKind::AudioConfigError => ErrorPolicy::new(Restart, false, Never),
            FailureKind::MaxFileSizeReached => ErrorPolicy::new(Success, false, Always),
            FailureKind::AudioDriverInstallation => ErrorPolicy::new(Restart, true, Never),
            FailureKind::AudioDriverUnstable => ErrorPolicy::new(Restart, true, Never),
            FailureKind::CpuNotSupported
            | FailureKind::UnsupportedPlatform
            | FailureKind::InstallationError
            | FailureKind::PrivilegedAccessUnavailable => ErrorPolicy::new(Fatal, false, Never),
        }
    }

    /// Error code reported alongside the message.
    ///
    /// Audio driver failures have fixed codes, environment failures report
    /// `-1`, and engine failures report the engine's exit value.
    pub fn code(self, exit_value: i32) -> i32 {
        match self {
            FailureKind::AudioDriverInstallation => 2000,
            FailureKind::AudioDriverUnstable => 2001,
            FailureKind::CpuNotSupported
            | FailureKind::UnsupportedPlatform
            | FailureKind::InstallationError
            | FailureKind::PrivilegedAccessUnavailable => -1,
            _ => exit_value,
        }
    }

    /// Dialog title.
    pub fn title(self) -> &'static str {
        match self {
            FailureKind::StartupError | FailureKind::RecordingError => "Recording error",
            FailureKind::MediaRecorderError => "Media recorder error",
            FailureKind::OutputFileError => "Output file error",
            FailureKind::MicrophoneBusy => "Microphone busy",
            FailureKind::OpenGlError => "Graphics error",
            FailureKind::SecureSurfaceError => "Screen protected",
            FailureKind::AudioConfigError => "Audio configuration error",
            FailureKind::MaxFileSizeReached => "Maximum file size reached",
            FailureKind::AudioDriverInstallation => "Internal audio installation error",
            FailureKind::AudioDriverUnstable => "Internal audio unstable",
            FailureKind::CpuNotSupported => "Unsupported device",
            FailureKind::UnsupportedPlatform => "Unsupported system version",
            FailureKind::InstallationError => "Installation error",
            FailureKind::PrivilegedAccessUnavailable => "Root access required",
        }
    }

    /// Dialog message.
    pub fn message(self, exit_value: i32, output_path: Option<&Path>) -> String {
        match self {
            FailureKind::StartupError => {
                format!("The capture engine failed to start (error {exit_value}).")
            }
            FailureKind::RecordingError => {
                format!("Recording failed unexpectedly (error {exit_value}).")
            }
            FailureKind::MediaRecorderError => {
                format!("The media recorder reported an error (error {exit_value}).")
            }
            FailureKind::OutputFileError => match output_path {
                Some(path) => format!("Could not write the output file {}.", path.display()),
                None => "Could not write the output file.".to_string(),
            },
            FailureKind::MicrophoneBusy => {
                "The microphone is used by another application. Continue without audio?"
                    .to_string()
            }
            FailureKind::OpenGlError => {
                "The graphics driver failed. Try a different video transformation.".to_string()
            }
            FailureKind::SecureSurfaceError => {
                "The screen shows protected content and can't be recorded.".to_string()
            }
            FailureKind::AudioConfigError => {
                "The selected audio configuration is not supported on this device.".to_string()
            }
            FailureKind::MaxFileSizeReached => {
                "The recording reached the maximum file size and was saved.".to_string()
            }
            FailureKind::AudioDriverInstallation => {
                "Internal audio could not be installed. Audio source switched to mute."
                    .to_string()
            }
            FailureKind::AudioDriverUnstable => {
                "Internal audio is unstable on this device. Audio source switched to mute."
                    .to_string()
            }
            FailureKind::CpuNotSupported => format!(
                "The {} CPU architecture is not supported.",
                std::env::consts::ARCH
            ),
            FailureKind::UnsupportedPlatform => {
                "This system version is not supported.".to_string()
            }
            FailureKind::InstallationError => {
                "The capture engine could not be installed.".to_string()
            }
            FailureKind::PrivilegedAccessUnavailable => {
                "Root access is required to capture the screen.".to_string()
            }
        }
    }
}
