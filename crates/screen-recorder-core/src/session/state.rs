use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of the recorder.
///
/// Owned exclusively by the orchestrator and only mutated on its event
/// queue, so exactly one state is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Capture engine executable is being installed.
    #[default]
    Installing,
    /// Capture engine is starting up.
    Initializing,
    /// Privileged audio driver is being installed.
    InstallingAudio,
    /// Ready to start a recording.
    Ready,
    /// Start requested, waiting for the engine to confirm.
    Starting,
    /// Recording in progress.
    Recording,
    /// Stop requested, waiting for the engine to finish.
    Stopping,
    /// An error is being surfaced to the user.
    Error,
    /// Audio driver is being removed on shutdown.
    UninstallingAudio,
}

impl SessionState {
    /// Human-readable status for notifications.
    pub fn status_str(self) -> &'static str {
        match self {
            SessionState::Installing => "Installing",
            SessionState::Initializing => "Initializing",
            SessionState::InstallingAudio => "Installing audio",
            SessionState::Ready => "Ready",
            SessionState::Starting => "Starting",
            SessionState::Recording => "Recording",
            SessionState::Stopping => "Stopping",
            SessionState::Error => "Error",
            SessionState::UninstallingAudio => "Uninstalling audio",
        }
    }

    /// Whether the capture engine has been asked to record and not yet asked to stop.
    pub fn is_capturing(self) -> bool {
        matches!(self, SessionState::Starting | SessionState::Recording)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status_str())
    }
}
