use crate::{AudioSource, SessionState};

use std::path::PathBuf;

/// Error to present to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Dialog message.
    pub message: String,
    /// Dialog title.
    pub title: String,
    /// Whether the recorder keeps running after the dialog.
    pub restart: bool,
    /// Whether the user should be offered to report the error.
    pub reportable: bool,
    /// Error code attached to reports.
    pub code: i32,
}

/// Outbound notifications for the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The session state changed.
    StatusChanged(SessionState),
    /// An error must be shown.
    Error(ErrorReport),
    /// Stats for a completed (or salvaged) session.
    SessionFinished {
        /// Output file.
        output_path: PathBuf,
        /// Output size in KiB.
        size_kb: u64,
        /// Recording duration in seconds.
        duration_secs: u64,
    },
    /// An output file was saved and should be scanned and announced.
    OutputSaved {
        /// Output file.
        output_path: PathBuf,
        /// The recording ended because the maximum file size was reached.
        max_file_size_reached: bool,
    },
    /// The time-boxed recording limit elapsed.
    TimeoutWarning,
    /// The microphone is busy; offer to retry muted.
    MicrophoneBusy,
    /// Show the "how to stop" help before the first recording.
    StopHelp,
    /// The orchestrator changed the configured audio source.
    AudioSourceChanged(AudioSource),
    /// The orchestrator has torn down and the hosting process should exit.
    Terminated {
        /// Teardown was caused by an unrecoverable error.
        fatal: bool,
    },
}
