use crate::{FailureKind, InstallationStatus, RecordingOutcome};

use std::path::PathBuf;

/// Commands the UI layer sends to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start recording if ready, otherwise drop the request.
    Start,
    /// Start recording now if ready, otherwise as soon as the recorder becomes ready.
    StartWhenReady,
    /// Stop the current recording.
    Stop,
    /// Orderly shutdown.
    Close,
    /// Re-evaluate readiness.
    SetReady,
    /// Return to a clean, recordable baseline.
    Reinitialize,
    /// The user dismissed an error dialog.
    DismissError {
        /// The `restart` flag of the dismissed error.
        restart: bool,
    },
    /// The user answered the microphone-busy prompt.
    RestartMute {
        /// Retry the recording with audio muted.
        accepted: bool,
    },
    /// The user acknowledged the "how to stop" help.
    StopHelpAcknowledged,
    /// The user dismissed the time limit prompt.
    TimeoutDismissed,
}

/// Callbacks from the capture engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// The engine is initialized and can accept `start`.
    Ready,
    /// Capture has begun.
    Started,
    /// The session completed normally.
    Finished(RecordingOutcome),
    /// The session (or the engine) failed.
    Error(FailureKind, RecordingOutcome),
}

/// Everything the orchestrator's queue carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// UI command.
    Command(Command),
    /// Capture engine callback.
    Capture(CaptureEvent),
    /// The capture engine executable is installed at the given path.
    ExecutableInstalled(PathBuf),
    /// Audio driver status change.
    AudioDriver(InstallationStatus),
    /// The recording timer elapsed.
    TimerElapsed {
        /// Timer run that fired. Stale runs are ignored.
        generation: u64,
    },
    /// The display turned off.
    ScreenOff,
}

impl From<Command> for Event {
    fn from(command: Command) -> Self {
        Event::Command(command)
    }
}

impl From<CaptureEvent> for Event {
    fn from(event: CaptureEvent) -> Self {
        Event::Capture(event)
    }
}

impl From<InstallationStatus> for Event {
    fn from(status: InstallationStatus) -> Self {
        Event::AudioDriver(status)
    }
}
