//! Screen Recorder Core Library
//!
//! Session orchestration for a long-lived screen recorder: an external
//! capture engine and an optional privileged audio driver are brought into
//! a ready state, sessions are run to completion, and every failure the
//! engine can report is mapped onto a deterministic recovery.
//!
//! All state lives in [`SessionOrchestrator`], which consumes a single
//! serial event queue. Ports, timers, and UI triggers never touch that
//! state directly; they post [`Event`]s through an [`OrchestratorHandle`].
//!
//! # Example
//!
//! ```no_run
//! use screen_recorder_core::{
//!     AudioDriverPort, CaptureProcessPort, Command, DisplayPort, OrchestratorHandle,
//!     RecorderSettings, SessionOrchestrator, event_queue,
//! };
//!
//! async fn run<C, A, D>(capture: C, audio: A, display: D)
//! where
//!     C: CaptureProcessPort,
//!     A: AudioDriverPort,
//!     D: DisplayPort,
//! {
//!     let (handle, queue) = event_queue();
//!     let (notification_tx, _notification_rx) = tokio::sync::mpsc::unbounded_channel();
//!     let settings = RecorderSettings::new("/tmp/recordings");
//!
//!     let orchestrator =
//!         SessionOrchestrator::new(settings, capture, audio, display, queue, notification_tx);
//!     let _ = handle.command(Command::StartWhenReady);
//!     let _ = orchestrator.run().await;
//! }
//! ```

mod error;
mod orchestrator;
mod ports;
mod screen_off;
mod session;
mod timer;

pub use {
    error::{RecorderError, Result as CoreResult},
    orchestrator::{
        CaptureEvent, Command, ErrorReport, Event, EventQueue, Notification, OrchestratorHandle,
        PendingIntentFlags, SessionOrchestrator, Termination, event_queue,
    },
    ports::{AudioDriverPort, CaptureProcessPort, DeviceRotation, DisplayPort, InstallationStatus},
    screen_off::{ScreenOffSource, ScreenOffTrigger},
    session::{
        AudioSource, DEFAULT_FILE_NAME_FORMAT, ErrorPolicy, FailureKind, RecorderSettings,
        RecordingOutcome, RecordingSession, Recovery, Salvage, SessionState, output_file,
    },
    timer::RecordingTimer,
};

#[cfg(test)]
mod tests;
