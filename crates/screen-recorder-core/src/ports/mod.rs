//! Interfaces to the collaborators the orchestrator drives.
//!
//! Every command is fire-and-forget: completion is reported later by
//! posting an [`Event`](crate::Event) through an
//! [`OrchestratorHandle`](crate::OrchestratorHandle). A `CoreResult` error
//! means the command could not even be issued.

mod audio_driver;
mod capture;
mod display;

pub use {
    audio_driver::{AudioDriverPort, InstallationStatus},
    capture::CaptureProcessPort,
    display::{DeviceRotation, DisplayPort},
};
