mod event;
mod notification;
#[allow(clippy::module_inception)]
mod orchestrator;
mod queue;

pub use {
    event::{CaptureEvent, Command, Event},
    notification::{ErrorReport, Notification},
    orchestrator::{PendingIntentFlags, SessionOrchestrator, Termination},
    queue::{EventQueue, OrchestratorHandle, event_queue},
};
