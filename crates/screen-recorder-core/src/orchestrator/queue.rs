use crate::{CaptureEvent, Command, CoreResult, Event, InstallationStatus, RecorderError};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::sync::mpsc;

/// Create the orchestrator's serial event queue.
///
/// The handle is cloned into every collaborator that reports back; the
/// queue is moved into the [`SessionOrchestrator`](crate::SessionOrchestrator).
pub fn event_queue() -> (OrchestratorHandle, EventQueue) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let weak_tx = event_tx.downgrade();

    (
        OrchestratorHandle { event_tx },
        EventQueue { event_rx, weak_tx },
    )
}

/// Posts events onto the orchestrator's queue from any thread.
///
/// Unbounded so that ports on blocking threads never stall: posting is
/// the only way they touch orchestrator state.
#[derive(Debug, Clone)]
pub struct OrchestratorHandle {
    event_tx: mpsc::UnboundedSender<Event>,
}

impl OrchestratorHandle {
    /// Post an event.
    #[track_caller]
    pub fn post(&self, event: impl Into<Event>) -> CoreResult<()> {
        let location = Location::caller();
        self.event_tx
            .send(event.into())
            .map_err(|_| RecorderError::ChannelClosed {
                location: ErrorLocation::from(location),
            })
    }

    /// Post a UI command.
    #[track_caller]
    pub fn command(&self, command: Command) -> CoreResult<()> {
        self.post(command)
    }

    /// Post a capture engine callback.
    #[track_caller]
    pub fn capture(&self, event: CaptureEvent) -> CoreResult<()> {
        self.post(event)
    }

    /// Post an audio driver status change.
    #[track_caller]
    pub fn audio_status(&self, status: InstallationStatus) -> CoreResult<()> {
        self.post(status)
    }

    /// Whether the orchestrator has stopped consuming events.
    pub fn is_closed(&self) -> bool {
        self.event_tx.is_closed()
    }
}

/// Receiving end of the event queue.
///
/// Holds only a weak sender so the queue closes once every
/// [`OrchestratorHandle`] is gone.
#[derive(Debug)]
pub struct EventQueue {
    event_rx: mpsc::UnboundedReceiver<Event>,
    weak_tx: mpsc::WeakUnboundedSender<Event>,
}

impl EventQueue {
    /// Wait for the next event. `None` once every handle is dropped.
    pub async fn recv(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }

    /// Take the next event if one is queued.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.event_rx.try_recv().ok()
    }

    pub(crate) fn weak_sender(&self) -> mpsc::WeakUnboundedSender<Event> {
        self.weak_tx.clone()
    }
}
