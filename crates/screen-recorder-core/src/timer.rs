//! Countdown for the time-boxed recording policy.

use crate::Event;

use std::time::Duration;

use tokio::{runtime::Handle, sync::mpsc, task::JoinHandle};
use tracing::{debug, instrument, warn};

/// Resettable single-shot countdown.
///
/// When the countdown elapses, [`Event::TimerElapsed`] is posted onto the
/// orchestrator queue. Each run has its own generation number so an event
/// from a run that was reset after firing is recognised as stale.
/// The timer never stops a recording itself.
#[derive(Debug)]
pub struct RecordingTimer {
    event_tx: mpsc::WeakUnboundedSender<Event>,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl RecordingTimer {
    pub(crate) fn new(event_tx: mpsc::WeakUnboundedSender<Event>) -> Self {
        Self {
            event_tx,
            generation: 0,
            task: None,
        }
    }

    /// Start (or restart) the countdown.
    #[instrument(skip(self))]
    pub fn start(&mut self, duration: Duration) {
        self.reset();

        let Ok(runtime) = Handle::try_current() else {
            warn!("No async runtime, recording timer not started");
            return;
        };
        let Some(event_tx) = self.event_tx.upgrade() else {
            warn!("Event queue closed, recording timer not started");
            return;
        };

        self.generation += 1;
        let generation = self.generation;

        self.task = Some(runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = event_tx.send(Event::TimerElapsed { generation });
        }));

        debug!(generation, duration_secs = duration.as_secs(), "Recording timer started");
    }

    /// Cancel the countdown. Idempotent.
    pub fn reset(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(generation = self.generation, "Recording timer reset");
        }
    }

    /// Whether a countdown is pending or has fired without being consumed.
    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Consume an elapsed event. Returns `false` for stale generations.
    pub(crate) fn take_elapsed(&mut self, generation: u64) -> bool {
        if self.task.is_some() && generation == self.generation {
            self.task = None;
            true
        } else {
            debug!(generation, current = self.generation, "Ignoring stale timer event");
            false
        }
    }
}

impl Drop for RecordingTimer {
    fn drop(&mut self) {
        self.reset();
    }
}
