//! Stops recording when the display turns off.

use crate::{Event, OrchestratorHandle};

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tracing::{debug, warn};

/// Orchestrator-owned registration of the screen-off trigger.
///
/// Only registered while recording and only if configured. The platform
/// hook holds a [`ScreenOffSource`] and can fire it at any time; events
/// are only posted while registered.
#[derive(Debug, Default)]
pub struct ScreenOffTrigger {
    registered: Arc<AtomicBool>,
}

impl ScreenOffTrigger {
    /// Create an unregistered trigger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start listening. Idempotent.
    pub fn register(&self) {
        if !self.registered.swap(true, Ordering::AcqRel) {
            debug!("Screen-off trigger registered");
        }
    }

    /// Stop listening. Idempotent.
    pub fn unregister(&self) {
        if self.registered.swap(false, Ordering::AcqRel) {
            debug!("Screen-off trigger unregistered");
        }
    }

    /// Whether the trigger is registered.
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    /// Create the source end handed to the platform hook.
    pub fn source(&self, handle: OrchestratorHandle) -> ScreenOffSource {
        ScreenOffSource {
            registered: Arc::clone(&self.registered),
            handle,
        }
    }
}

/// Fired by the platform when the display turns off.
#[derive(Debug, Clone)]
pub struct ScreenOffSource {
    registered: Arc<AtomicBool>,
    handle: OrchestratorHandle,
}

impl ScreenOffSource {
    /// Report that the display turned off. Returns whether an event was posted.
    pub fn screen_turned_off(&self) -> bool {
        if !self.registered.load(Ordering::Acquire) {
            debug!("Screen off while trigger unregistered");
            return false;
        }

        match self.handle.post(Event::ScreenOff) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = ?e, "Failed to post screen-off event");
                false
            }
        }
    }
}
