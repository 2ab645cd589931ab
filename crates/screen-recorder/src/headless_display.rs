use crate::config::DisplayConfig;

use screen_recorder_core::{DeviceRotation, DisplayPort};
use tracing::{debug, info};

/// [`DisplayPort`] for a display with a fixed, configured rotation.
pub struct HeadlessDisplay {
    rotation: DeviceRotation,
    touches_applied: bool,
}

impl HeadlessDisplay {
    pub fn new(config: &DisplayConfig) -> Self {
        Self {
            rotation: DeviceRotation::from_degrees(config.rotation_degrees),
            touches_applied: false,
        }
    }
}

impl DisplayPort for HeadlessDisplay {
    fn rotation(&self) -> DeviceRotation {
        self.rotation
    }

    fn apply_show_touches(&mut self, show_touches: bool) {
        if show_touches {
            info!("Touch visualization enabled");
            self.touches_applied = true;
        }
    }

    fn restore_show_touches(&mut self) {
        if self.touches_applied {
            info!("Touch visualization restored");
            self.touches_applied = false;
        } else {
            debug!("Touch visualization already restored");
        }
    }
}
