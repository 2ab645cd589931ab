use serde::{Deserialize, Serialize};

/// Physical rotation of the device display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceRotation {
    /// Natural orientation.
    #[default]
    Rotation0,
    /// Rotated 90 degrees.
    Rotation90,
    /// Rotated 180 degrees.
    Rotation180,
    /// Rotated 270 degrees.
    Rotation270,
}

impl DeviceRotation {
    /// Rotation in degrees.
    pub fn degrees(self) -> u16 {
        match self {
            DeviceRotation::Rotation0 => 0,
            DeviceRotation::Rotation90 => 90,
            DeviceRotation::Rotation180 => 180,
            DeviceRotation::Rotation270 => 270,
        }
    }

    /// Nearest quarter turn for an arbitrary angle.
    pub fn from_degrees(degrees: i32) -> Self {
        match (degrees.rem_euclid(360) + 45) / 90 % 4 {
            1 => DeviceRotation::Rotation90,
            2 => DeviceRotation::Rotation180,
            3 => DeviceRotation::Rotation270,
            _ => DeviceRotation::Rotation0,
        }
    }
}

/// Display state the orchestrator reads and adjusts while recording.
pub trait DisplayPort: Send {
    /// Current display rotation.
    fn rotation(&self) -> DeviceRotation;

    /// Apply the touch visualization policy for a recording.
    fn apply_show_touches(&mut self, show_touches: bool);

    /// Restore touch visualization to what it was before recording.
    fn restore_show_touches(&mut self);
}
