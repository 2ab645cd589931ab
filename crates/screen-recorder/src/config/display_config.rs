use crate::config::default_rotation_degrees;

use serde::{Deserialize, Serialize};

/// Display configuration for headless operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Rotation of the captured display in degrees.
    #[serde(default = "default_rotation_degrees")]
    pub rotation_degrees: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            rotation_degrees: default_rotation_degrees(),
        }
    }
}
