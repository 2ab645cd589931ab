use crate::{AudioSource, DeviceRotation};

use std::{fs, path::PathBuf};

use uuid::Uuid;

/// One start-to-finish recording attempt.
///
/// Created when `Starting` begins and dropped when the session returns to
/// `Ready` or `Error`. The orchestrator holds at most one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingSession {
    /// Unique ID for log correlation.
    pub id: Uuid,
    /// Destination file.
    pub output_path: PathBuf,
    /// Wall-clock start time.
    pub started_at_epoch_millis: i64,
    /// Output orientation correction passed to the capture engine.
    pub rotation_degrees: u16,
    /// Audio source effective for this session.
    pub audio_source: AudioSource,
}

impl RecordingSession {
    /// Create a session, normalizing the device rotation to `(360 - rotation) % 360`.
    pub fn new(
        output_path: PathBuf,
        device_rotation: DeviceRotation,
        started_at_epoch_millis: i64,
        audio_source: AudioSource,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            output_path,
            started_at_epoch_millis,
            rotation_degrees: (360 - device_rotation.degrees()) % 360,
            audio_source,
        }
    }

    /// Whole seconds elapsed since the session started.
    pub fn elapsed_secs(&self, now_epoch_millis: i64) -> u64 {
        let elapsed = now_epoch_millis.saturating_sub(self.started_at_epoch_millis);
        u64::try_from(elapsed / 1000).unwrap_or(0)
    }

    /// Current output file size in KiB. Missing files count as empty.
    pub fn output_size_kb(&self) -> u64 {
        self.output_len() / 1024
    }

    /// Whether the output file exists and is non-empty.
    pub fn has_output(&self) -> bool {
        self.output_len() > 0
    }

    fn output_len(&self) -> u64 {
        fs::metadata(&self.output_path)
            .map(|meta| meta.len())
            .unwrap_or(0)
    }
}
