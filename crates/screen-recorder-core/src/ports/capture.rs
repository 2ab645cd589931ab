use crate::{AudioSource, CoreResult};

use std::path::Path;

/// The external capture engine.
///
/// Implementations report back by posting
/// [`CaptureEvent`](crate::CaptureEvent)s: `Ready` after initialization,
/// exactly one `Started` after a successful `start`, and exactly one
/// terminal `Finished` or `Error` per session. No event may be posted
/// after `destroy()`.
pub trait CaptureProcessPort: Send {
    /// Re-initialize the engine with the previously installed executable.
    fn initialize(&mut self) -> CoreResult<()>;

    /// Initialize the engine with a freshly installed executable.
    fn initialize_with(&mut self, executable: &Path) -> CoreResult<()>;

    /// Start capturing into `output_path`.
    fn start(
        &mut self,
        output_path: &Path,
        rotation_degrees: u16,
        audio_source: AudioSource,
    ) -> CoreResult<()>;

    /// Ask the engine to finish the current session.
    fn stop(&mut self) -> CoreResult<()>;

    /// Tear the engine down. Idempotent.
    fn destroy(&mut self);

    /// Whether the engine can accept `start`.
    fn is_ready(&self) -> bool;
}
