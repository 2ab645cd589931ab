use crate::CoreResult;

/// Installation status reported by the audio driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallationStatus {
    /// Installation in progress.
    Installing,
    /// Removal in progress.
    Uninstalling,
    /// Installed and ready.
    Installed,
    /// Installation failed.
    InstallationFailure,
    /// Installed but misbehaving.
    Unstable,
    /// Not installed (also reported after a successful uninstall).
    NotInstalled,
    /// Status could not be determined.
    Unspecified,
}

/// The optional privileged audio capture component.
///
/// Status changes are posted as
/// [`Event::AudioDriver`](crate::Event::AudioDriver).
pub trait AudioDriverPort: Send {
    /// Begin installation.
    fn install(&mut self) -> CoreResult<()>;

    /// Begin removal.
    fn uninstall(&mut self) -> CoreResult<()>;

    /// Notify the driver that a recording session is starting.
    fn start_recording(&mut self);

    /// Whether the driver can be used for recording.
    fn is_ready(&self) -> bool;

    /// Whether the driver needs to be installed before recording.
    fn should_install(&self) -> bool;

    /// Whether the driver must be removed before the process exits.
    fn should_uninstall(&self) -> bool;
}
