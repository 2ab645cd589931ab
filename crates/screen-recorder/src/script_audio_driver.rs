//! Internal audio driver installed and removed by shell commands.

use crate::config::AudioDriverConfig;

use std::sync::{Arc, Mutex, PoisonError};

use screen_recorder_core::{
    AudioDriverPort, CoreResult, InstallationStatus, OrchestratorHandle, RecorderError,
};
use tokio::{process::Command, runtime::Handle};
use tracing::{debug, error, info, instrument, warn};

/// [`AudioDriverPort`] that runs the configured install and uninstall
/// commands through `sh -c` and posts status changes as they complete.
pub struct ScriptAudioDriver {
    config: AudioDriverConfig,
    handle: OrchestratorHandle,
    status: Arc<Mutex<InstallationStatus>>,
}

impl ScriptAudioDriver {
    pub fn new(config: AudioDriverConfig, handle: OrchestratorHandle) -> Self {
        Self {
            config,
            handle,
            status: Arc::new(Mutex::new(InstallationStatus::NotInstalled)),
        }
    }

    /// Current installation status.
    pub fn status(&self) -> InstallationStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn managed(&self) -> bool {
        self.config.install_command.is_some()
    }

    fn publish(&self, status: InstallationStatus) {
        publish(&self.status, &self.handle, status);
    }

    #[instrument(skip(self))]
    fn run_script(
        &self,
        script: String,
        in_progress: InstallationStatus,
        on_success: InstallationStatus,
        on_failure: InstallationStatus,
    ) -> CoreResult<()> {
        let runtime = Handle::try_current()
            .map_err(|e| RecorderError::port("audio", format!("no async runtime: {}", e)))?;
        self.publish(in_progress);

        let status = Arc::clone(&self.status);
        let handle = self.handle.clone();

        runtime.spawn(async move {
            let result = Command::new("sh").arg("-c").arg(&script).status().await;

            let next = match result {
                Ok(exit) if exit.success() => on_success,
                Ok(exit) => {
                    error!(script, code = ?exit.code(), "Audio driver script failed");
                    on_failure
                }
                Err(e) => {
                    error!(script, error = ?e, "Audio driver script could not be run");
                    on_failure
                }
            };

            publish(&status, &handle, next);
        });

        Ok(())
    }
}

fn publish(
    status: &Mutex<InstallationStatus>,
    handle: &OrchestratorHandle,
    next: InstallationStatus,
) {
    *status.lock().unwrap_or_else(PoisonError::into_inner) = next;
    debug!(status = ?next, "Audio driver status");

    if let Err(e) = handle.audio_status(next) {
        warn!(error = ?e, "Failed to post audio driver status");
    }
}

impl AudioDriverPort for ScriptAudioDriver {
    fn install(&mut self) -> CoreResult<()> {
        let Some(script) = self.config.install_command.clone() else {
            self.publish(InstallationStatus::Installed);
            return Ok(());
        };

        info!("Installing audio driver");
        self.run_script(
            script,
            InstallationStatus::Installing,
            InstallationStatus::Installed,
            InstallationStatus::InstallationFailure,
        )
    }

    fn uninstall(&mut self) -> CoreResult<()> {
        let Some(script) = self.config.uninstall_command.clone() else {
            self.publish(InstallationStatus::NotInstalled);
            return Ok(());
        };

        info!("Uninstalling audio driver");
        // A failed removal leaves nothing further to do before exit.
        self.run_script(
            script,
            InstallationStatus::Uninstalling,
            InstallationStatus::NotInstalled,
            InstallationStatus::NotInstalled,
        )
    }

    fn start_recording(&mut self) {
        if self.status() == InstallationStatus::Installed {
            debug!("Audio driver armed for recording");
        }
    }

    fn is_ready(&self) -> bool {
        !self.managed() || self.status() == InstallationStatus::Installed
    }

    fn should_install(&self) -> bool {
        self.managed()
            && matches!(
                self.status(),
                InstallationStatus::NotInstalled | InstallationStatus::Unspecified
            )
    }

    fn should_uninstall(&self) -> bool {
        self.managed() && self.status() == InstallationStatus::Installed
    }
}
