//! Installs the capture engine executable before the first session.

use crate::{AppError, AppResult, config::CaptureConfig};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use screen_recorder_core::{
    CaptureEvent, Event, FailureKind, OrchestratorHandle, RecordingOutcome,
};
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

/// Why installation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallFailure {
    /// The host CPU is not in the supported list.
    CpuNotSupported,
    /// The executable could not be copied into place.
    Installation,
}

impl InstallFailure {
    /// Failure kind reported to the orchestrator.
    pub fn kind(self) -> FailureKind {
        match self {
            InstallFailure::CpuNotSupported => FailureKind::CpuNotSupported,
            InstallFailure::Installation => FailureKind::InstallationError,
        }
    }
}

/// Copies the shipped engine into the install directory off the queue.
pub struct ExecutableInstaller {
    config: CaptureConfig,
    handle: OrchestratorHandle,
}

impl ExecutableInstaller {
    pub fn new(config: CaptureConfig, handle: OrchestratorHandle) -> Self {
        Self { config, handle }
    }

    /// Run the installation on a blocking thread and post the result.
    #[instrument(skip(self))]
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::task::spawn_blocking(move || {
            let event = match install(&self.config, std::env::consts::ARCH) {
                Ok(executable) => Event::ExecutableInstalled(executable),
                Err((failure, e)) => {
                    error!(error = ?e, ?failure, "Capture engine installation failed");
                    Event::Capture(CaptureEvent::Error(
                        failure.kind(),
                        RecordingOutcome::exited(-1),
                    ))
                }
            };

            if let Err(e) = self.handle.post(event) {
                warn!(error = ?e, "Orchestrator gone before installation finished");
            }
        })
    }
}

/// Install the engine for the given CPU architecture.
///
/// Returns the path of the installed executable.
#[track_caller]
pub fn install(
    config: &CaptureConfig,
    arch: &str,
) -> Result<PathBuf, (InstallFailure, AppError)> {
    if !config.supported_architectures.iter().any(|a| a == arch) {
        return Err((
            InstallFailure::CpuNotSupported,
            AppError::EngineError {
                reason: format!("CPU architecture {} is not supported", arch),
                location: ErrorLocation::from(Location::caller()),
            },
        ));
    }

    copy_executable(config).map_err(|e| (InstallFailure::Installation, e))
}

#[track_caller]
fn copy_executable(config: &CaptureConfig) -> AppResult<PathBuf> {
    let source = &config.source_executable;
    if !source.is_file() {
        return Err(AppError::EngineError {
            reason: format!("Capture engine not found at {:?}", source),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let file_name = source.file_name().ok_or_else(|| AppError::EngineError {
        reason: format!("Capture engine path has no file name: {:?}", source),
        location: ErrorLocation::from(Location::caller()),
    })?;

    fs::create_dir_all(&config.install_dir)?;
    let target = config.install_dir.join(file_name);

    if source != &target {
        fs::copy(source, &target)?;
    }
    make_executable(&target)?;

    info!(source = ?source, target = ?target, "Capture engine installed");

    Ok(target)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
