use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Recorder errors with source location tracking.
///
/// Capture and audio-driver failures are not represented here: they arrive
/// as events and are classified by [`FailureKind`](crate::FailureKind).
/// These variants cover plumbing failures around the orchestrator itself.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// The orchestrator's event queue has been dropped.
    #[error("Event queue closed {location}")]
    ChannelClosed {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A port rejected a command synchronously.
    #[error("{port} port failure: {reason} {location}")]
    PortFailure {
        /// Name of the port that failed.
        port: &'static str,
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// IO error from filesystem operations.
    #[error("IO error: {source} {location}")]
    Io {
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl RecorderError {
    /// Build a [`RecorderError::PortFailure`] at the caller's location.
    #[track_caller]
    pub fn port(port: &'static str, reason: impl Into<String>) -> Self {
        RecorderError::PortFailure {
            port,
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for RecorderError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        RecorderError::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
