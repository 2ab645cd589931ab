mod failure;
mod outcome;
mod output;
mod recording_session;
mod settings;
mod state;

pub use {
    failure::{ErrorPolicy, FailureKind, Recovery, Salvage},
    outcome::RecordingOutcome,
    output::output_file,
    recording_session::RecordingSession,
    settings::{AudioSource, DEFAULT_FILE_NAME_FORMAT, RecorderSettings},
    state::SessionState,
};
