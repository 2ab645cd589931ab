#![allow(clippy::unwrap_used, clippy::panic)]

use crate::{
    ProcessCaptureEngine,
    config::{CaptureConfig, default_supported_architectures},
    process_engine::{ENGINE_STOP_GRACE, classify_exit, start_line},
};

use std::{path::Path, time::Duration};

use screen_recorder_core::{
    AudioSource, CaptureEvent, CaptureProcessPort, Event, EventQueue, FailureKind,
    RecordingOutcome, event_queue,
};

fn error_kind(event: CaptureEvent) -> FailureKind {
    match event {
        CaptureEvent::Error(kind, _) => kind,
        other => panic!("expected an error, got {other:?}"),
    }
}

/// WHAT: Exit code zero after start is a finished recording
/// WHY: Only a clean exit counts as success
#[test]
fn given_exit_zero_after_start_when_classified_then_finished() {
    assert_eq!(
        classify_exit(0, true),
        CaptureEvent::Finished(RecordingOutcome::exited(0))
    );
}

/// WHAT: Exit code zero before start is a startup error
/// WHY: An idle engine that quits has no recording to finish, and
/// treating it as one would respawn the engine in a loop
#[test]
fn given_exit_zero_before_start_when_classified_then_startup_error() {
    assert_eq!(
        classify_exit(0, false),
        CaptureEvent::Error(FailureKind::StartupError, RecordingOutcome::exited(0))
    );
}

/// WHAT: Fixed exit codes map to their failure kinds
/// WHY: The recovery table depends on the exact kind
#[test]
fn given_fixed_exit_codes_when_classified_then_kinds() {
    let cases = [
        (201, FailureKind::OutputFileError),
        (202, FailureKind::MicrophoneBusy),
        (203, FailureKind::OpenGlError),
        (204, FailureKind::SecureSurfaceError),
        (205, FailureKind::AudioConfigError),
        (206, FailureKind::MediaRecorderError),
        (207, FailureKind::MaxFileSizeReached),
        (208, FailureKind::CpuNotSupported),
        (209, FailureKind::UnsupportedPlatform),
        (210, FailureKind::PrivilegedAccessUnavailable),
    ];

    for (code, kind) in cases {
        assert_eq!(error_kind(classify_exit(code, true)), kind, "exit {code}");
        assert_eq!(error_kind(classify_exit(code, false)), kind, "exit {code}");
    }
}

/// WHAT: Unknown codes depend on whether start was sent
/// WHY: A crash before start means the engine never launched properly
#[test]
fn given_unknown_code_when_classified_then_startup_or_recording_error() {
    assert_eq!(
        classify_exit(1, false),
        CaptureEvent::Error(FailureKind::StartupError, RecordingOutcome::exited(1))
    );
    assert_eq!(
        classify_exit(-1, true),
        CaptureEvent::Error(FailureKind::RecordingError, RecordingOutcome::exited(-1))
    );
}

/// WHAT: Start line carries rotation, audio source, and path
/// WHY: The path is last so it may contain spaces
#[test]
fn given_session_parameters_when_start_line_then_protocol_format() {
    assert_eq!(
        start_line(Path::new("/videos/my clip.mp4"), 270, AudioSource::Internal),
        "start 270 internal /videos/my clip.mp4"
    );
}

/// WHAT: Commands fail before the engine is initialized
/// WHY: The orchestrator must see synchronous rejections
#[test]
fn given_uninitialized_engine_when_commands_then_rejected() {
    let (handle, _queue) = event_queue();
    let mut engine = ProcessCaptureEngine::new(config(Path::new("/tmp")), handle);

    assert!(!engine.is_ready());
    assert!(engine.initialize().is_err());
    assert!(
        engine
            .start(Path::new("/tmp/a.mp4"), 0, AudioSource::Mic)
            .is_err()
    );
    assert!(engine.stop().is_err());
}

fn config(dir: &Path) -> CaptureConfig {
    CaptureConfig {
        source_executable: dir.join("engine.sh"),
        install_dir: dir.to_path_buf(),
        args: Vec::new(),
        supported_architectures: default_supported_architectures(),
    }
}

#[cfg(unix)]
fn write_script(dir: &Path, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("engine.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

async fn next_capture(queue: &mut EventQueue) -> CaptureEvent {
    let event = tokio::time::timeout(Duration::from_secs(10), queue.recv())
        .await
        .unwrap()
        .unwrap();
    match event {
        Event::Capture(event) => event,
        other => panic!("expected a capture event, got {other:?}"),
    }
}

/// WHAT: A full session over the line protocol
/// WHY: Ready, started, and finished must each be posted once, in order
#[cfg(unix)]
#[tokio::test]
async fn given_engine_script_when_session_runs_then_ready_started_finished() {
    // Given: An engine that records until told to stop
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        dir.path(),
        "echo ready\nread cmd rotation audio path\necho recording\nread stop\nexit 0",
    );
    let (handle, mut queue) = event_queue();
    let mut engine = ProcessCaptureEngine::new(config(dir.path()), handle);

    // When: Initialized
    engine.initialize_with(&script).unwrap();

    // Then: Ready
    assert_eq!(next_capture(&mut queue).await, CaptureEvent::Ready);
    assert!(engine.is_ready());

    // When: Started
    engine
        .start(&dir.path().join("out.mp4"), 90, AudioSource::Mute)
        .unwrap();

    // Then: No longer ready and recording confirmed
    assert!(!engine.is_ready());
    assert_eq!(next_capture(&mut queue).await, CaptureEvent::Started);

    // When: Stopped
    engine.stop().unwrap();

    // Then: Finished cleanly
    assert_eq!(
        next_capture(&mut queue).await,
        CaptureEvent::Finished(RecordingOutcome::exited(0))
    );
}

/// WHAT: An engine that dies before start reports a startup error
/// WHY: Launch failures are fatal
#[cfg(unix)]
#[tokio::test]
async fn given_engine_exits_early_when_initialized_then_startup_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "exit 3");
    let (handle, mut queue) = event_queue();
    let mut engine = ProcessCaptureEngine::new(config(dir.path()), handle);

    engine.initialize_with(&script).unwrap();

    assert_eq!(
        next_capture(&mut queue).await,
        CaptureEvent::Error(FailureKind::StartupError, RecordingOutcome::exited(3))
    );
}

/// WHAT: Nothing is posted after destroy
/// WHY: Late callbacks must not reach a torn-down orchestrator
#[cfg(unix)]
#[tokio::test]
async fn given_running_engine_when_destroyed_then_no_further_events() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "echo ready\nread cmd\nexit 0");
    let (handle, mut queue) = event_queue();
    let mut engine = ProcessCaptureEngine::new(config(dir.path()), handle);
    engine.initialize_with(&script).unwrap();
    assert_eq!(next_capture(&mut queue).await, CaptureEvent::Ready);

    engine.destroy();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(queue.try_recv().is_none());
    assert!(engine.initialize().is_err());
}

/// WHAT: An idle engine that exits cleanly reports a startup error
/// WHY: The orchestrator must not see a finished session it never started
#[cfg(unix)]
#[tokio::test]
async fn given_idle_engine_exits_cleanly_when_initialized_then_startup_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "exit 0");
    let (handle, mut queue) = event_queue();
    let mut engine = ProcessCaptureEngine::new(config(dir.path()), handle);

    engine.initialize_with(&script).unwrap();

    assert_eq!(
        next_capture(&mut queue).await,
        CaptureEvent::Error(FailureKind::StartupError, RecordingOutcome::exited(0))
    );
    assert!(queue.try_recv().is_none());
}

/// WHAT: Stop followed by destroy still reaches the engine
/// WHY: Closing during a recording must let the engine finalize its output
#[cfg(unix)]
#[tokio::test]
async fn given_recording_engine_when_stopped_and_destroyed_then_engine_sees_stop() {
    // Given: A recording engine that marks a file once it reads stop
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        dir.path(),
        "echo ready\nread cmd rotation audio path\necho recording\nread stop\ntouch \"$(dirname \"$0\")/stopped\"\nexit 0",
    );
    let (handle, mut queue) = event_queue();
    let mut engine = ProcessCaptureEngine::new(config(dir.path()), handle);
    let exit = engine.exit_signal();
    engine.initialize_with(&script).unwrap();
    assert_eq!(next_capture(&mut queue).await, CaptureEvent::Ready);
    engine
        .start(&dir.path().join("out.mp4"), 0, AudioSource::Mute)
        .unwrap();
    assert_eq!(next_capture(&mut queue).await, CaptureEvent::Started);

    // When: Stopped and destroyed in the same pass
    engine.stop().unwrap();
    engine.destroy();

    // Then: The engine read stop and exited on its own
    tokio::time::timeout(ENGINE_STOP_GRACE, exit.wait())
        .await
        .unwrap();
    assert!(dir.path().join("stopped").exists());

    // And: No callback was posted after destroy
    assert!(queue.try_recv().is_none());
}

/// WHAT: An engine that ignores stdin closing is killed after the grace period
/// WHY: Shutdown must not hang on a stuck engine
#[cfg(unix)]
#[tokio::test]
async fn given_stuck_engine_when_destroyed_then_killed_after_grace() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "echo ready\nexec sleep 60");
    let (handle, mut queue) = event_queue();
    let mut engine = ProcessCaptureEngine::new(config(dir.path()), handle);
    let exit = engine.exit_signal();
    engine.initialize_with(&script).unwrap();
    assert_eq!(next_capture(&mut queue).await, CaptureEvent::Ready);

    engine.destroy();

    tokio::time::timeout(ENGINE_STOP_GRACE + Duration::from_secs(5), exit.wait())
        .await
        .unwrap();
    assert!(queue.try_recv().is_none());
}
