use crate::{FailureKind, Recovery, Salvage};

use std::path::Path;

/// WHAT: Fatal kinds never restart
/// WHY: Startup and environment failures cannot be recovered by reinitializing
#[test]
fn given_fatal_kinds_when_policy_then_fatal_recovery() {
    for kind in [
        FailureKind::StartupError,
        FailureKind::CpuNotSupported,
        FailureKind::UnsupportedPlatform,
        FailureKind::InstallationError,
        FailureKind::PrivilegedAccessUnavailable,
    ] {
        assert_eq!(kind.policy().recovery, Recovery::Fatal, "{kind:?}");
    }
}

/// WHAT: Only the startup error among fatal kinds is reportable
/// WHY: Environment limitations are not bugs worth reporting
#[test]
fn given_fatal_kinds_when_policy_then_only_startup_error_reportable() {
    assert!(FailureKind::StartupError.policy().reportable);
    assert!(!FailureKind::CpuNotSupported.policy().reportable);
    assert!(!FailureKind::UnsupportedPlatform.policy().reportable);
    assert!(!FailureKind::PrivilegedAccessUnavailable.policy().reportable);
}

/// WHAT: Generic engine errors salvage non-empty output
/// WHY: Partial recordings are kept when the engine crashes mid-session
#[test]
fn given_generic_errors_when_policy_then_restart_with_salvage() {
    for kind in [FailureKind::RecordingError, FailureKind::MediaRecorderError] {
        let policy = kind.policy();
        assert_eq!(policy.recovery, Recovery::Restart, "{kind:?}");
        assert!(policy.reportable, "{kind:?}");
        assert_eq!(policy.salvage, Salvage::IfNonEmpty, "{kind:?}");
    }
}

/// WHAT: User-environment errors restart quietly without salvage
/// WHY: These are expected conditions, not bugs
#[test]
fn given_environment_errors_when_policy_then_restart_unreportable() {
    for kind in [
        FailureKind::OutputFileError,
        FailureKind::SecureSurfaceError,
        FailureKind::AudioConfigError,
    ] {
        let policy = kind.policy();
        assert_eq!(policy.recovery, Recovery::Restart, "{kind:?}");
        assert!(!policy.reportable, "{kind:?}");
        assert_eq!(policy.salvage, Salvage::Never, "{kind:?}");
    }
}

/// WHAT: Special recoveries for microphone busy and max file size
/// WHY: Neither is surfaced as an error dialog
#[test]
fn given_special_kinds_when_policy_then_dedicated_recovery() {
    assert_eq!(
        FailureKind::MicrophoneBusy.policy().recovery,
        Recovery::MuteRetry
    );
    let max = FailureKind::MaxFileSizeReached.policy();
    assert_eq!(max.recovery, Recovery::Success);
    assert_eq!(max.salvage, Salvage::Always);
    assert!(FailureKind::OpenGlError.policy().reportable);
}

/// WHAT: Error codes
/// WHY: Audio driver and environment failures carry fixed codes
#[test]
fn given_kinds_when_code_then_fixed_or_exit_value() {
    assert_eq!(FailureKind::AudioDriverInstallation.code(0), 2000);
    assert_eq!(FailureKind::AudioDriverUnstable.code(0), 2001);
    assert_eq!(FailureKind::CpuNotSupported.code(208), -1);
    assert_eq!(FailureKind::InstallationError.code(5), -1);
    assert_eq!(FailureKind::RecordingError.code(42), 42);
    assert_eq!(FailureKind::StartupError.code(127), 127);
}

/// WHAT: Output file error names the file when known
/// WHY: The user needs to know which location failed
#[test]
fn given_output_path_when_output_file_error_message_then_path_included() {
    let message =
        FailureKind::OutputFileError.message(201, Some(Path::new("/data/rec/a.mp4")));
    assert!(message.contains("/data/rec/a.mp4"));

    let without = FailureKind::OutputFileError.message(201, None);
    assert!(!without.is_empty());
}

/// WHAT: Engine failure messages include the exit value
/// WHY: The code identifies the failure in bug reports
#[test]
fn given_exit_value_when_recording_error_message_then_value_included() {
    assert!(
        FailureKind::RecordingError
            .message(77, None)
            .contains("77")
    );
    assert!(!FailureKind::StartupError.title().is_empty());
}
