#![allow(clippy::unwrap_used)]

use crate::{
    config::{CaptureConfig, default_supported_architectures},
    executable_installer::{InstallFailure, install},
};

use std::{fs, path::Path};

use screen_recorder_core::FailureKind;

fn config(dir: &Path) -> CaptureConfig {
    CaptureConfig {
        source_executable: dir.join("shipped").join("screenrec-engine"),
        install_dir: dir.join("bin"),
        args: Vec::new(),
        supported_architectures: default_supported_architectures(),
    }
}

/// WHAT: Shipped engine is copied into the install directory
/// WHY: The engine runs from a location the recorder controls
#[test]
fn given_shipped_engine_when_installed_then_copied_and_executable() {
    // Given: A shipped engine
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path());
    fs::create_dir_all(dir.path().join("shipped")).unwrap();
    fs::write(&config.source_executable, b"#!/bin/sh\n").unwrap();

    // When: Installed
    let installed = install(&config, "x86_64").unwrap();

    // Then: The copy lives in the install dir and can be executed
    assert_eq!(installed, dir.path().join("bin").join("screenrec-engine"));
    assert!(installed.is_file());
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&installed).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}

/// WHAT: Unsupported CPU is reported as such
/// WHY: It is fatal and not reportable
#[test]
fn given_unsupported_arch_when_installed_then_cpu_not_supported() {
    let dir = tempfile::tempdir().unwrap();

    let (failure, _) = install(&config(dir.path()), "mips").unwrap_err();

    assert_eq!(failure, InstallFailure::CpuNotSupported);
    assert_eq!(failure.kind(), FailureKind::CpuNotSupported);
}

/// WHAT: Missing engine is an installation error
/// WHY: The recorder cannot run without its engine
#[test]
fn given_missing_engine_when_installed_then_installation_error() {
    let dir = tempfile::tempdir().unwrap();

    let (failure, _) = install(&config(dir.path()), "aarch64").unwrap_err();

    assert_eq!(failure, InstallFailure::Installation);
    assert_eq!(failure.kind(), FailureKind::InstallationError);
}
