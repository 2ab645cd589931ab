use crate::{DEFAULT_FILE_NAME_FORMAT, RecorderSettings};

use std::{
    fmt::Write,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, TimeZone};
use tracing::{error, warn};

/// Compute the output file for a session starting at `now`.
///
/// The file lives in `settings.output_dir`. If that directory cannot be
/// created the file is placed in `settings.legacy_output_dir` instead,
/// even if the legacy directory cannot be created either; the capture
/// engine then reports the failure as an output-file error.
pub fn output_file<Tz>(settings: &RecorderSettings, now: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let dir = if ensure_dir(&settings.output_dir) {
        settings.output_dir.as_path()
    } else {
        warn!(
            output_dir = ?settings.output_dir,
            legacy_dir = ?settings.legacy_output_dir,
            "Failed to create output directory, falling back to legacy directory"
        );
        if !ensure_dir(&settings.legacy_output_dir) {
            error!(legacy_dir = ?settings.legacy_output_dir, "Failed to create legacy output directory");
        }
        settings.legacy_output_dir.as_path()
    };

    dir.join(file_name(&settings.file_name_format, now))
}

fn ensure_dir(dir: &Path) -> bool {
    dir.is_dir() || fs::create_dir_all(dir).is_ok()
}

fn file_name<Tz>(format: &str, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut name = String::new();
    if write!(name, "{}", now.format(format)).is_err() || name.is_empty() {
        warn!(format, "Invalid file name format, using default");
        name.clear();
        // The default pattern contains only valid specifiers.
        let _ = write!(name, "{}", now.format(DEFAULT_FILE_NAME_FORMAT));
    }
    name
}
