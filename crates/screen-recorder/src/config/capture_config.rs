use crate::config::default_supported_architectures;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Capture engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Engine executable shipped with the application.
    pub source_executable: PathBuf,

    /// Directory the engine is installed into before first use.
    pub install_dir: PathBuf,

    /// Extra arguments passed to every engine process.
    #[serde(default)]
    pub args: Vec<String>,

    /// CPU architectures the shipped engine runs on.
    #[serde(default = "default_supported_architectures")]
    pub supported_architectures: Vec<String>,
}
