use serde::{Deserialize, Serialize};

/// Internal audio driver configuration.
///
/// Without an install command the driver is considered always ready.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDriverConfig {
    /// Shell command that installs the driver.
    #[serde(default)]
    pub install_command: Option<String>,

    /// Shell command that removes the driver.
    #[serde(default)]
    pub uninstall_command: Option<String>,
}
