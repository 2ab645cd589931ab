mod audio_driver_config;
mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod display_config;

pub(crate) use {
    audio_driver_config::AudioDriverConfig, capture_config::CaptureConfig, config::Config,
    display_config::DisplayConfig,
};

pub(crate) const DEFAULT_ENGINE_NAME: &str = "screenrec-engine";
pub(crate) const DEFAULT_ROTATION_DEGREES: i32 = 0;
pub(crate) const DEFAULT_SUPPORTED_ARCHITECTURES: [&str; 4] = ["x86_64", "aarch64", "arm", "x86"];

pub(crate) fn default_rotation_degrees() -> i32 {
    DEFAULT_ROTATION_DEGREES
}

pub(crate) fn default_supported_architectures() -> Vec<String> {
    DEFAULT_SUPPORTED_ARCHITECTURES
        .iter()
        .map(|arch| arch.to_string())
        .collect()
}
