//! Screen Recorder: console front end for the recording session orchestrator.

mod app;
mod config;
mod console_command;
mod console_handler;
mod error;
mod executable_installer;
mod headless_display;
mod process_engine;
mod script_audio_driver;
mod status_renderer;
#[cfg(test)]
mod tests;

pub(crate) use {
    app::App,
    console_command::ConsoleCommand,
    console_handler::ConsoleHandler,
    error::{AppError, Result as AppResult},
    executable_installer::ExecutableInstaller,
    headless_display::HeadlessDisplay,
    process_engine::ProcessCaptureEngine,
    script_audio_driver::ScriptAudioDriver,
};

use crate::config::Config;

use std::{path::PathBuf, time::Duration};

use screen_recorder_core::{SessionOrchestrator, Termination, event_queue};
use tokio::sync::{mpsc, watch};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// An optional first argument names a config file to use instead of the
/// one in the platform config directory.
fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("screen_recorder=info,screen_recorder_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let loaded = match &config_path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    let termination = rt.block_on(run(config, config_path));

    // Stdin reads block a runtime thread until the next line arrives.
    rt.shutdown_timeout(Duration::from_secs(1));

    match termination {
        Ok(Termination::Fatal) => std::process::exit(1),
        Ok(_) => {}
        Err(e) => {
            error!(error = ?e, "App error");
            std::process::exit(1);
        }
    }
}

async fn run(config: Config, config_path: Option<PathBuf>) -> AppResult<Termination> {
    let (handle, queue) = event_queue();
    let (notification_tx, notification_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let capture = ProcessCaptureEngine::new(config.capture.clone(), handle.clone());
    let engine_exit = capture.exit_signal();
    let audio = ScriptAudioDriver::new(config.audio_driver.clone(), handle.clone());
    let display = HeadlessDisplay::new(&config.display);

    let orchestrator = SessionOrchestrator::new(
        config.recording.clone(),
        capture,
        audio,
        display,
        queue,
        notification_tx,
    );
    let console = ConsoleHandler::new(handle.clone(), orchestrator.screen_off_source(&handle));

    let installer = ExecutableInstaller::new(config.capture.clone(), handle.clone()).spawn();
    let orchestrator = tokio::spawn(orchestrator.run());

    let app = App {
        config,
        config_path,
        handle,
        notification_rx,
        orchestrator,
        shutdown_tx,
    };

    let ((), app_result) = tokio::join!(
        async {
            if let Err(e) = console.run(shutdown_rx).await {
                error!(error = ?e, "Console handler error");
            }
        },
        app.run()
    );

    app::join_with_timeout("executable installer", installer).await;

    // The engine may still be finalizing the last recording.
    let grace = process_engine::ENGINE_STOP_GRACE + Duration::from_secs(1);
    if tokio::time::timeout(grace, engine_exit.wait()).await.is_err() {
        warn!("Capture engine still running at exit");
    }

    app_result
}
