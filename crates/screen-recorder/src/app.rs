use crate::{AppResult, config::Config, status_renderer::render};

use std::{path::PathBuf, time::Duration};

use screen_recorder_core::{Command, Notification, OrchestratorHandle, Termination};
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};
use tracing::{error, info, instrument, warn};

/// Main application state.
///
/// Owns the console side of the orchestrator: prints notifications,
/// persists setting changes the orchestrator makes, and turns Ctrl-C into
/// an orderly close.
pub struct App {
    pub(crate) config: Config,
    pub(crate) config_path: Option<PathBuf>,
    pub(crate) handle: OrchestratorHandle,
    pub(crate) notification_rx: mpsc::UnboundedReceiver<Notification>,
    pub(crate) orchestrator: JoinHandle<Termination>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
}

impl App {
    /// Run until the orchestrator terminates.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<Termination> {
        info!("Screen recorder starting");

        let termination = loop {
            tokio::select! {
                Some(notification) = self.notification_rx.recv() => {
                    self.on_notification(&notification);
                }

                result = &mut self.orchestrator => {
                    break match result {
                        Ok(termination) => termination,
                        Err(e) => {
                            error!(error = ?e, "Orchestrator task failed");
                            Termination::Fatal
                        }
                    };
                }

                signal = tokio::signal::ctrl_c() => {
                    match signal {
                        Ok(()) => info!("Interrupt received, closing"),
                        Err(e) => warn!(error = ?e, "Failed to listen for interrupt, closing"),
                    }
                    if let Err(e) = self.handle.command(Command::Close) {
                        error!(error = ?e, "Failed to send close command");
                    }
                }
            }
        };

        // Notifications emitted during teardown.
        while let Ok(notification) = self.notification_rx.try_recv() {
            self.on_notification(&notification);
        }

        let _ = self.shutdown_tx.send(true);
        info!(?termination, "Screen recorder shut down");

        Ok(termination)
    }

    fn on_notification(&mut self, notification: &Notification) {
        println!("{}", render(notification));

        let changed = match notification {
            Notification::AudioSourceChanged(source) => self.config.set_audio_source(*source),
            Notification::StopHelp => self.config.mark_stop_help_displayed(),
            _ => false,
        };

        if changed {
            if let Err(e) = self.persist_config() {
                error!(error = ?e, "Failed to save configuration");
            }
        }
    }

    fn persist_config(&self) -> AppResult<()> {
        match &self.config_path {
            Some(path) => self.config.save_to(path),
            None => self.config.save(),
        }
    }
}

/// Best-effort join of a background task during shutdown.
pub(crate) async fn join_with_timeout<T>(name: &str, task: JoinHandle<T>) {
    match tokio::time::timeout(Duration::from_secs(1), task).await {
        Ok(Ok(_)) => info!(task = name, "Stopped cleanly"),
        Ok(Err(e)) => error!(task = name, error = ?e, "Task panicked"),
        Err(_) => info!(
            task = name,
            "Did not stop within timeout, will be cleaned up on exit"
        ),
    }
}
