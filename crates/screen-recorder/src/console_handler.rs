//! Console input handler.
//!
//! Reads one command per line from stdin and posts it to the orchestrator.
//! End of input closes the recorder.

use crate::{AppResult, ConsoleCommand};

use screen_recorder_core::{Command, OrchestratorHandle, ScreenOffSource};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::watch,
};
use tracing::{debug, info, instrument, warn};

pub struct ConsoleHandler {
    handle: OrchestratorHandle,
    screen_off: ScreenOffSource,
}

impl ConsoleHandler {
    pub fn new(handle: OrchestratorHandle, screen_off: ScreenOffSource) -> Self {
        Self { handle, screen_off }
    }

    /// Read commands from stdin.
    #[instrument(skip(self))]
    pub async fn run(&self, shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        self.run_with(BufReader::new(tokio::io::stdin()), shutdown_rx)
            .await
    }

    /// Read commands from `input` until shutdown is signalled or it ends.
    pub async fn run_with<R>(
        &self,
        input: R,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Console handler shutting down");
                    break;
                }
                line = lines.next_line() => match line? {
                    Some(line) => self.handle_line(&line)?,
                    None => {
                        info!("Console input closed, closing recorder");
                        self.handle.command(Command::Close)?;
                        break;
                    }
                },
            }
        }

        Ok(())
    }

    /// Post the command typed on one line. Unknown input is logged and ignored.
    pub fn handle_line(&self, line: &str) -> AppResult<()> {
        if line.trim().is_empty() {
            return Ok(());
        }

        let command = match line.parse::<ConsoleCommand>() {
            Ok(command) => command,
            Err(e) => {
                warn!(%e, "Ignoring console input");
                return Ok(());
            }
        };

        debug!(%command, "Console command");

        match command.command() {
            Some(command) => self.handle.command(command)?,
            None => {
                if !self.screen_off.screen_turned_off() {
                    debug!("Screen-off ignored, not recording with the trigger enabled");
                }
            }
        }

        Ok(())
    }
}
