use std::{fmt, str::FromStr};

use screen_recorder_core::Command;

/// A command typed on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Start recording as soon as the recorder is ready.
    Start,
    /// Stop the current recording.
    Stop,
    /// Shut the recorder down.
    Close,
    /// Dismiss the current error dialog.
    Dismiss,
    /// Retry the last recording without audio.
    MuteRetry,
    /// Decline the muted retry.
    MuteCancel,
    /// Acknowledge the stop help.
    HelpOk,
    /// Simulate the display turning off.
    ScreenOff,
    /// Dismiss the time limit prompt.
    TimeoutOk,
}

impl ConsoleCommand {
    /// Every command with the word that selects it.
    pub const ALL: [ConsoleCommand; 9] = [
        ConsoleCommand::Start,
        ConsoleCommand::Stop,
        ConsoleCommand::Close,
        ConsoleCommand::Dismiss,
        ConsoleCommand::MuteRetry,
        ConsoleCommand::MuteCancel,
        ConsoleCommand::HelpOk,
        ConsoleCommand::ScreenOff,
        ConsoleCommand::TimeoutOk,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConsoleCommand::Start => "start",
            ConsoleCommand::Stop => "stop",
            ConsoleCommand::Close => "close",
            ConsoleCommand::Dismiss => "dismiss",
            ConsoleCommand::MuteRetry => "mute-retry",
            ConsoleCommand::MuteCancel => "mute-cancel",
            ConsoleCommand::HelpOk => "help-ok",
            ConsoleCommand::ScreenOff => "screen-off",
            ConsoleCommand::TimeoutOk => "timeout-ok",
        }
    }

    /// Orchestrator command, or `None` for the screen-off trigger.
    pub fn command(self) -> Option<Command> {
        match self {
            ConsoleCommand::Start => Some(Command::StartWhenReady),
            ConsoleCommand::Stop => Some(Command::Stop),
            ConsoleCommand::Close => Some(Command::Close),
            ConsoleCommand::Dismiss => Some(Command::DismissError { restart: true }),
            ConsoleCommand::MuteRetry => Some(Command::RestartMute { accepted: true }),
            ConsoleCommand::MuteCancel => Some(Command::RestartMute { accepted: false }),
            ConsoleCommand::HelpOk => Some(Command::StopHelpAcknowledged),
            ConsoleCommand::TimeoutOk => Some(Command::TimeoutDismissed),
            ConsoleCommand::ScreenOff => None,
        }
    }
}

impl fmt::Display for ConsoleCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command `{}`", self.0)
    }
}

impl FromStr for ConsoleCommand {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word = s.trim().to_ascii_lowercase();
        ConsoleCommand::ALL
            .into_iter()
            .find(|command| command.as_str() == word)
            .ok_or(UnknownCommand(word))
    }
}
