//! Session orchestrator: the single owner of recorder state.
//!
//! Every command, port callback, timer tick, and screen-off signal arrives
//! as an [`Event`] on one serial queue. Each event is handled to
//! completion before the next is read, so a transition and its side
//! effects are atomic with respect to everything else.

use crate::{
    AudioDriverPort, AudioSource, CaptureEvent, CaptureProcessPort, Command, DisplayPort,
    ErrorReport, Event, EventQueue, FailureKind, InstallationStatus, Notification,
    OrchestratorHandle, RecorderSettings, RecordingOutcome, RecordingSession, RecordingTimer,
    Recovery, Salvage, ScreenOffSource, ScreenOffTrigger, SessionState, output_file,
};

use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

/// Small intent flags owned by the orchestrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingIntentFlags {
    /// A start request arrived before the recorder was ready.
    pub start_on_ready: bool,
    /// A close request is in flight.
    pub closing: bool,
    /// Teardown has happened; all further events are ignored.
    pub destroyed: bool,
    /// Close already asked the audio driver to uninstall.
    pub uninstall_requested: bool,
    /// The next session records without audio.
    pub temporary_mute: bool,
    /// The time limit prompt is on screen.
    pub timeout_displayed: bool,
}

/// Why the orchestrator stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Orderly close.
    Closed,
    /// Unrecoverable error.
    Fatal,
    /// Every handle to the queue was dropped.
    Disconnected,
}

/// Owns session state and drives the capture engine and audio driver.
pub struct SessionOrchestrator<C, A, D> {
    settings: RecorderSettings,
    capture: C,
    audio: A,
    display: D,
    timer: RecordingTimer,
    screen_off: ScreenOffTrigger,
    queue: EventQueue,
    notification_tx: mpsc::UnboundedSender<Notification>,
    state: SessionState,
    session: Option<RecordingSession>,
    flags: PendingIntentFlags,
    termination: Option<Termination>,
}

impl<C, A, D> SessionOrchestrator<C, A, D>
where
    C: CaptureProcessPort,
    A: AudioDriverPort,
    D: DisplayPort,
{
    /// Create an orchestrator in the `Installing` state.
    pub fn new(
        settings: RecorderSettings,
        capture: C,
        audio: A,
        display: D,
        queue: EventQueue,
        notification_tx: mpsc::UnboundedSender<Notification>,
    ) -> Self {
        Self {
            settings,
            capture,
            audio,
            display,
            timer: RecordingTimer::new(queue.weak_sender()),
            screen_off: ScreenOffTrigger::new(),
            queue,
            notification_tx,
            state: SessionState::Installing,
            session: None,
            flags: PendingIntentFlags::default(),
            termination: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current intent flags.
    pub fn flags(&self) -> PendingIntentFlags {
        self.flags
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&RecordingSession> {
        self.session.as_ref()
    }

    /// Settings as currently applied (including the mute fallback).
    pub fn settings(&self) -> &RecorderSettings {
        &self.settings
    }

    /// Set once teardown has happened.
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    /// The capture engine port.
    pub fn capture(&self) -> &C {
        &self.capture
    }

    /// The audio driver port.
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// The display port.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// The recording timer.
    pub fn timer(&self) -> &RecordingTimer {
        &self.timer
    }

    /// The screen-off trigger registration.
    pub fn screen_off(&self) -> &ScreenOffTrigger {
        &self.screen_off
    }

    /// Source end of the screen-off trigger for the platform hook.
    pub fn screen_off_source(&self, handle: &OrchestratorHandle) -> ScreenOffSource {
        self.screen_off.source(handle.clone())
    }

    /// Consume the event queue until teardown or until every handle is dropped.
    #[instrument(skip(self))]
    pub async fn run(mut self) -> Termination {
        info!(state = %self.state, "Session orchestrator running");
        self.notify(Notification::StatusChanged(self.state));

        while let Some(event) = self.queue.recv().await {
            self.handle(event);
            if let Some(termination) = self.termination {
                info!(?termination, "Session orchestrator stopped");
                return termination;
            }
        }

        warn!("All orchestrator handles dropped, shutting down");
        self.terminate(false);
        Termination::Disconnected
    }

    /// Handle every event already queued without waiting for more.
    ///
    /// Returns the number of events handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while self.termination.is_none() {
            let Some(event) = self.queue.try_recv() else {
                break;
            };
            self.handle(event);
            handled += 1;
        }
        handled
    }

    /// Handle a single event on the queue context.
    pub fn handle(&mut self, event: Event) {
        if self.flags.destroyed {
            debug!(?event, "Ignoring event after teardown");
            return;
        }

        match event {
            Event::Command(command) => self.handle_command(command),
            Event::Capture(event) => self.handle_capture_event(event),
            Event::ExecutableInstalled(executable) => self.on_executable_installed(executable),
            Event::AudioDriver(status) => self.on_audio_install_status(status),
            Event::TimerElapsed { generation } => {
                if self.timer.take_elapsed(generation) {
                    self.on_timeout();
                }
            }
            Event::ScreenOff => {
                if self.screen_off.is_registered() {
                    info!("Display turned off, stopping recording");
                    self.stop();
                } else {
                    debug!("Screen-off event after trigger was unregistered");
                }
            }
        }
    }

    fn handle_command(&mut self, command: Command) {
        debug!(?command, state = %self.state, "Command received");

        match command {
            Command::Start => self.start(),
            Command::StartWhenReady => self.start_when_ready(),
            Command::Stop => self.stop(),
            Command::Close => self.close(),
            Command::SetReady => self.notify_ready(),
            Command::Reinitialize => self.reinitialize(),
            Command::DismissError { restart } => self.on_error_dismissed(restart),
            Command::RestartMute { accepted } => self.on_restart_mute(accepted),
            Command::StopHelpAcknowledged => self.start(),
            Command::TimeoutDismissed => self.flags.timeout_displayed = false,
        }
    }

    fn handle_capture_event(&mut self, event: CaptureEvent) {
        match event {
            CaptureEvent::Ready => self.notify_ready(),
            CaptureEvent::Started => self.on_started(),
            CaptureEvent::Finished(outcome) => self.on_finished(outcome, false),
            CaptureEvent::Error(kind, outcome) => self.on_failure(kind, outcome),
        }
    }

    /// Begin a recording. Dropped unless the recorder is `Ready`.
    #[instrument(skip(self))]
    pub fn start(&mut self) {
        if self.state != SessionState::Ready {
            // The UI is not told about dropped start requests.
            debug!(state = %self.state, "Start ignored, recorder not ready");
            return;
        }

        if !self.settings.stop_help_displayed {
            self.settings.stop_help_displayed = true;
            info!("Showing stop help before the first recording");
            self.notify(Notification::StopHelp);
            return;
        }

        self.set_state(SessionState::Starting);

        if let Some(limit) = self.settings.time_limit() {
            self.timer.start(limit);
        }
        self.display.apply_show_touches(self.settings.show_touches);
        if self.settings.stop_on_screen_off {
            self.screen_off.register();
        }
        self.audio.start_recording();

        let audio_source = self.effective_audio_source();
        let output_path = output_file(&self.settings, &Local::now());
        let session = RecordingSession::new(
            output_path,
            self.display.rotation(),
            Utc::now().timestamp_millis(),
            audio_source,
        );

        info!(
            session_id = %session.id,
            output_path = ?session.output_path,
            rotation = session.rotation_degrees,
            ?audio_source,
            "Starting recording"
        );

        let result = self.capture.start(
            &session.output_path,
            session.rotation_degrees,
            audio_source,
        );
        self.session = Some(session);

        if let Err(e) = result {
            error!(error = ?e, "Capture engine rejected start");
            self.on_failure(FailureKind::StartupError, RecordingOutcome::exited(-1));
        }
    }

    /// Start now if ready, otherwise as soon as `Ready` is entered.
    #[instrument(skip(self))]
    pub fn start_when_ready(&mut self) {
        if self.state == SessionState::Ready {
            self.start();
        } else {
            debug!(state = %self.state, "Deferring start until ready");
            self.flags.start_on_ready = true;
        }
    }

    /// Ask the capture engine to finish. No-op unless starting or recording.
    #[instrument(skip(self))]
    pub fn stop(&mut self) {
        if !self.state.is_capturing() {
            debug!(state = %self.state, "Stop ignored, not recording");
            return;
        }

        self.set_state(SessionState::Stopping);
        if let Err(e) = self.capture.stop() {
            // The engine still owes a terminal callback; keep waiting for it.
            warn!(error = ?e, "Capture engine rejected stop");
        }
        self.timer.reset();
    }

    /// Orderly shutdown. Idempotent.
    #[instrument(skip(self))]
    pub fn close(&mut self) {
        if self.flags.closing {
            debug!("Close already in progress");
            return;
        }

        self.flags.closing = true;
        if self.state.is_capturing() {
            self.stop();
        }
        self.flags.start_on_ready = false;

        if self.audio.should_uninstall() {
            info!("Uninstalling audio driver before exit");
            self.flags.uninstall_requested = true;
            if let Err(e) = self.audio.uninstall() {
                warn!(error = ?e, "Audio driver uninstall failed");
                self.terminate(false);
            }
        } else {
            self.terminate(false);
        }
    }

    /// Enter `Ready` if both the capture engine and the audio driver are ready.
    ///
    /// Otherwise installs the audio driver when it is needed and missing.
    #[instrument(skip(self))]
    pub fn notify_ready(&mut self) {
        if self.flags.closing
            || self.state.is_capturing()
            || matches!(
                self.state,
                SessionState::Stopping | SessionState::UninstallingAudio
            )
        {
            debug!(state = %self.state, closing = self.flags.closing, "Readiness check skipped");
            return;
        }

        let capture_ready = self.capture.is_ready();
        let audio_ready = self.audio_ready();

        if capture_ready && audio_ready {
            self.set_state(SessionState::Ready);
            if self.flags.start_on_ready {
                self.flags.start_on_ready = false;
                self.start();
            }
        } else if self.effective_audio_source().requires_driver() && self.audio.should_install()
        {
            info!("Installing audio driver");
            if let Err(e) = self.audio.install() {
                error!(error = ?e, "Audio driver install could not be started");
                self.on_audio_driver_failure(FailureKind::AudioDriverInstallation);
            }
        } else {
            debug!(capture_ready, audio_ready, "Recorder not ready yet");
        }
    }

    /// Return to a clean, recordable baseline.
    #[instrument(skip(self))]
    pub fn reinitialize(&mut self) {
        self.timer.reset();
        self.screen_off.unregister();

        if self.state == SessionState::Installing {
            debug!("Capture engine not installed yet, nothing to reinitialize");
            return;
        }

        self.set_state(SessionState::Initializing);
        if let Err(e) = self.capture.initialize() {
            error!(error = ?e, "Capture engine failed to initialize");
            self.on_failure(FailureKind::StartupError, RecordingOutcome::exited(-1));
        }
    }

    fn on_executable_installed(&mut self, executable: PathBuf) {
        info!(executable = ?executable, "Capture engine installed");

        self.set_state(SessionState::Initializing);
        if let Err(e) = self.capture.initialize_with(&executable) {
            error!(error = ?e, "Capture engine failed to initialize");
            self.on_failure(FailureKind::StartupError, RecordingOutcome::exited(-1));
        }
    }

    fn on_started(&mut self) {
        match self.state {
            SessionState::Starting => {
                if let Some(session) = &self.session {
                    info!(session_id = %session.id, "Recording started");
                }
                self.set_state(SessionState::Recording);
            }
            other => debug!(state = %other, "Ignoring start confirmation"),
        }
    }

    fn on_finished(&mut self, outcome: RecordingOutcome, max_file_size_reached: bool) {
        self.flags.temporary_mute = false;

        match self.session.take() {
            Some(session) => {
                self.save_output(&session, max_file_size_reached);
                self.report_stats(&session, outcome);
            }
            None => warn!("Capture engine finished without an active session"),
        }

        self.display.restore_show_touches();
        self.reinitialize();
    }

    fn on_failure(&mut self, kind: FailureKind, outcome: RecordingOutcome) {
        let policy = kind.policy();
        warn!(
            ?kind,
            exit_value = outcome.exit_value,
            recovery = ?policy.recovery,
            "Capture failure"
        );

        match policy.recovery {
            Recovery::Success => self.on_finished(outcome, true),
            Recovery::MuteRetry => {
                self.flags.temporary_mute = false;
                self.session = None;
                self.clear_recording_side_effects();
                self.notify(Notification::MicrophoneBusy);
                self.reinitialize();
            }
            Recovery::Restart => {
                self.flags.temporary_mute = false;
                let session = self.session.take();

                self.set_state(SessionState::Error);
                self.surface_error(
                    kind,
                    outcome.exit_value,
                    session.as_ref().map(|s| s.output_path.as_path()),
                );

                if let Some(session) = &session {
                    self.salvage(policy.salvage, session, outcome);
                }
                self.reinitialize();
            }
            Recovery::Fatal => {
                let session = self.session.take();

                self.set_state(SessionState::Error);
                self.surface_error(
                    kind,
                    outcome.exit_value,
                    session.as_ref().map(|s| s.output_path.as_path()),
                );
                self.terminate(true);
            }
        }
    }

    fn on_audio_install_status(&mut self, status: InstallationStatus) {
        debug!(?status, state = %self.state, "Audio driver status");

        if self.flags.closing
            && !matches!(
                status,
                InstallationStatus::Installing | InstallationStatus::Uninstalling
            )
        {
            self.terminate(false);
            return;
        }

        match status {
            InstallationStatus::InstallationFailure => {
                self.on_audio_driver_failure(FailureKind::AudioDriverInstallation)
            }
            InstallationStatus::Unstable => {
                self.on_audio_driver_failure(FailureKind::AudioDriverUnstable)
            }
            InstallationStatus::Installing => self.set_state(SessionState::InstallingAudio),
            InstallationStatus::Uninstalling => self.set_state(SessionState::UninstallingAudio),
            InstallationStatus::Installed
            | InstallationStatus::NotInstalled
            | InstallationStatus::Unspecified => self.notify_ready(),
        }
    }

    fn on_audio_driver_failure(&mut self, kind: FailureKind) {
        self.settings.audio_source = AudioSource::Mute;
        self.notify(Notification::AudioSourceChanged(AudioSource::Mute));

        // A running session keeps going; it will reinitialize when it ends.
        if !self.state.is_capturing() && self.state != SessionState::Stopping {
            self.set_state(SessionState::Error);
        }
        self.surface_error(kind, 0, None);
    }

    fn on_error_dismissed(&mut self, restart: bool) {
        if restart && self.state == SessionState::Error {
            self.reinitialize();
        } else {
            debug!(restart, state = %self.state, "Error dismissed");
        }
    }

    fn on_restart_mute(&mut self, accepted: bool) {
        if accepted {
            info!("Retrying recording without audio");
            self.flags.temporary_mute = true;
            self.start_when_ready();
        } else {
            self.display.restore_show_touches();
        }
    }

    fn on_timeout(&mut self) {
        info!("Recording time limit reached");
        self.flags.timeout_displayed = true;
        self.notify(Notification::TimeoutWarning);
    }

    fn salvage(&mut self, salvage: Salvage, session: &RecordingSession, outcome: RecordingOutcome) {
        let keep = match salvage {
            Salvage::Never => false,
            Salvage::IfNonEmpty => session.has_output(),
            Salvage::Always => true,
        };

        if keep {
            info!(session_id = %session.id, "Salvaging partial recording");
            self.save_output(session, false);
            self.report_stats(session, outcome);
        }
    }

    fn save_output(&mut self, session: &RecordingSession, max_file_size_reached: bool) {
        self.notify(Notification::OutputSaved {
            output_path: session.output_path.clone(),
            max_file_size_reached,
        });
    }

    fn report_stats(&mut self, session: &RecordingSession, mut outcome: RecordingOutcome) {
        let size_kb = session.output_size_kb();
        let duration_secs = session.elapsed_secs(Utc::now().timestamp_millis());
        outcome.size_kb = Some(size_kb);
        outcome.duration_secs = Some(duration_secs);

        info!(
            session_id = %session.id,
            size_kb,
            duration_secs,
            exit_value = outcome.exit_value,
            "Recording stats"
        );

        self.notify(Notification::SessionFinished {
            output_path: session.output_path.clone(),
            size_kb,
            duration_secs,
        });
    }

    fn surface_error(&mut self, kind: FailureKind, exit_value: i32, output_path: Option<&Path>) {
        let policy = kind.policy();
        self.clear_recording_side_effects();

        let report = ErrorReport {
            message: kind.message(exit_value, output_path),
            title: kind.title().to_string(),
            restart: policy.recovery != Recovery::Fatal,
            reportable: policy.reportable,
            code: kind.code(exit_value),
        };

        warn!(
            title = %report.title,
            message = %report.message,
            code = report.code,
            restart = report.restart,
            "Surfacing error"
        );
        self.notify(Notification::Error(report));
    }

    fn clear_recording_side_effects(&mut self) {
        self.display.restore_show_touches();
        self.timer.reset();
        self.screen_off.unregister();
    }

    fn terminate(&mut self, fatal: bool) {
        if self.flags.destroyed {
            return;
        }

        info!(fatal, state = %self.state, "Tearing down");

        if self.state.is_capturing() {
            self.stop();
        }
        self.flags.start_on_ready = false;
        self.timer.reset();
        self.screen_off.unregister();
        self.capture.destroy();
        self.display.restore_show_touches();
        if !self.flags.uninstall_requested && self.audio.should_uninstall() {
            self.flags.uninstall_requested = true;
            if let Err(e) = self.audio.uninstall() {
                warn!(error = ?e, "Audio driver uninstall failed during teardown");
            }
        }

        self.session = None;
        self.flags.destroyed = true;
        self.notify(Notification::Terminated { fatal });
        self.termination = Some(if fatal {
            Termination::Fatal
        } else {
            Termination::Closed
        });
    }

    fn effective_audio_source(&self) -> AudioSource {
        if self.flags.temporary_mute {
            AudioSource::Mute
        } else {
            self.settings.audio_source
        }
    }

    fn audio_ready(&self) -> bool {
        !self.effective_audio_source().requires_driver() || self.audio.is_ready()
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            info!(from = %self.state, to = %state, "State changed");
        }
        self.state = state;

        if !self.flags.destroyed {
            self.notify(Notification::StatusChanged(state));
        }
    }

    fn notify(&self, notification: Notification) {
        if self.notification_tx.send(notification).is_err() {
            debug!("Notification receiver dropped");
        }
    }
}
