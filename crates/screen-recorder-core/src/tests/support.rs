//! Recording mock ports and a harness around a real orchestrator.

#![allow(clippy::unwrap_used)]

use crate::{
    AudioDriverPort, AudioSource, CaptureEvent, CaptureProcessPort, CoreResult, DeviceRotation,
    DisplayPort, Event, Notification, OrchestratorHandle, RecorderError, RecorderSettings,
    SessionOrchestrator, SessionState, event_queue,
};

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use tempfile::TempDir;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureCall {
    Initialize,
    InitializeWith(PathBuf),
    Start {
        output_path: PathBuf,
        rotation_degrees: u16,
        audio_source: AudioSource,
    },
    Stop,
    Destroy,
}

#[derive(Debug, Default)]
struct CaptureInner {
    calls: Vec<CaptureCall>,
    ready: bool,
    fail_start: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MockCapture {
    inner: Arc<Mutex<CaptureInner>>,
}

impl MockCapture {
    pub fn calls(&self) -> Vec<CaptureCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn count(&self, predicate: impl Fn(&CaptureCall) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    pub fn set_ready(&self, ready: bool) {
        self.inner.lock().unwrap().ready = ready;
    }

    pub fn fail_start(&self) {
        self.inner.lock().unwrap().fail_start = true;
    }

    fn record(&self, call: CaptureCall) {
        self.inner.lock().unwrap().calls.push(call);
    }
}

impl CaptureProcessPort for MockCapture {
    fn initialize(&mut self) -> CoreResult<()> {
        self.record(CaptureCall::Initialize);
        Ok(())
    }

    fn initialize_with(&mut self, executable: &Path) -> CoreResult<()> {
        self.record(CaptureCall::InitializeWith(executable.to_path_buf()));
        Ok(())
    }

    fn start(
        &mut self,
        output_path: &Path,
        rotation_degrees: u16,
        audio_source: AudioSource,
    ) -> CoreResult<()> {
        self.record(CaptureCall::Start {
            output_path: output_path.to_path_buf(),
            rotation_degrees,
            audio_source,
        });
        let mut inner = self.inner.lock().unwrap();
        inner.ready = false;
        if inner.fail_start {
            return Err(RecorderError::port("capture", "start refused"));
        }
        Ok(())
    }

    fn stop(&mut self) -> CoreResult<()> {
        self.record(CaptureCall::Stop);
        Ok(())
    }

    fn destroy(&mut self) {
        self.record(CaptureCall::Destroy);
    }

    fn is_ready(&self) -> bool {
        self.inner.lock().unwrap().ready
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCall {
    Install,
    Uninstall,
    StartRecording,
}

#[derive(Debug, Default)]
struct AudioInner {
    calls: Vec<AudioCall>,
    installed: bool,
    busy: bool,
    fail_uninstall: bool,
}

/// Driver that starts uninstalled; tests drive status events by hand.
#[derive(Debug, Clone, Default)]
pub struct MockAudio {
    inner: Arc<Mutex<AudioInner>>,
}

impl MockAudio {
    pub fn calls(&self) -> Vec<AudioCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: AudioCall) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    pub fn fail_uninstall(&self) {
        self.inner.lock().unwrap().fail_uninstall = true;
    }

    pub fn set_installed(&self, installed: bool) {
        let mut inner = self.inner.lock().unwrap();
        inner.installed = installed;
        inner.busy = false;
    }
}

impl AudioDriverPort for MockAudio {
    fn install(&mut self) -> CoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(AudioCall::Install);
        inner.busy = true;
        Ok(())
    }

    fn uninstall(&mut self) -> CoreResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(AudioCall::Uninstall);
        if inner.fail_uninstall {
            return Err(RecorderError::port("audio", "uninstall refused"));
        }
        inner.busy = true;
        Ok(())
    }

    fn start_recording(&mut self) {
        self.inner.lock().unwrap().calls.push(AudioCall::StartRecording);
    }

    fn is_ready(&self) -> bool {
        self.inner.lock().unwrap().installed
    }

    fn should_install(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        !inner.installed && !inner.busy
    }

    fn should_uninstall(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.installed && !inner.busy
    }
}

#[derive(Debug, Default)]
struct DisplayInner {
    rotation: DeviceRotation,
    applied: Vec<bool>,
    restored: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MockDisplay {
    inner: Arc<Mutex<DisplayInner>>,
}

impl MockDisplay {
    pub fn set_rotation(&self, rotation: DeviceRotation) {
        self.inner.lock().unwrap().rotation = rotation;
    }

    pub fn applied(&self) -> Vec<bool> {
        self.inner.lock().unwrap().applied.clone()
    }

    pub fn restored(&self) -> usize {
        self.inner.lock().unwrap().restored
    }
}

impl DisplayPort for MockDisplay {
    fn rotation(&self) -> DeviceRotation {
        self.inner.lock().unwrap().rotation
    }

    fn apply_show_touches(&mut self, show_touches: bool) {
        self.inner.lock().unwrap().applied.push(show_touches);
    }

    fn restore_show_touches(&mut self) {
        self.inner.lock().unwrap().restored += 1;
    }
}

pub type TestOrchestrator = SessionOrchestrator<MockCapture, MockAudio, MockDisplay>;

pub struct Harness {
    pub orchestrator: TestOrchestrator,
    pub handle: OrchestratorHandle,
    pub notifications: mpsc::UnboundedReceiver<Notification>,
    pub capture: MockCapture,
    pub audio: MockAudio,
    pub display: MockDisplay,
    pub dir: TempDir,
}

impl Harness {
    /// Orchestrator in `Installing`, stop help already shown.
    pub fn new() -> Self {
        Self::with_settings(|_| {})
    }

    pub fn with_settings(configure: impl FnOnce(&mut RecorderSettings)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = RecorderSettings::new(dir.path().join("recordings"));
        settings.legacy_output_dir = dir.path().join("legacy");
        settings.stop_help_displayed = true;
        configure(&mut settings);

        let (handle, queue) = event_queue();
        let (notification_tx, notifications) = mpsc::unbounded_channel();
        let capture = MockCapture::default();
        let audio = MockAudio::default();
        let display = MockDisplay::default();

        let orchestrator = SessionOrchestrator::new(
            settings,
            capture.clone(),
            audio.clone(),
            display.clone(),
            queue,
            notification_tx,
        );

        Self {
            orchestrator,
            handle,
            notifications,
            capture,
            audio,
            display,
            dir,
        }
    }

    /// Drive the orchestrator from `Installing` to `Ready`.
    pub fn make_ready(&mut self) {
        self.send(Event::ExecutableInstalled(PathBuf::from("/opt/engine")));
        self.capture.set_ready(true);
        self.send(CaptureEvent::Ready);
        assert_eq!(self.orchestrator.state(), SessionState::Ready);
        self.drain();
    }

    /// Drive the orchestrator to `Recording`.
    pub fn make_recording(&mut self) {
        self.make_ready();
        self.send(crate::Command::Start);
        self.send(CaptureEvent::Started);
        assert_eq!(self.orchestrator.state(), SessionState::Recording);
        self.drain();
    }

    pub fn send(&mut self, event: impl Into<Event>) {
        self.orchestrator.handle(event.into());
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        let mut drained = Vec::new();
        while let Ok(notification) = self.notifications.try_recv() {
            drained.push(notification);
        }
        drained
    }

    pub fn output_path(&self) -> PathBuf {
        self.orchestrator
            .session()
            .map(|session| session.output_path.clone())
            .unwrap()
    }
}
