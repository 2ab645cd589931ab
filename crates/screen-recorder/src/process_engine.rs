//! Capture engine driven as a child process.
//!
//! One engine process is spawned per session by `initialize`. The engine
//! prints `ready` once it can accept a start, and `recording` once capture
//! has begun. Commands are written to its stdin one per line:
//! `start <rotation> <audio> <output path>` and `stop`. The exit code
//! classifies how the session ended.
//!
//! Destroying the engine flushes queued commands and closes its stdin. The
//! engine then has [`ENGINE_STOP_GRACE`] to finalize its output and exit
//! before it is killed.

use crate::config::CaptureConfig;

use std::{
    path::{Path, PathBuf},
    process::Stdio,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use screen_recorder_core::{
    AudioSource, CaptureEvent, CaptureProcessPort, CoreResult, FailureKind, OrchestratorHandle,
    RecorderError, RecordingOutcome,
};
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    process::{Child, ChildStdin, Command},
    runtime::Handle,
    sync::{mpsc, watch},
    task::JoinHandle,
    time::Instant,
};
use tracing::{debug, info, instrument, warn};

pub const EXIT_OUTPUT_FILE_ERROR: i32 = 201;
pub const EXIT_MICROPHONE_BUSY: i32 = 202;
pub const EXIT_OPEN_GL_ERROR: i32 = 203;
pub const EXIT_SECURE_SURFACE_ERROR: i32 = 204;
pub const EXIT_AUDIO_CONFIG_ERROR: i32 = 205;
pub const EXIT_MEDIA_RECORDER_ERROR: i32 = 206;
pub const EXIT_MAX_FILE_SIZE_REACHED: i32 = 207;
pub const EXIT_CPU_NOT_SUPPORTED: i32 = 208;
pub const EXIT_UNSUPPORTED_PLATFORM: i32 = 209;
pub const EXIT_PRIVILEGED_ACCESS_UNAVAILABLE: i32 = 210;

/// How long a released engine may take to exit before it is killed.
pub const ENGINE_STOP_GRACE: Duration = Duration::from_secs(5);

/// Map an engine exit code onto the terminal capture callback.
///
/// Unknown codes are startup errors if the engine never received `start`,
/// and generic recording errors otherwise. A clean exit is only a finished
/// recording once `start` was sent.
pub fn classify_exit(exit_value: i32, start_sent: bool) -> CaptureEvent {
    let outcome = RecordingOutcome::exited(exit_value);

    let kind = match exit_value {
        0 if start_sent => return CaptureEvent::Finished(outcome),
        0 => FailureKind::StartupError,
        EXIT_OUTPUT_FILE_ERROR => FailureKind::OutputFileError,
        EXIT_MICROPHONE_BUSY => FailureKind::MicrophoneBusy,
        EXIT_OPEN_GL_ERROR => FailureKind::OpenGlError,
        EXIT_SECURE_SURFACE_ERROR => FailureKind::SecureSurfaceError,
        EXIT_AUDIO_CONFIG_ERROR => FailureKind::AudioConfigError,
        EXIT_MEDIA_RECORDER_ERROR => FailureKind::MediaRecorderError,
        EXIT_MAX_FILE_SIZE_REACHED => FailureKind::MaxFileSizeReached,
        EXIT_CPU_NOT_SUPPORTED => FailureKind::CpuNotSupported,
        EXIT_UNSUPPORTED_PLATFORM => FailureKind::UnsupportedPlatform,
        EXIT_PRIVILEGED_ACCESS_UNAVAILABLE => FailureKind::PrivilegedAccessUnavailable,
        _ if start_sent => FailureKind::RecordingError,
        _ => FailureKind::StartupError,
    };

    CaptureEvent::Error(kind, outcome)
}

/// Command line written to the engine to begin capturing.
pub fn start_line(output_path: &Path, rotation_degrees: u16, audio_source: AudioSource) -> String {
    let audio = match audio_source {
        AudioSource::Mic => "mic",
        AudioSource::Internal => "internal",
        AudioSource::Mute => "mute",
    };
    format!("start {} {} {}", rotation_degrees, audio, output_path.display())
}

/// State shared between the port and the supervising task.
#[derive(Debug, Default)]
struct EngineShared {
    ready: AtomicBool,
    start_sent: AtomicBool,
    destroyed: AtomicBool,
}

impl EngineShared {
    fn post(&self, handle: &OrchestratorHandle, event: CaptureEvent) {
        if self.destroyed.load(Ordering::Acquire) {
            debug!(?event, "Engine destroyed, dropping callback");
            return;
        }
        if let Err(e) = handle.capture(event) {
            warn!(error = ?e, "Failed to post capture event");
        }
    }

    fn on_line(&self, line: &str, handle: &OrchestratorHandle) {
        match line.trim() {
            "ready" => {
                self.ready.store(true, Ordering::Release);
                self.post(handle, CaptureEvent::Ready);
            }
            "recording" => self.post(handle, CaptureEvent::Started),
            "" => {}
            other => debug!(line = other, "Engine output"),
        }
    }
}

struct EngineProcess {
    commands: mpsc::UnboundedSender<String>,
    shared: Arc<EngineShared>,
    task: JoinHandle<()>,
}

/// Resolves once no engine process is left running.
#[derive(Debug, Clone)]
pub struct EngineExit(watch::Receiver<bool>);

impl EngineExit {
    pub async fn wait(mut self) {
        let _ = self.0.wait_for(|exited| *exited).await;
    }
}

/// [`CaptureProcessPort`] backed by a child process.
pub struct ProcessCaptureEngine {
    config: CaptureConfig,
    handle: OrchestratorHandle,
    executable: Option<PathBuf>,
    process: Option<EngineProcess>,
    exited: Arc<watch::Sender<bool>>,
    destroyed: bool,
}

impl ProcessCaptureEngine {
    pub fn new(config: CaptureConfig, handle: OrchestratorHandle) -> Self {
        Self {
            config,
            handle,
            executable: None,
            process: None,
            exited: Arc::new(watch::channel(true).0),
            destroyed: false,
        }
    }

    /// Signal for waiting on the engine process during shutdown.
    pub fn exit_signal(&self) -> EngineExit {
        EngineExit(self.exited.subscribe())
    }

    #[instrument(skip(self))]
    fn spawn_process(&mut self) -> CoreResult<()> {
        if self.destroyed {
            return Err(RecorderError::port("capture", "engine destroyed"));
        }
        let executable = self
            .executable
            .clone()
            .ok_or_else(|| RecorderError::port("capture", "engine not installed"))?;
        let runtime = Handle::try_current()
            .map_err(|e| RecorderError::port("capture", format!("no async runtime: {}", e)))?;

        self.kill_process();

        let mut child = {
            let _guard = runtime.enter();
            Command::new(&executable)
                .args(&self.config.args)
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .kill_on_drop(true)
                .spawn()?
        };

        let stdin = child.stdin.take();
        let (commands, command_rx) = mpsc::unbounded_channel();
        let shared = Arc::new(EngineShared::default());

        self.exited.send_replace(false);
        let task = runtime.spawn(supervise(
            child,
            stdin,
            command_rx,
            Arc::clone(&shared),
            self.handle.clone(),
            Arc::clone(&self.exited),
        ));

        info!(executable = ?executable, "Capture engine process spawned");

        self.process = Some(EngineProcess {
            commands,
            shared,
            task,
        });

        Ok(())
    }

    fn send(&self, line: String) -> CoreResult<()> {
        let process = self
            .process
            .as_ref()
            .ok_or_else(|| RecorderError::port("capture", "engine not running"))?;

        process
            .commands
            .send(line)
            .map_err(|_| RecorderError::port("capture", "engine process exited"))
    }

    fn kill_process(&mut self) {
        if let Some(process) = self.process.take() {
            process.shared.destroyed.store(true, Ordering::Release);
            process.task.abort();
            self.exited.send_replace(true);
            debug!("Previous engine process discarded");
        }
    }

    /// Detach the process and let it finish the commands already queued.
    fn release_process(&mut self) {
        if let Some(process) = self.process.take() {
            process.shared.destroyed.store(true, Ordering::Release);
            // Dropping the sender tells the supervisor to close stdin.
            drop(process.commands);
            debug!("Engine process released");
        }
    }
}

impl CaptureProcessPort for ProcessCaptureEngine {
    fn initialize(&mut self) -> CoreResult<()> {
        self.spawn_process()
    }

    fn initialize_with(&mut self, executable: &Path) -> CoreResult<()> {
        self.executable = Some(executable.to_path_buf());
        self.spawn_process()
    }

    fn start(
        &mut self,
        output_path: &Path,
        rotation_degrees: u16,
        audio_source: AudioSource,
    ) -> CoreResult<()> {
        if !self.is_ready() {
            return Err(RecorderError::port("capture", "engine not ready"));
        }

        self.send(start_line(output_path, rotation_degrees, audio_source))?;

        if let Some(process) = &self.process {
            process.shared.ready.store(false, Ordering::Release);
            process.shared.start_sent.store(true, Ordering::Release);
        }
        Ok(())
    }

    fn stop(&mut self) -> CoreResult<()> {
        self.send("stop".to_string())
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            info!("Destroying capture engine");
            self.destroyed = true;
            self.release_process();
        }
    }

    fn is_ready(&self) -> bool {
        self.process
            .as_ref()
            .is_some_and(|process| process.shared.ready.load(Ordering::Acquire))
    }
}

impl Drop for ProcessCaptureEngine {
    fn drop(&mut self) {
        self.kill_process();
    }
}

/// Forward commands to the engine, parse its output, and report its exit.
async fn supervise(
    mut child: Child,
    mut stdin: Option<ChildStdin>,
    mut commands: mpsc::UnboundedReceiver<String>,
    shared: Arc<EngineShared>,
    handle: OrchestratorHandle,
    exited: Arc<watch::Sender<bool>>,
) {
    let mut lines = child.stdout.take().map(|stdout| BufReader::new(stdout).lines());
    let mut released = false;
    let mut kill_at = None;

    let status = loop {
        tokio::select! {
            line = next_line(&mut lines) => match line {
                Some(line) => shared.on_line(&line, &handle),
                None => lines = None,
            },

            command = commands.recv(), if !released => match command {
                Some(command) => write_command(&mut stdin, &command).await,
                None => {
                    released = true;
                    stdin = None;
                    kill_at = Some(Instant::now() + ENGINE_STOP_GRACE);
                    debug!("Engine stdin closed, waiting for exit");
                }
            },

            () = deadline(kill_at) => {
                warn!("Engine did not exit in time, killing");
                kill_at = None;
                if let Err(e) = child.start_kill() {
                    warn!(error = ?e, "Failed to kill engine process");
                }
            }

            status = child.wait() => break status,
        }
    };

    // Output written just before exit is still meaningful.
    if let Some(reader) = lines.as_mut() {
        while let Ok(Some(line)) = reader.next_line().await {
            shared.on_line(&line, &handle);
        }
    }

    let exit_value = match status {
        Ok(status) => status.code().unwrap_or(-1),
        Err(e) => {
            warn!(error = ?e, "Failed to wait for engine process");
            -1
        }
    };

    let start_sent = shared.start_sent.load(Ordering::Acquire);
    info!(exit_value, start_sent, "Capture engine process exited");

    shared.ready.store(false, Ordering::Release);
    shared.post(&handle, classify_exit(exit_value, start_sent));
    exited.send_replace(true);
}

async fn deadline(at: Option<Instant>) {
    match at {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

async fn next_line(
    lines: &mut Option<tokio::io::Lines<BufReader<tokio::process::ChildStdout>>>,
) -> Option<String> {
    let Some(reader) = lines.as_mut() else {
        return std::future::pending().await;
    };

    match reader.next_line().await {
        Ok(line) => line,
        Err(e) => {
            warn!(error = ?e, "Failed to read engine output");
            None
        }
    }
}

async fn write_command(stdin: &mut Option<ChildStdin>, command: &str) {
    let Some(writer) = stdin.as_mut() else {
        warn!(command, "Engine stdin closed, command dropped");
        return;
    };

    let line = format!("{}\n", command);
    let result = match writer.write_all(line.as_bytes()).await {
        Ok(()) => writer.flush().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => debug!(command, "Command sent to engine"),
        Err(e) => {
            warn!(error = ?e, command, "Failed to write to engine");
            *stdin = None;
        }
    }
}
