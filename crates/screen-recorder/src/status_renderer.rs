use screen_recorder_core::{AudioSource, Notification};

/// Render a notification as one console line.
pub fn render(notification: &Notification) -> String {
    match notification {
        Notification::StatusChanged(state) => format!("status: {}", state),
        Notification::Error(report) => {
            let mut line = format!(
                "error {}: {}: {}",
                report.code, report.title, report.message
            );
            if report.reportable {
                line.push_str(" Please report this problem.");
            }
            if report.restart {
                line.push_str(" (type `dismiss` to continue)");
            }
            line
        }
        Notification::SessionFinished {
            output_path,
            size_kb,
            duration_secs,
        } => format!(
            "finished: {} ({} KiB, {}s)",
            output_path.display(),
            size_kb,
            duration_secs
        ),
        Notification::OutputSaved {
            output_path,
            max_file_size_reached,
        } => {
            if *max_file_size_reached {
                format!(
                    "saved: {} (maximum file size reached)",
                    output_path.display()
                )
            } else {
                format!("saved: {}", output_path.display())
            }
        }
        Notification::TimeoutWarning => {
            "time limit reached: type `stop` to finish or `timeout-ok` to continue".to_string()
        }
        Notification::MicrophoneBusy => {
            "microphone busy: type `mute-retry` to record without audio or `mute-cancel`"
                .to_string()
        }
        Notification::StopHelp => {
            "type `stop` to finish a recording. Type `help-ok` to start recording".to_string()
        }
        Notification::AudioSourceChanged(source) => {
            format!("audio source changed to {}", audio_source_name(*source))
        }
        Notification::Terminated { fatal: true } => "terminated after an error".to_string(),
        Notification::Terminated { fatal: false } => "terminated".to_string(),
    }
}

fn audio_source_name(source: AudioSource) -> &'static str {
    match source {
        AudioSource::Mic => "mic",
        AudioSource::Internal => "internal",
        AudioSource::Mute => "mute",
    }
}
