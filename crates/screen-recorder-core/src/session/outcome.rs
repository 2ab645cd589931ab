/// Result reported by the capture engine when a session ends.
///
/// `size_kb` and `duration_secs` are filled in by the orchestrator when it
/// reports stats for a finished or salvaged session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordingOutcome {
    /// Engine exit value, surfaced as the error code in reports.
    pub exit_value: i32,
    /// Final output size in KiB.
    pub size_kb: Option<u64>,
    /// Elapsed recording time in seconds.
    pub duration_secs: Option<u64>,
}

impl RecordingOutcome {
    /// Outcome carrying only an exit value.
    pub fn exited(exit_value: i32) -> Self {
        Self {
            exit_value,
            ..Self::default()
        }
    }
}
