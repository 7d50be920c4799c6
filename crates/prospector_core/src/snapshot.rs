/// Immutable, point-in-time copy of [`crate::JobState`].
///
/// Safe to hand to concurrent readers; repeated snapshots with no
/// intervening job activity compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub running: bool,
    pub progress: usize,
    pub total: usize,
    pub current_investor: String,
    pub emails_found: usize,
    pub start_time: Option<String>,
    pub errors: Vec<String>,
    pub results_file: Option<String>,
}

impl JobSnapshot {
    /// True when the run ended by processing every row.
    pub fn completed(&self) -> bool {
        !self.running && self.current_investor == "Completed"
    }

    /// True when the run ended early on a cancellation signal.
    pub fn stopped_early(&self) -> bool {
        !self.running && self.current_investor != "Completed" && self.progress > 0
    }
}
