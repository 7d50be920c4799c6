use std::fmt;

use crate::error::StateError;
use crate::snapshot::JobSnapshot;

/// Identifier of the row currently being probed, or a sentinel.
///
/// `Idle` renders as "N/A" and `Completed` as "Completed" in snapshots;
/// pollers use the latter to distinguish natural completion from an
/// early stop.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CurrentRow {
    #[default]
    Idle,
    Row(String),
    Completed,
}

impl CurrentRow {
    pub fn label(&self) -> &str {
        match self {
            CurrentRow::Idle => "N/A",
            CurrentRow::Row(investor) => investor,
            CurrentRow::Completed => "Completed",
        }
    }
}

/// One successful extraction, accumulated for the result artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub investor: String,
    pub email: String,
}

/// An error recorded against the current run.
///
/// Row failures keep the investor identity attached; `Fatal` marks an
/// infrastructure fault that ended the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    Row { investor: String, reason: String },
    Fatal { reason: String },
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Row { investor, reason } => write!(f, "{investor}: {reason}"),
            RunError::Fatal { reason } => write!(f, "fatal: {reason}"),
        }
    }
}

/// Outcome of probing one row, as seen by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Email(String),
    Failed(String),
}

/// The single source of truth for an active or finished run.
///
/// Exclusively mutated by the job controller; everyone else reads it
/// through [`JobState::snapshot`]. Counters are monotonic within a run:
/// `progress <= total`, `emails_found <= progress`, and the row-error
/// count never exceeds `progress`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobState {
    running: bool,
    total: usize,
    progress: usize,
    emails_found: usize,
    current: CurrentRow,
    start_time: Option<String>,
    errors: Vec<RunError>,
    results_file: Option<String>,
    findings: Vec<Finding>,
}

impl JobState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Enter the running state for a fresh run of `total` rows.
    ///
    /// Clears every field from any previous terminal state. Rejected
    /// without side effects while a run is active.
    pub fn begin_run(&mut self, total: usize, started_at: String) -> Result<(), StateError> {
        if self.running {
            return Err(StateError::AlreadyRunning);
        }
        *self = Self {
            running: true,
            total,
            start_time: Some(started_at),
            ..Self::default()
        };
        Ok(())
    }

    /// Mark `investor` as the row currently being probed.
    pub fn begin_row(&mut self, investor: &str) {
        self.current = CurrentRow::Row(investor.to_string());
    }

    /// Record the outcome of the current row and advance progress.
    pub fn record_outcome(&mut self, investor: &str, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Email(email) => {
                self.findings.push(Finding {
                    investor: investor.to_string(),
                    email,
                });
                self.emails_found += 1;
            }
            RowOutcome::Failed(reason) => {
                self.errors.push(RunError::Row {
                    investor: investor.to_string(),
                    reason,
                });
            }
        }
        self.progress += 1;
    }

    /// Terminal success: every row was processed and the artifact was
    /// written. This is the only transition that sets `results_file`.
    pub fn complete(&mut self, results_file: String) {
        self.running = false;
        self.current = CurrentRow::Completed;
        self.results_file = Some(results_file);
    }

    /// Terminal stop after a cancellation signal. `current` stays on the
    /// last attempted row and no results file is recorded.
    pub fn halt(&mut self) {
        self.running = false;
    }

    /// Terminal infrastructure failure. The reason is recorded as a
    /// fatal error entry instead of propagating past the controller.
    pub fn fail(&mut self, reason: String) {
        self.errors.push(RunError::Fatal { reason });
        self.running = false;
    }

    /// Return to idle, clearing all fields of the previous run.
    pub fn reset(&mut self) -> Result<(), StateError> {
        if self.running {
            return Err(StateError::InvalidTransition);
        }
        *self = Self::default();
        Ok(())
    }

    /// Successful findings accumulated so far, in row order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Immutable point-in-time copy for external readers.
    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            running: self.running,
            progress: self.progress,
            total: self.total,
            current_investor: self.current.label().to_string(),
            emails_found: self.emails_found,
            start_time: self.start_time.clone(),
            errors: self.errors.iter().map(ToString::to_string).collect(),
            results_file: self.results_file.clone(),
        }
    }
}
