use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use probe_logging::{probe_error, probe_info, probe_warn};
use prospector_core::{JobSnapshot, JobState, RowOutcome};

use crate::probe::Prober;
use crate::report::ResultWriter;
use crate::types::{InvestorRecord, NowFn};

/// Operations rejected because of the job's current lifecycle state.
/// None of these mutate anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("a scraping job is already running")]
    AlreadyRunning,
    #[error("no scraping job is running")]
    NotRunning,
    #[error("cannot reset while a job is running")]
    ResetWhileRunning,
}

/// Owns the job lifecycle: drives the roster through the prober on a
/// single background worker, applies cooperative cancellation at row
/// boundaries, and finalizes the result artifact on completion.
///
/// [`JobState`] is mutated only behind this controller's mutex; pollers
/// read it exclusively through [`JobController::status`] snapshots, so
/// a status request never blocks on (or observes a torn write from) the
/// running worker.
pub struct JobController {
    state: Mutex<JobState>,
    cancel: AtomicBool,
    prober: Arc<dyn Prober>,
    writer: Arc<dyn ResultWriter>,
    now: NowFn,
}

impl JobController {
    pub fn new(prober: Arc<dyn Prober>, writer: Arc<dyn ResultWriter>, now: NowFn) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(JobState::new()),
            cancel: AtomicBool::new(false),
            prober,
            writer,
            now,
        })
    }

    /// Accept a validated roster and launch the background worker.
    ///
    /// Rejected with [`ControlError::AlreadyRunning`] while a run is
    /// active, leaving the existing state untouched.
    pub fn start(self: &Arc<Self>, rows: Vec<InvestorRecord>) -> Result<(), ControlError> {
        {
            let mut state = self.state.lock().expect("job state lock");
            state
                .begin_run(rows.len(), (self.now)())
                .map_err(|_| ControlError::AlreadyRunning)?;
            self.cancel.store(false, Ordering::Release);
        }
        probe_info!("Scraping job started with {} rows", rows.len());

        let controller = Arc::clone(self);
        tokio::spawn(async move {
            controller.run(rows).await;
        });
        Ok(())
    }

    /// Signal cooperative cancellation.
    ///
    /// The in-flight probe always finishes; the worker observes the
    /// flag at the next row boundary, so cancellation latency is
    /// bounded by one probe.
    pub fn stop(&self) -> Result<(), ControlError> {
        let state = self.state.lock().expect("job state lock");
        if !state.is_running() {
            return Err(ControlError::NotRunning);
        }
        self.cancel.store(true, Ordering::Release);
        probe_info!("Stop requested, finishing the current row");
        Ok(())
    }

    /// Clear a terminal run back to idle.
    pub fn reset(&self) -> Result<(), ControlError> {
        self.state
            .lock()
            .expect("job state lock")
            .reset()
            .map_err(|_| ControlError::ResetWhileRunning)
    }

    /// Point-in-time snapshot for pollers. Never blocks on probing.
    pub fn status(&self) -> JobSnapshot {
        self.state.lock().expect("job state lock").snapshot()
    }

    async fn run(&self, rows: Vec<InvestorRecord>) {
        for record in &rows {
            if self.cancel.load(Ordering::Acquire) {
                probe_info!("Cancellation observed before {}, stopping", record.name);
                self.state.lock().expect("job state lock").halt();
                return;
            }

            self.state
                .lock()
                .expect("job state lock")
                .begin_row(&record.name);

            let outcome = match self.prober.probe(record).await {
                Ok(email) => {
                    probe_info!("Found email for {}", record.name);
                    RowOutcome::Email(email)
                }
                Err(err) => {
                    probe_warn!("Probe failed for {}: {}", record.name, err);
                    RowOutcome::Failed(err.to_string())
                }
            };

            self.state
                .lock()
                .expect("job state lock")
                .record_outcome(&record.name, outcome);
        }

        // A stop that raced the final row still ends the run without an
        // artifact.
        if self.cancel.load(Ordering::Acquire) {
            self.state.lock().expect("job state lock").halt();
            return;
        }

        self.finalize();
    }

    fn finalize(&self) {
        let findings = self
            .state
            .lock()
            .expect("job state lock")
            .findings()
            .to_vec();

        match self.writer.write(&findings) {
            Ok(artifact) => {
                probe_info!(
                    "Scraping job completed, {} findings in {}",
                    findings.len(),
                    artifact
                );
                self.state.lock().expect("job state lock").complete(artifact);
            }
            Err(err) => {
                probe_error!("Failed to write results: {err}");
                self.state
                    .lock()
                    .expect("job state lock")
                    .fail(format!("failed to write results: {err}"));
            }
        }
    }
}
