//! Single-job state machine.
//!
//! ```text
//! Idle --submit--> Submitting --progress--> Running --progress--> Running
//!   ^                  |                       |
//!   +-- resolved / cancel (outcome reported) --+
//! ```
//!
//! Terminal outcomes are returned to the caller at the moment of the
//! transition; the phase itself goes straight back to `Idle`.

use crate::engine::{ConversionRequest, ProgressSample};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Identifies one `submit` call so its resolution can be matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobTicket(Uuid);

impl JobTicket {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobTicket {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fire-and-forget access to the backend. Results come back through
/// `JobController::on_submit_resolved` / `on_cancel_resolved`.
pub trait Dispatch {
    fn submit(&self, ticket: JobTicket, request: ConversionRequest);
    fn cancel(&self);
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    /// Dispatched, no progress seen yet
    Submitting,
    /// Latest sample from the backend
    Running(ProgressSample),
}

impl JobPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Submitting => "Starting",
            Self::Running(_) => "Converting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed(String),
    Failed(String),
    Cancelled,
}

impl JobOutcome {
    /// Message for the user; backend messages are shown verbatim
    pub fn message(&self) -> &str {
        match self {
            Self::Completed(msg) | Self::Failed(msg) => msg,
            Self::Cancelled => "Conversion cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("A conversion is already in progress")]
    Busy,
}

pub struct JobController<D: Dispatch> {
    dispatch: D,
    phase: JobPhase,
    ticket: Option<JobTicket>,
}

impl<D: Dispatch> JobController<D> {
    pub fn new(dispatch: D) -> Self {
        Self {
            dispatch,
            phase: JobPhase::Idle,
            ticket: None,
        }
    }

    pub fn phase(&self) -> &JobPhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == JobPhase::Idle
    }

    pub fn is_active(&self) -> bool {
        !self.is_idle()
    }

    /// Whether the start action should be enabled
    pub fn can_submit(&self) -> bool {
        self.is_idle()
    }

    pub fn progress(&self) -> Option<&ProgressSample> {
        match &self.phase {
            JobPhase::Running(sample) => Some(sample),
            _ => None,
        }
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatch
    }

    pub fn submit(&mut self, request: ConversionRequest) -> Result<JobTicket, SubmitError> {
        if !self.is_idle() {
            tracing::debug!(phase = self.phase.label(), "submit rejected, job active");
            return Err(SubmitError::Busy);
        }

        let ticket = JobTicket::new();
        tracing::info!(
            %ticket,
            input = %request.input_path,
            output = %request.output_path,
            format = %request.format,
            "submitting conversion"
        );

        self.ticket = Some(ticket);
        self.phase = JobPhase::Submitting;
        self.dispatch.submit(ticket, request);
        Ok(ticket)
    }

    /// Apply a progress sample. Returns `false` when it was discarded.
    pub fn apply_progress(&mut self, sample: ProgressSample) -> bool {
        match self.phase {
            JobPhase::Idle => {
                tracing::debug!(pct = sample.percentage, "progress while idle, discarded");
                false
            }
            JobPhase::Submitting | JobPhase::Running(_) => {
                self.phase = JobPhase::Running(sample);
                true
            }
        }
    }

    /// Resolution of a submit call. `None` when the ticket is stale.
    pub fn on_submit_resolved(
        &mut self,
        ticket: JobTicket,
        result: Result<String, String>,
    ) -> Option<JobOutcome> {
        if self.ticket != Some(ticket) {
            tracing::debug!(%ticket, "stale submit resolution, discarded");
            return None;
        }

        self.ticket = None;
        self.phase = JobPhase::Idle;

        let outcome = match result {
            Ok(message) => {
                tracing::info!(%ticket, "conversion completed");
                JobOutcome::Completed(message)
            }
            Err(message) => {
                tracing::info!(%ticket, error = %message, "conversion failed");
                JobOutcome::Failed(message)
            }
        };
        Some(outcome)
    }

    /// Cancel the active job. Returns `None` (and does nothing) when idle.
    pub fn cancel(&mut self) -> Option<JobOutcome> {
        if self.is_idle() {
            return None;
        }

        tracing::info!(ticket = ?self.ticket, "cancelling conversion");
        self.dispatch.cancel();
        self.ticket = None;
        self.phase = JobPhase::Idle;
        Some(JobOutcome::Cancelled)
    }

    pub fn on_cancel_resolved(&mut self, result: Result<(), String>) {
        match result {
            Ok(()) => tracing::debug!("backend acknowledged cancel"),
            Err(e) => tracing::warn!(error = %e, "backend cancel failed"),
        }
    }
}
