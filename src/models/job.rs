use chrono::{DateTime, Utc};
use tracing::debug;

use crate::models::SourceRef;

/// Terminal outcome of an invocation that made it through loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Every data row loaded.
    Success,
    /// At least one row failed; the rest loaded.
    Partial,
    /// The file carried no data rows.
    Empty
}

impl std::fmt::Display for CompletionOutcome {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CompletionOutcome::Success => "success",
            CompletionOutcome::Partial => "partial",
            CompletionOutcome::Empty => "empty"
        };
        write!(formatter, "{label}")
    }
}

/// Lifecycle of a single invocation. `Failed` is only reachable from the
/// stages before row loading completes; row-level failures never put the job
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Received,
    Fetching,
    Fetched,
    Parsing,
    Loading,
    Completed(CompletionOutcome),
    Failed
}

/// Ephemeral bookkeeping for one invocation. Nothing here survives the
/// invocation; re-delivery of the same notification starts a fresh job.
#[derive(Debug, Clone)]
pub struct IngestionJob {
    pub source: SourceRef,
    state: JobState,
    pub rows_seen: u64,
    pub rows_loaded: u64,
    pub rows_failed: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>
}

impl IngestionJob {
    pub fn new(source: SourceRef) -> Self {
        Self {
            source,
            state: JobState::Received,
            rows_seen: 0,
            rows_loaded: 0,
            rows_failed: 0,
            started_at: Utc::now(),
            completed_at: None
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Moves the job to its next stage. Terminal states stamp the completion
    /// time.
    pub fn advance(&mut self, next: JobState) {
        debug!("Job [{}] state {:?} -> {:?}", self.source, self.state, next);
        self.state = next;

        if matches!(next, JobState::Completed(_) | JobState::Failed) {
            self.completed_at = Some(Utc::now());
        }
    }

    /// Outcome derived from the row counts once loading has finished.
    pub fn outcome(&self) -> CompletionOutcome {
        if self.rows_seen == 0 {
            CompletionOutcome::Empty
        } else if self.rows_failed == 0 {
            CompletionOutcome::Success
        } else {
            CompletionOutcome::Partial
        }
    }
}
