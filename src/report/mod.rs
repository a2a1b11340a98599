#[cfg(test)]
mod tests;

use std::fmt;
use std::fmt::{Display, Formatter};

use tracing::warn;

use crate::models::{CompletionOutcome, IngestionJob, SourceRef};

/// How many failure details are carried into the terminal summary.
pub const MAX_REPORTED_FAILURES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The row had fewer fields than required, or the reader could not frame it.
    MalformedRow,
    /// A date or decimal field did not parse; the field was nulled and the
    /// row still loaded.
    FieldParse,
    /// The sink rejected the insert for this row.
    SinkRejected
}

impl Display for FailureKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::MalformedRow => "malformed row",
            FailureKind::FieldParse => "parse failure",
            FailureKind::SinkRejected => "rejected by sink"
        };
        write!(formatter, "{label}")
    }
}

/// One non-fatal diagnostic tied to a data row. Row indices are 1-based and
/// count data rows only; the header is row zero and never appears here.
#[derive(Debug, Clone)]
pub struct RowFailure {
    pub row_index: u64,
    pub raw_row: String,
    pub kind: FailureKind,
    pub message: String
}

/// Accumulates non-fatal diagnostics across the whole invocation and folds
/// them into the terminal summary. Fatal faults never pass through here.
#[derive(Debug, Default)]
pub struct FailureReporter {
    entries: Vec<RowFailure>
}

impl FailureReporter {
    pub fn new() -> Self {
        Self {
            entries: Vec::new()
        }
    }

    pub fn record(&mut self, row_index: u64, raw_row: String, kind: FailureKind, message: String) {
        warn!("Row [{row_index}] {kind}: {message}");

        self.entries.push(RowFailure {
            row_index,
            raw_row,
            kind,
            message
        });
    }

    pub fn entries(&self) -> &[RowFailure] {
        &self.entries
    }

    /// Folds the accumulated diagnostics and the job's counts into the
    /// terminal summary, keeping only the leading failure details.
    pub fn into_summary(self, job: &IngestionJob) -> IngestionSummary {
        IngestionSummary {
            source: job.source.clone(),
            outcome: job.outcome(),
            rows_seen: job.rows_seen,
            rows_loaded: job.rows_loaded,
            rows_failed: job.rows_failed,
            failures: self.entries.into_iter().take(MAX_REPORTED_FAILURES).collect()
        }
    }
}

/// Terminal summary of one invocation.
#[derive(Debug, Clone)]
pub struct IngestionSummary {
    pub source: SourceRef,
    pub outcome: CompletionOutcome,
    pub rows_seen: u64,
    pub rows_loaded: u64,
    pub rows_failed: u64,
    /// The first [`MAX_REPORTED_FAILURES`] diagnostics, in row order.
    pub failures: Vec<RowFailure>
}

impl Display for IngestionSummary {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            formatter,
            "Ingested [{}]: {} rows seen, {} loaded, {} failed ({})",
            self.source, self.rows_seen, self.rows_loaded, self.rows_failed, self.outcome
        )?;

        for failure in &self.failures {
            writeln!(
                formatter,
                "  row {} [{}] {}: {}",
                failure.row_index, failure.raw_row, failure.kind, failure.message
            )?;
        }

        Ok(())
    }
}
