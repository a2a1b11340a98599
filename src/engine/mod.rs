
use tracing::{info, warn};

use crate::config::IngestConfig;
use crate::errors::IngestError;
use crate::models::{IngestionJob, JobState};
use crate::normalize;
use crate::parser::RowReader;
use crate::report::{FailureKind, FailureReporter, IngestionSummary};
use crate::sink::{SinkConnector, SinkError, TransactionSink};
use crate::source::{FetchError, ObjectFetcher, SecretResolver};
use crate::trigger::{self, EventEnvelope};

/// Heartbeat interval while loading, in rows.
const PROGRESS_INTERVAL: u64 = 50;

/// End-to-end pipeline for one file-arrival notification: extract the source
/// reference, fetch the object, resolve credentials, open the sink, then
/// stream rows through normalization into the batch.
pub struct IngestEngine<F, R, C> {
    config: IngestConfig,
    fetcher: F,
    resolver: R,
    connector: C
}

impl<F, R, C> IngestEngine<F, R, C>
where
    F: ObjectFetcher,
    R: SecretResolver,
    C: SinkConnector
{
    pub fn new(config: IngestConfig, fetcher: F, resolver: R, connector: C) -> Self {
        Self {
            config,
            fetcher,
            resolver,
            connector
        }
    }

    /// Runs the invocation to its terminal state. Returns the summary for a
    /// completed run, or the fatal fault that stopped it; row-level failures
    /// never surface here.
    pub async fn run(&self, envelope: &EventEnvelope) -> Result<IngestionSummary, IngestError> {
        let source = trigger::extract(envelope)?;

        if source.container != self.config.container {
            warn!(
                "Notification container [{}] differs from configured container [{}]",
                source.container, self.config.container
            );
        }

        let mut job = IngestionJob::new(source.clone());

        job.advance(JobState::Fetching);
        let bytes = match self.fetcher.fetch(&source.container, &source.key).await {
            Ok(bytes) => bytes,
            Err(error) => {
                job.advance(JobState::Failed);
                return Err(IngestError::object_retrieval(&source, error));
            }
        };

        //NOTE: The whole object is buffered before parsing starts, which bounds the
        //      maximum file size by available memory. Row counts here are modest and
        //      per-row insert latency dominates, so this is acceptable.
        let body = match String::from_utf8(bytes) {
            Ok(body) => body,
            Err(error) => {
                job.advance(JobState::Failed);
                let reason = FetchError::Service(format!("Object is not valid UTF-8: {error}"));
                return Err(IngestError::object_retrieval(&source, reason));
            }
        };

        info!("Fetched [{source}], size: {} bytes", body.len());
        job.advance(JobState::Fetched);

        let credentials = match self.resolver.resolve(&self.config.secret_ref).await {
            Ok(credentials) => credentials,
            Err(error) => {
                job.advance(JobState::Failed);
                return Err(IngestError::secret_retrieval(&self.config.secret_ref, error));
            }
        };

        let mut sink = match self.connector.connect(&credentials).await {
            Ok(sink) => sink,
            Err(error) => {
                job.advance(JobState::Failed);
                return Err(IngestError::connection(error.to_string()));
            }
        };

        job.advance(JobState::Parsing);
        let rows = RowReader::new(&body);
        let mut reporter = FailureReporter::new();

        job.advance(JobState::Loading);
        if let Err(error) = load_rows(rows, &mut sink, &mut job, &mut reporter).await {
            job.advance(JobState::Failed);
            return Err(error);
        }

        let finish = if job.rows_loaded > 0 {
            sink.commit().await
        } else {
            //NOTE: Nothing succeeded, so there is nothing worth committing.
            sink.discard().await
        };

        if let Err(error) = finish {
            job.advance(JobState::Failed);
            return Err(IngestError::connection(error.to_string()));
        }

        let outcome = job.outcome();
        job.advance(JobState::Completed(outcome));

        info!(
            "Finished [{source}]: {} rows seen, {} loaded, {} failed",
            job.rows_seen, job.rows_loaded, job.rows_failed
        );

        Ok(reporter.into_summary(&job))
    }
}

/// Streams rows into the sink in file order, one pass, isolating every
/// row-level failure. Only a lost connection aborts the batch.
async fn load_rows<S: TransactionSink>(
    rows: RowReader<'_>,
    sink: &mut S,
    job: &mut IngestionJob,
    reporter: &mut FailureReporter
) -> Result<(), IngestError> {
    for row in rows {
        job.rows_seen += 1;
        let row_index = job.rows_seen;

        let raw = match row {
            Ok(raw) => raw,
            Err(error) => {
                job.rows_failed += 1;
                reporter.record(row_index, String::new(), FailureKind::MalformedRow, error.to_string());
                continue;
            }
        };

        let raw_row = raw.iter().collect::<Vec<_>>().join(";");

        let (record, notes) = match normalize::normalize_row(&raw) {
            Ok(normalized) => normalized,
            Err(error) => {
                job.rows_failed += 1;
                reporter.record(row_index, raw_row, FailureKind::MalformedRow, error.to_string());
                continue;
            }
        };

        for note in notes {
            reporter.record(row_index, raw_row.clone(), FailureKind::FieldParse, note.to_string());
        }

        match sink.insert(&record).await {
            Ok(()) => {
                job.rows_loaded += 1;

                if job.rows_loaded % PROGRESS_INTERVAL == 0 {
                    info!("Loaded {} rows so far...", job.rows_loaded);
                }
            }
            Err(SinkError::Rejected(message)) => {
                job.rows_failed += 1;
                reporter.record(row_index, raw_row, FailureKind::SinkRejected, message);
            }
            Err(SinkError::Connection(message)) => {
                return Err(IngestError::connection(message));
            }
        }
    }

    Ok(())
}
