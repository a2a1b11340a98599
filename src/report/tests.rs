use super::{FailureKind, FailureReporter, MAX_REPORTED_FAILURES};

use crate::models::{CompletionOutcome, IngestionJob, SourceRef};

fn create_job(seen: u64, loaded: u64, failed: u64) -> IngestionJob {
    let mut job = IngestionJob::new(SourceRef::new("statements", "drop.csv"));
    job.rows_seen = seen;
    job.rows_loaded = loaded;
    job.rows_failed = failed;
    job
}

#[test]
fn test_reporter_accumulates_entries_in_order() {
    let mut reporter = FailureReporter::new();

    reporter.record(3, "a;b".to_string(), FailureKind::FieldParse, "bad date".to_string());
    reporter.record(7, "c;d".to_string(), FailureKind::SinkRejected, "constraint".to_string());

    let entries = reporter.entries();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].row_index, 3);
    assert_eq!(entries[0].kind, FailureKind::FieldParse);
    assert_eq!(entries[1].row_index, 7);
    assert_eq!(entries[1].kind, FailureKind::SinkRejected);
}

#[test]
fn test_summary_caps_reported_failure_details() {
    let mut reporter = FailureReporter::new();

    for index in 1..=25 {
        reporter.record(index, String::new(), FailureKind::SinkRejected, "constraint".to_string());
    }

    let summary = reporter.into_summary(&create_job(25, 0, 25));

    assert_eq!(summary.failures.len(), MAX_REPORTED_FAILURES);
    assert_eq!(summary.failures[0].row_index, 1);
    assert_eq!(summary.rows_failed, 25);
}

#[test]
fn test_summary_carries_counts_and_outcome() {
    let reporter = FailureReporter::new();
    let summary = reporter.into_summary(&create_job(10, 10, 0));

    assert_eq!(summary.rows_seen, 10);
    assert_eq!(summary.rows_loaded, 10);
    assert_eq!(summary.rows_failed, 0);
    assert_eq!(summary.outcome, CompletionOutcome::Success);
}

#[test]
fn test_summary_display_lists_leading_failures() {
    let mut reporter = FailureReporter::new();
    reporter.record(2, "x;y".to_string(), FailureKind::MalformedRow, "too few fields".to_string());

    let rendered = reporter.into_summary(&create_job(5, 4, 1)).to_string();

    assert!(rendered.contains("5 rows seen, 4 loaded, 1 failed (partial)"));
    assert!(rendered.contains("row 2 [x;y] malformed row: too few fields"));
}
