use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use budget_ingest::config::{IngestConfig, SinkConfig};
use budget_ingest::engine::IngestEngine;
use budget_ingest::models::{CompletionOutcome, TransactionRecord};
use budget_ingest::report::FailureKind;
use budget_ingest::sink::{SinkConnector, SinkError, TransactionSink};
use budget_ingest::source::{Credentials, FileObjectFetcher, SecretError, SecretResolver};
use budget_ingest::trigger::EventEnvelope;

fn create_config() -> IngestConfig {
    IngestConfig {
        container: "samples".to_string(),
        secret_ref: "sink-credentials".to_string(),
        sink: SinkConfig {
            host: "localhost".to_string(),
            port: 5432,
            database: "budget".to_string()
        }
    }
}

struct StaticResolver;

#[async_trait]
impl SecretResolver for StaticResolver {
    async fn resolve(&self, _reference: &str) -> Result<Credentials, SecretError> {
        Ok(Credentials {
            username: "ingest".to_string(),
            password: "ingest".to_string()
        })
    }
}

struct MemorySink {
    staged: Vec<TransactionRecord>,
    committed: Arc<Mutex<Vec<TransactionRecord>>>
}

#[async_trait]
impl TransactionSink for MemorySink {
    async fn insert(&mut self, record: &TransactionRecord) -> Result<(), SinkError> {
        self.staged.push(record.clone());
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), SinkError> {
        self.committed.lock().unwrap().extend(self.staged.drain(..));
        Ok(())
    }

    async fn discard(&mut self) -> Result<(), SinkError> {
        self.staged.clear();
        Ok(())
    }
}

struct MemoryConnector {
    committed: Arc<Mutex<Vec<TransactionRecord>>>
}

impl MemoryConnector {
    fn new() -> Self {
        Self {
            committed: Arc::new(Mutex::new(Vec::new()))
        }
    }
}

#[async_trait]
impl SinkConnector for MemoryConnector {
    type Sink = MemorySink;

    async fn connect(&self, _credentials: &Credentials) -> Result<MemorySink, SinkError> {
        Ok(MemorySink {
            staged: Vec::new(),
            committed: self.committed.clone()
        })
    }
}

#[tokio::test]
async fn test_pipeline_ingests_sample_file_end_to_end() -> Result<()> {
    let connector = MemoryConnector::new();
    let committed = connector.committed.clone();

    let engine = IngestEngine::new(create_config(), FileObjectFetcher, StaticResolver, connector);
    let envelope = EventEnvelope::for_object("samples", "sample.csv");
    let summary = engine.run(&envelope).await?;

    assert_eq!(summary.rows_seen, 9);
    assert_eq!(summary.rows_loaded, 9);
    assert_eq!(summary.rows_failed, 0);
    assert_eq!(summary.outcome, CompletionOutcome::Success);

    // The one bad amount in the sample surfaces as a diagnostic, not a lost row.
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].kind, FailureKind::FieldParse);
    assert_eq!(summary.failures[0].row_index, 6);

    let rows = committed.lock().unwrap();

    assert_eq!(rows.len(), 9);
    assert_eq!(rows[0].amount, Some(Decimal::from_str("-45.90")?));
    assert_eq!(rows[1].description, Some("Salary; March".to_string()));
    assert_eq!(rows[5].amount, None);
    assert_eq!(rows[6].description, Some("Order\nmulti-line note".to_string()));
    assert_eq!(rows[6].order_amount, Some(Decimal::from_str("59.99")?));

    // Fully blank rows are structurally valid and load as all nulls.
    assert_eq!(rows[8], TransactionRecord {
        transaction_date: None,
        booking_date: None,
        reject_date: None,
        amount: None,
        currency: None,
        sender_receiver: None,
        description: None,
        product: None,
        transaction_type: None,
        order_amount: None,
        order_currency: None,
        status: None,
        balance_after: None
    });

    Ok(())
}

#[tokio::test]
async fn test_pipeline_replays_a_dropped_file_from_a_temporary_directory() -> Result<()> {
    let directory = tempfile::tempdir()?;
    let body = "\
Transaction date;Booking date;Reject date;Amount;Currency;Sender/receiver;Description;Product;Transaction type;Order amount;Order currency;Status;Balance after
2024-04-01;2024-04-01;;10,00;EUR;ACME;First;Checking;CARD;;;settled;10,00
2024-04-02;2024-04-02;;20,00;EUR;ACME;Second;Checking;CARD;;;settled;30,00
";
    fs::write(directory.path().join("drop.csv"), body)?;

    let connector = MemoryConnector::new();
    let committed = connector.committed.clone();

    let engine = IngestEngine::new(create_config(), FileObjectFetcher, StaticResolver, connector);
    let envelope = EventEnvelope::for_object(directory.path().to_string_lossy(), "drop.csv");
    let summary = engine.run(&envelope).await?;

    assert_eq!(summary.rows_loaded, 2);
    assert_eq!(summary.outcome, CompletionOutcome::Success);

    let rows = committed.lock().unwrap();

    assert_eq!(rows[0].description, Some("First".to_string()));
    assert_eq!(rows[1].amount, Some(Decimal::from_str("20.00")?));

    Ok(())
}

#[tokio::test]
async fn test_pipeline_counts_every_sample_row_exactly_once() -> Result<()> {
    let raw = fs::read_to_string(Path::new("samples").join("sample.csv"))?;
    let data_lines = raw.lines().count();

    let connector = MemoryConnector::new();
    let engine = IngestEngine::new(create_config(), FileObjectFetcher, StaticResolver, connector);
    let summary = engine.run(&EventEnvelope::for_object("samples", "sample.csv")).await?;

    // One header line plus one embedded newline inside a quoted field: the
    // reader sees two fewer rows than the file has physical lines.
    assert_eq!(summary.rows_seen, (data_lines - 2) as u64);

    Ok(())
}
