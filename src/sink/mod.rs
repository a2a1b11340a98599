mod postgres;

use async_trait::async_trait;
use thiserror::Error;

pub use postgres::{PostgresConnector, PostgresSink};

use crate::models::TransactionRecord;
use crate::source::Credentials;

#[derive(Debug, Error)]
pub enum SinkError {
    /// The sink refused this row. The batch stays usable and later rows can
    /// still be attempted.
    #[error("Sink rejected row: {0}")]
    Rejected(String),
    /// The connection is gone. No further rows can be attempted and
    /// uncommitted work is lost.
    #[error("Sink connection failure: {0}")]
    Connection(String)
}

/// Destination for normalized records. One batch per sink instance: rows are
/// inserted in order, then the batch is committed once or discarded whole.
#[async_trait]
pub trait TransactionSink: Send {
    /// Attempts to insert one record. A `Rejected` error must leave the
    /// batch usable so the remaining rows can still be attempted.
    async fn insert(&mut self, record: &TransactionRecord) -> Result<(), SinkError>;

    /// Makes every successfully inserted row durable. Called at most once.
    async fn commit(&mut self) -> Result<(), SinkError>;

    /// Abandons the batch without making any row durable.
    async fn discard(&mut self) -> Result<(), SinkError>;
}

/// Opens a fresh sink for one invocation using credentials resolved moments
/// earlier. Failure to connect is fatal for the whole invocation.
#[async_trait]
pub trait SinkConnector: Send + Sync {
    type Sink: TransactionSink;

    async fn connect(&self, credentials: &Credentials) -> Result<Self::Sink, SinkError>;
}
