use async_trait::async_trait;
use sqlx::{Connection, PgConnection};
use sqlx::postgres::PgConnectOptions;
use tracing::debug;

use super::{SinkConnector, SinkError, TransactionSink};
use crate::config::SinkConfig;
use crate::models::TransactionRecord;
use crate::source::Credentials;

const INSERT_SQL: &str = "\
    INSERT INTO transactions (\
        transaction_date, booking_date, reject_date, \
        amount, currency, sender_receiver, description, \
        product, transaction_type, order_amount, order_currency, \
        status, balance_after\
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)";

const SAVEPOINT_SQL: &str = "SAVEPOINT ingest_row";
const RELEASE_SQL: &str = "RELEASE SAVEPOINT ingest_row";
const ROLLBACK_TO_SQL: &str = "ROLLBACK TO SAVEPOINT ingest_row";

/// Relational sink holding exactly one non-pooled connection for the
/// lifetime of the batch. Dropping the sink on any exit path closes the
/// connection, and Postgres discards whatever was not committed.
pub struct PostgresSink {
    connection: PgConnection
}

impl PostgresSink {
    /// Opens the connection and starts the batch transaction.
    pub async fn connect(config: &SinkConfig, credentials: &Credentials) -> Result<Self, SinkError> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&credentials.username)
            .password(&credentials.password);

        let mut connection = PgConnection::connect_with(&options)
            .await
            .map_err(|error| SinkError::Connection(error.to_string()))?;

        sqlx::raw_sql("BEGIN")
            .execute(&mut connection)
            .await
            .map_err(|error| SinkError::Connection(error.to_string()))?;

        debug!("Opened sink connection to [{}:{}/{}]", config.host, config.port, config.database);

        Ok(Self {
            connection
        })
    }
}

#[async_trait]
impl TransactionSink for PostgresSink {
    async fn insert(&mut self, record: &TransactionRecord) -> Result<(), SinkError> {
        //NOTE: A rejected statement poisons the surrounding Postgres transaction, so each
        //      row runs inside its own savepoint and a rejection rolls back only itself.
        //      The single commit at batch end still covers every released savepoint.
        sqlx::raw_sql(SAVEPOINT_SQL)
            .execute(&mut self.connection)
            .await
            .map_err(|error| SinkError::Connection(error.to_string()))?;

        let result = sqlx::query(INSERT_SQL)
            .bind(record.transaction_date)
            .bind(record.booking_date)
            .bind(record.reject_date)
            .bind(record.amount)
            .bind(record.currency.as_deref())
            .bind(record.sender_receiver.as_deref())
            .bind(record.description.as_deref())
            .bind(record.product.as_deref())
            .bind(record.transaction_type.as_deref())
            .bind(record.order_amount)
            .bind(record.order_currency.as_deref())
            .bind(record.status.as_deref())
            .bind(record.balance_after)
            .execute(&mut self.connection)
            .await;

        match result {
            Ok(_) => {
                sqlx::raw_sql(RELEASE_SQL)
                    .execute(&mut self.connection)
                    .await
                    .map_err(|error| SinkError::Connection(error.to_string()))?;

                Ok(())
            }
            Err(sqlx::Error::Database(rejection)) => {
                sqlx::raw_sql(ROLLBACK_TO_SQL)
                    .execute(&mut self.connection)
                    .await
                    .map_err(|error| SinkError::Connection(error.to_string()))?;

                Err(SinkError::Rejected(rejection.to_string()))
            }
            Err(error) => Err(SinkError::Connection(error.to_string()))
        }
    }

    async fn commit(&mut self) -> Result<(), SinkError> {
        sqlx::raw_sql("COMMIT")
            .execute(&mut self.connection)
            .await
            .map_err(|error| SinkError::Connection(error.to_string()))?;

        Ok(())
    }

    async fn discard(&mut self) -> Result<(), SinkError> {
        sqlx::raw_sql("ROLLBACK")
            .execute(&mut self.connection)
            .await
            .map_err(|error| SinkError::Connection(error.to_string()))?;

        Ok(())
    }
}

/// Connector the pipeline uses to open the Postgres sink once credentials
/// are in hand.
pub struct PostgresConnector {
    config: SinkConfig
}

impl PostgresConnector {
    pub fn new(config: SinkConfig) -> Self {
        Self {
            config
        }
    }
}

#[async_trait]
impl SinkConnector for PostgresConnector {
    type Sink = PostgresSink;

    async fn connect(&self, credentials: &Credentials) -> Result<PostgresSink, SinkError> {
        PostgresSink::connect(&self.config, credentials).await
    }
}
