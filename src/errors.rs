use thiserror::Error;

use crate::models::SourceRef;
use crate::source::{FetchError, SecretError};

/// Fatal faults that abort an invocation. Row-level failures never appear
/// here; they are recorded by the failure reporter and the batch continues.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Failed to retrieve object [{source_ref}]: {source}")]
    ObjectRetrieval {
        source_ref: SourceRef,
        #[source]
        source: FetchError
    },
    #[error("Failed to resolve sink credentials [{reference}]: {source}")]
    SecretRetrieval {
        reference: String,
        #[source]
        source: SecretError
    },
    #[error("Sink connection failure: {0}")]
    Connection(String)
}

impl IngestError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn object_retrieval(source_ref: &SourceRef, source: FetchError) -> Self {
        Self::ObjectRetrieval {
            source_ref: source_ref.clone(),
            source
        }
    }

    pub fn secret_retrieval(reference: &str, source: SecretError) -> Self {
        Self::SecretRetrieval {
            reference: reference.to_string(),
            source
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }
}
