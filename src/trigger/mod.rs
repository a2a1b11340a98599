#[cfg(test)]
mod tests;

use serde::Deserialize;
use tracing::warn;

use crate::errors::IngestError;
use crate::models::SourceRef;

/// Inbound notification describing created objects. Only the fields the
/// pipeline actually needs are modelled; everything else in the payload is
/// ignored during deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEnvelope {
    #[serde(rename = "Records")]
    records: Vec<EventRecord>
}

#[derive(Debug, Clone, Deserialize)]
struct EventRecord {
    s3: ObjectCreated
}

#[derive(Debug, Clone, Deserialize)]
struct ObjectCreated {
    bucket: BucketRef,
    object: ObjectRef
}

#[derive(Debug, Clone, Deserialize)]
struct BucketRef {
    name: String
}

#[derive(Debug, Clone, Deserialize)]
struct ObjectRef {
    key: String
}

impl EventEnvelope {
    /// Parses the raw notification payload. A structurally unexpected
    /// payload is a fatal configuration error, raised before any fetch.
    pub fn from_json(payload: &str) -> Result<Self, IngestError> {
        serde_json::from_str(payload)
            .map_err(|error| IngestError::configuration(format!("Malformed trigger envelope: {error}")))
    }

    /// Synthesizes a single-record envelope, used for local replay and tests.
    pub fn for_object(container: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            records: vec![EventRecord {
                s3: ObjectCreated {
                    bucket: BucketRef {
                        name: container.into()
                    },
                    object: ObjectRef {
                        key: key.into()
                    }
                }
            }]
        }
    }
}

/// Extracts the (container, key) pair the pipeline needs from the first
/// record of the envelope.
///
/// The notification source is expected to deliver one object per event;
/// additional records are not processed.
pub fn extract(envelope: &EventEnvelope) -> Result<SourceRef, IngestError> {
    let record = envelope
        .records
        .first()
        .ok_or_else(|| IngestError::configuration("Trigger envelope contains no records"))?;

    if envelope.records.len() > 1 {
        warn!(
            "Trigger envelope carries {} records, only the first is processed",
            envelope.records.len()
        );
    }

    Ok(SourceRef::new(&record.s3.bucket.name, &record.s3.object.key))
}
