use super::{extract, EventEnvelope};

use anyhow::Result;

use crate::errors::IngestError;

const SAMPLE_EVENT: &str = r#"{
    "Records": [
        {
            "eventVersion": "2.1",
            "eventSource": "aws:s3",
            "eventName": "ObjectCreated:Put",
            "s3": {
                "s3SchemaVersion": "1.0",
                "bucket": {
                    "name": "statements",
                    "arn": "arn:aws:s3:::statements"
                },
                "object": {
                    "key": "drop/2024-03.csv",
                    "size": 1024
                }
            }
        }
    ]
}"#;

#[test]
fn test_extract_reads_container_and_key_from_first_record() -> Result<()> {
    let envelope = EventEnvelope::from_json(SAMPLE_EVENT)?;
    let source = extract(&envelope)?;

    assert_eq!(source.container, "statements");
    assert_eq!(source.key, "drop/2024-03.csv");

    Ok(())
}

#[test]
fn test_extract_fails_on_envelope_without_records() -> Result<()> {
    let envelope = EventEnvelope::from_json(r#"{"Records": []}"#)?;
    let result = extract(&envelope);

    assert!(matches!(result, Err(IngestError::Configuration(_))));

    Ok(())
}

#[test]
fn test_from_json_rejects_missing_object_key() {
    let payload = r#"{"Records": [{"s3": {"bucket": {"name": "statements"}, "object": {}}}]}"#;
    let result = EventEnvelope::from_json(payload);

    assert!(matches!(result, Err(IngestError::Configuration(_))));
}

#[test]
fn test_from_json_rejects_payload_without_records() {
    let result = EventEnvelope::from_json(r#"{"detail": "unrelated event shape"}"#);

    assert!(matches!(result, Err(IngestError::Configuration(_))));
}

#[test]
fn test_extract_uses_only_the_first_of_multiple_records() -> Result<()> {
    let payload = r#"{
        "Records": [
            {"s3": {"bucket": {"name": "statements"}, "object": {"key": "first.csv"}}},
            {"s3": {"bucket": {"name": "statements"}, "object": {"key": "second.csv"}}}
        ]
    }"#;

    let envelope = EventEnvelope::from_json(payload)?;
    let source = extract(&envelope)?;

    assert_eq!(source.key, "first.csv");

    Ok(())
}

#[test]
fn test_for_object_round_trips_through_extract() -> Result<()> {
    let envelope = EventEnvelope::for_object("local", "drop.csv");
    let source = extract(&envelope)?;

    assert_eq!(source.container, "local");
    assert_eq!(source.key, "drop.csv");

    Ok(())
}
