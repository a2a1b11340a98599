use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use tracing::debug;

use super::{FetchError, ObjectFetcher};

/// Object store adapter backed by S3.
pub struct S3ObjectFetcher {
    client: Client
}

impl S3ObjectFetcher {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config)
        }
    }
}

#[async_trait]
impl ObjectFetcher for S3ObjectFetcher {
    async fn fetch(&self, container: &str, key: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get_object()
            .bucket(container)
            .key(key)
            .send()
            .await
            .map_err(classify)?;

        let collected = response
            .body
            .collect()
            .await
            .map_err(|error| FetchError::Service(error.to_string()))?;
        let bytes = collected.into_bytes().to_vec();

        debug!("Fetched [{container}/{key}], size: {} bytes", bytes.len());

        Ok(bytes)
    }
}

fn classify(error: SdkError<GetObjectError>) -> FetchError {
    if matches!(error, SdkError::TimeoutError(_)) {
        return FetchError::Timeout;
    }

    if let SdkError::ServiceError(service) = &error {
        if service.err().is_no_such_key() {
            return FetchError::NotFound;
        }
    }

    match error.code() {
        Some("NoSuchBucket") => FetchError::NotFound,
        Some("AccessDenied") => FetchError::AccessDenied,
        _ => FetchError::Service(error.to_string())
    }
}
