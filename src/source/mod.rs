mod local;
mod s3;
mod secrets;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

pub use local::{EnvCredentialsResolver, FileObjectFetcher};
pub use s3::S3ObjectFetcher;
pub use secrets::SecretsManagerResolver;

/// Sink credential material. Fetched fresh for every invocation and never
/// cached, trading one extra round trip for freshness.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Object not found")]
    NotFound,
    #[error("Access denied")]
    AccessDenied,
    #[error("Request timed out")]
    Timeout,
    #[error("{0}")]
    Service(String)
}

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("Secret not found")]
    NotFound,
    #[error("Access denied")]
    AccessDenied,
    #[error("Secret payload is malformed: {0}")]
    Malformed(String),
    #[error("{0}")]
    Service(String)
}

/// Retrieves the raw bytes of one object from the object store.
#[async_trait]
pub trait ObjectFetcher: Send + Sync {
    async fn fetch(&self, container: &str, key: &str) -> Result<Vec<u8>, FetchError>;
}

/// Retrieves sink credentials for a reference id.
#[async_trait]
pub trait SecretResolver: Send + Sync {
    async fn resolve(&self, reference: &str) -> Result<Credentials, SecretError>;
}
