use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use super::{Credentials, FetchError, ObjectFetcher, SecretError, SecretResolver};

pub const USERNAME_VAR: &str = "DB_USER";
pub const PASSWORD_VAR: &str = "DB_PASSWORD";

/// Replays a file from the local filesystem through the object store seam,
/// treating the container as a directory and the key as a file name. Lets a
/// dropped file be run against a local sink without any object store.
pub struct FileObjectFetcher;

#[async_trait]
impl ObjectFetcher for FileObjectFetcher {
    async fn fetch(&self, container: &str, key: &str) -> Result<Vec<u8>, FetchError> {
        let path = Path::new(container).join(key);

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!("Read [{}], size: {} bytes", path.display(), bytes.len());
                Ok(bytes)
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Err(FetchError::NotFound),
            Err(error) if error.kind() == ErrorKind::PermissionDenied => Err(FetchError::AccessDenied),
            Err(error) => Err(FetchError::Service(error.to_string()))
        }
    }
}

/// Credential source for local replay: reads the sink username and password
/// from the environment instead of a secret store.
pub struct EnvCredentialsResolver;

#[async_trait]
impl SecretResolver for EnvCredentialsResolver {
    async fn resolve(&self, _reference: &str) -> Result<Credentials, SecretError> {
        let username = std::env::var(USERNAME_VAR).map_err(|_| SecretError::NotFound)?;
        let password = std::env::var(PASSWORD_VAR).map_err(|_| SecretError::NotFound)?;

        Ok(Credentials {
            username,
            password
        })
    }
}
