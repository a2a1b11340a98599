use async_trait::async_trait;
use aws_sdk_secretsmanager::Client;
use aws_sdk_secretsmanager::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_secretsmanager::operation::get_secret_value::GetSecretValueError;
use tracing::debug;

use super::{Credentials, SecretError, SecretResolver};

/// Secret store adapter backed by Secrets Manager. The payload is expected
/// to be a JSON document carrying `username` and `password`.
pub struct SecretsManagerResolver {
    client: Client
}

impl SecretsManagerResolver {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config)
        }
    }
}

#[async_trait]
impl SecretResolver for SecretsManagerResolver {
    async fn resolve(&self, reference: &str) -> Result<Credentials, SecretError> {
        let response = self
            .client
            .get_secret_value()
            .secret_id(reference)
            .send()
            .await
            .map_err(classify)?;

        let payload = response
            .secret_string()
            .ok_or_else(|| SecretError::Malformed("Secret carries no string payload".to_string()))?;

        let credentials: Credentials =
            serde_json::from_str(payload).map_err(|error| SecretError::Malformed(error.to_string()))?;

        debug!("Resolved sink credentials for user [{}]", credentials.username);

        Ok(credentials)
    }
}

fn classify(error: SdkError<GetSecretValueError>) -> SecretError {
    if let SdkError::ServiceError(service) = &error {
        if service.err().is_resource_not_found_exception() {
            return SecretError::NotFound;
        }
    }

    match error.code() {
        Some("AccessDeniedException") | Some("AccessDenied") => SecretError::AccessDenied,
        _ => SecretError::Service(error.to_string())
    }
}
