use crate::errors::IngestError;

pub const CONTAINER_VAR: &str = "BUCKET_NAME";
pub const SECRET_REF_VAR: &str = "SECRET_ARN";
pub const SINK_HOST_VAR: &str = "RDS_ENDPOINT";
pub const SINK_PORT_VAR: &str = "RDS_PORT";
pub const SINK_DATABASE_VAR: &str = "DB_NAME";

/// Connection coordinates for the relational sink. Credentials are not part
/// of the configuration; they arrive separately from the secret store.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    pub host: String,
    pub port: u16,
    pub database: String
}

/// Everything an invocation needs before it touches any external system.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub container: String,
    pub secret_ref: String,
    pub sink: SinkConfig
}

impl IngestConfig {
    /// Loads the required settings from the environment. A missing variable
    /// or an unparsable port is fatal before any fetch is attempted.
    pub fn from_env() -> Result<Self, IngestError> {
        let container = required(CONTAINER_VAR)?;
        let secret_ref = required(SECRET_REF_VAR)?;
        let host = required(SINK_HOST_VAR)?;
        let port = required(SINK_PORT_VAR)?.parse().map_err(|_| {
            IngestError::configuration(format!("[{SINK_PORT_VAR}] is not a valid port number"))
        })?;
        let database = required(SINK_DATABASE_VAR)?;

        Ok(Self {
            container,
            secret_ref,
            sink: SinkConfig {
                host,
                port,
                database
            }
        })
    }
}

fn required(name: &str) -> Result<String, IngestError> {
    std::env::var(name).map_err(|_| {
        IngestError::configuration(format!("Required environment variable [{name}] is not set"))
    })
}
