//! Database credential resolution.
//!
//! Two strategies, selected by `USE_SECRETS_MANAGER`: local environment
//! variables with development defaults, or a JSON secret fetched from AWS
//! Secrets Manager. Lookup failures propagate as
//! [`DbError::Configuration`] and are never retried.

use serde::Deserialize;
use sqlx::mysql::MySqlConnectOptions;

use crate::error::DbError;

/// Database name used when neither the environment nor the secret names one.
pub const DEFAULT_DATABASE: &str = "student_records";

const DEFAULT_PORT: u16 = 3306;

/// Resolved connection parameters, whatever the source.
#[derive(Debug, Clone)]
pub struct DbCredentials {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
}

impl DbCredentials {
    pub(crate) fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.database)
    }
}

/// Shape of the Secrets Manager secret payload.
///
/// `port` and `database` are optional; absent values fall back to the
/// MySQL default port and [`DEFAULT_DATABASE`].
#[derive(Debug, Deserialize)]
struct SecretPayload {
    host: String,
    port: Option<u16>,
    username: String,
    password: String,
    database: Option<String>,
}

/// Resolve connection credentials from the configured source.
pub async fn resolve_credentials() -> Result<DbCredentials, DbError> {
    let use_secrets_manager = std::env::var("USE_SECRETS_MANAGER")
        .map(|v| v == "true")
        .unwrap_or(false);

    if use_secrets_manager {
        tracing::info!("Resolving database credentials from AWS Secrets Manager");
        from_secrets_manager().await
    } else {
        tracing::info!("Resolving database credentials from local environment");
        from_env()
    }
}

/// Read credentials from individual environment variables.
///
/// | Env Var       | Default           |
/// |---------------|-------------------|
/// | `DB_HOST`     | `localhost`       |
/// | `DB_PORT`     | `3306`            |
/// | `DB_USER`     | `root`            |
/// | `DB_PASSWORD` | empty             |
/// | `DB_NAME`     | `student_records` |
fn from_env() -> Result<DbCredentials, DbError> {
    let port = std::env::var("DB_PORT")
        .unwrap_or_else(|_| DEFAULT_PORT.to_string())
        .parse::<u16>()
        .map_err(|_| DbError::Configuration("DB_PORT must be a valid port number".into()))?;

    Ok(DbCredentials {
        host: std::env::var("DB_HOST").unwrap_or_else(|_| "localhost".into()),
        port,
        username: std::env::var("DB_USER").unwrap_or_else(|_| "root".into()),
        password: std::env::var("DB_PASSWORD").unwrap_or_default(),
        database: std::env::var("DB_NAME").unwrap_or_else(|_| DEFAULT_DATABASE.into()),
    })
}

/// Fetch and parse the secret named by `DB_SECRET_ARN`.
///
/// The region comes from `AWS_REGION` (default `us-east-1`).
async fn from_secrets_manager() -> Result<DbCredentials, DbError> {
    let secret_id = std::env::var("DB_SECRET_ARN").map_err(|_| {
        DbError::Configuration("DB_SECRET_ARN must be set when USE_SECRETS_MANAGER=true".into())
    })?;
    let region = std::env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".into());

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region))
        .load()
        .await;
    let client = aws_sdk_secretsmanager::Client::new(&aws_config);

    let response = client
        .get_secret_value()
        .secret_id(&secret_id)
        .send()
        .await
        .map_err(|err| {
            DbError::Configuration(format!("failed to fetch secret {secret_id}: {err}"))
        })?;

    let raw = response.secret_string().ok_or_else(|| {
        DbError::Configuration(format!("secret {secret_id} has no string payload"))
    })?;

    credentials_from_secret(raw)
        .map_err(|err| DbError::Configuration(format!("secret {secret_id}: {err}")))
}

/// Parse the JSON secret payload into credentials, filling defaults.
fn credentials_from_secret(raw: &str) -> Result<DbCredentials, serde_json::Error> {
    let payload: SecretPayload = serde_json::from_str(raw)?;

    Ok(DbCredentials {
        host: payload.host,
        port: payload.port.unwrap_or(DEFAULT_PORT),
        username: payload.username,
        password: payload.password,
        database: payload.database.unwrap_or_else(|| DEFAULT_DATABASE.into()),
    })
}
