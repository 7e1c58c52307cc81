//! Data access for the student records service: credential resolution,
//! the process-wide pooled MySQL handle, and the `students` repository.

pub mod config;
pub mod error;
pub mod models;
pub mod repositories;

use sqlx::mysql::MySqlPoolOptions;
use tokio::sync::{Mutex, OnceCell};

use config::DbCredentials;
use error::DbError;

pub type DbPool = sqlx::MySqlPool;

/// Upper bound on real database connections; concurrent requests beyond
/// this wait for a connection to free up.
const MAX_CONNECTIONS: u32 = 10;

static POOL: Mutex<Option<DbPool>> = Mutex::const_new(None);
static CREDENTIALS: OnceCell<DbCredentials> = OnceCell::const_new();

/// Get the process-wide connection pool, building it on first call.
///
/// Credential resolution happens at most once per process, even across a
/// [`close_pool`] / [`pool`] cycle. Connect failures propagate and are not
/// retried; the next caller starts a fresh attempt.
pub async fn pool() -> Result<DbPool, DbError> {
    let mut slot = POOL.lock().await;
    if let Some(pool) = slot.as_ref() {
        return Ok(pool.clone());
    }

    let credentials = CREDENTIALS.get_or_try_init(config::resolve_credentials).await?;
    tracing::info!(
        host = %credentials.host,
        port = credentials.port,
        database = %credentials.database,
        "Creating database connection pool",
    );

    let pool = MySqlPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(credentials.connect_options())
        .await?;

    *slot = Some(pool.clone());
    Ok(pool)
}

/// Close the pool and clear the cached handle.
///
/// Safe to call when nothing is open.
pub async fn close_pool() {
    let mut slot = POOL.lock().await;
    if let Some(pool) = slot.take() {
        pool.close().await;
        tracing::info!("Database connection pool closed");
    }
}

/// Cheap liveness probe used at startup and by the deep health check.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
