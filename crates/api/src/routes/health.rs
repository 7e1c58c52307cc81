//! Health check endpoints.
//!
//! `/health` is the load-balancer probe: process liveness only, never
//! touches the database. `/health/deep` is for monitoring and checks
//! database reachability with independent per-phase timeouts.

use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use tokio::time::timeout;

use crate::state::AppState;

/// Bound on acquiring a connection from the pool.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(3);
/// Bound on the probe query itself.
const QUERY_TIMEOUT: Duration = Duration::from_secs(2);

/// Shallow health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    /// Seconds since process start.
    pub uptime: f64,
}

/// Deep health check response payload.
#[derive(Serialize)]
pub struct DeepHealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: f64,
    pub checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub database: &'static str,
}

/// GET /health -- process liveness for the load balancer.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

/// GET /health/deep -- database reachability; 503 when degraded.
async fn deep_health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = probe_database(&state).await;

    let (status, code) = if database == "ok" {
        ("ok", StatusCode::OK)
    } else {
        ("degraded", StatusCode::SERVICE_UNAVAILABLE)
    };

    (
        code,
        Json(DeepHealthResponse {
            status,
            timestamp: chrono::Utc::now().to_rfc3339(),
            uptime: state.started_at.elapsed().as_secs_f64(),
            checks: HealthChecks { database },
        }),
    )
}

/// Acquire a connection and run `SELECT 1`, each phase bounded on its
/// own so a saturated pool cannot stall the endpoint.
async fn probe_database(state: &AppState) -> &'static str {
    let mut conn = match timeout(ACQUIRE_TIMEOUT, state.pool.acquire()).await {
        Ok(Ok(conn)) => conn,
        Ok(Err(err)) => {
            tracing::error!(error = %err, "Deep health check: connection acquisition failed");
            return "error";
        }
        Err(_) => {
            tracing::error!("Deep health check: connection acquisition timed out");
            return "error";
        }
    };

    match timeout(QUERY_TIMEOUT, sqlx::query("SELECT 1").execute(&mut *conn)).await {
        Ok(Ok(_)) => "ok",
        Ok(Err(err)) => {
            tracing::error!(error = %err, "Deep health check: probe query failed");
            "error"
        }
        Err(_) => {
            tracing::error!("Deep health check: probe query timed out");
            "error"
        }
    }
}

/// Mount health check routes (intended for root-level mounting).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/deep", get(deep_health_check))
}
