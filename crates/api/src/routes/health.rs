//! Liveness probe, mounted at the root next to the application routes.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` while the store is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl HealthResponse {
    fn from_probe(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

/// GET /health
///
/// Always 200; a failing store shows up in the body, not the status.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let probe = state.store.health_check().await;
    if let Err(e) = &probe {
        tracing::warn!(error = %e, "Store health check failed");
    }
    Json(HealthResponse::from_probe(probe.is_ok()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
