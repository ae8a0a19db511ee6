//! Unauthenticated service status: liveness, database readiness, build version.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct ServiceStatus {
    service: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    database: Option<&'static str>,
}

impl ServiceStatus {
    fn build() -> Self {
        ServiceStatus {
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            status: None,
            database: None,
        }
    }
}

async fn health() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: Some("ok"),
        ..ServiceStatus::build()
    })
}

/// 503 while the ledger database cannot answer a query.
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ServiceStatus>) {
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ServiceStatus {
                status: Some("ok"),
                database: Some("ok"),
                ..ServiceStatus::build()
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ServiceStatus {
                    status: Some("degraded"),
                    database: Some("unavailable"),
                    ..ServiceStatus::build()
                }),
            )
        }
    }
}

async fn version() -> Json<ServiceStatus> {
    Json(ServiceStatus::build())
}

/// GET /health, GET /ready, GET /version.
pub fn status_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/version", get(version))
        .with_state(state)
}
