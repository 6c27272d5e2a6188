//! Readiness endpoint

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use axum_helpers::server::{HealthCheckFuture, ReadyResponse, run_health_checks};

use crate::state::AppState;

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
        "database",
        Box::pin(async { state.db.ping().await.map_err(|e| e.to_string()) }),
    )];
    run_health_checks(checks).await
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(ready))
        .with_state(state)
}
