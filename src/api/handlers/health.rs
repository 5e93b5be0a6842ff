//! `GET /health` (spec §6.1, §6.1a).

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    consumers: usize,
    #[serde(rename = "runningDispatchers")]
    running_dispatchers: Vec<String>,
    #[serde(rename = "uptimeSeconds")]
    uptime_seconds: u64,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        consumers: state.consumers.count(),
        running_dispatchers: state.dispatchers.running_dispatchers(),
        uptime_seconds: state.uptime_seconds(),
    })
}
