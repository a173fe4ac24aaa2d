//! Liveness and backend connectivity

use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    server_running: bool,
    ollama_connected: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        server_running: true,
        ollama_connected: state.pipeline.backend().is_healthy().await,
    })
}
