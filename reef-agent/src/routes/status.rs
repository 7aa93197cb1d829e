//! Agent status and health routes

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use sysinfo::System;

use crate::discovery::types::Printer;
use crate::server::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/status", get(status))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

/// Liveness only
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    connected: bool,
    version: &'static str,
    computer_name: String,
    printers: Vec<Printer>,
    uptime: u64,
    platform: &'static str,
}

/// Agent status plus the current printer catalog
pub async fn status(State(state): State<ServerState>) -> Json<StatusResponse> {
    let printers = state.registry.list().await;

    Json(StatusResponse {
        connected: true,
        version: env!("CARGO_PKG_VERSION"),
        computer_name: System::host_name().unwrap_or_else(|| "unknown".to_string()),
        printers,
        uptime: state.uptime_seconds(),
        platform: std::env::consts::OS,
    })
}
