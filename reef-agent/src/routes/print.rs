//! Printer listing and print routes

use axum::{Json, Router, extract::State, routing::get, routing::post};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::discovery::types::Printer;
use crate::printing::{JobKind, Order, PrintJob};
use crate::server::ServerState;
use crate::utils::{AppError, AppResult};

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/printers", get(list_printers))
        .route("/print-test", post(print_test))
        .route("/print", post(print_raw))
        .route("/print-order", post(print_order))
}

#[derive(Serialize)]
pub struct PrintResponse {
    success: bool,
    message: String,
}

impl PrintResponse {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// All printers currently known to the registry
pub async fn list_printers(State(state): State<ServerState>) -> Json<Vec<Printer>> {
    Json(state.registry.list().await)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintTestRequest {
    #[serde(default)]
    printer_id: Option<String>,
}

/// Render and print a test page on the requested printer
pub async fn print_test(
    State(state): State<ServerState>,
    Json(req): Json<PrintTestRequest>,
) -> AppResult<Json<PrintResponse>> {
    let printer_id = require(req.printer_id, "printerId is required")?;

    let printer = state
        .registry
        .find_by_id(&printer_id)
        .await
        .ok_or_else(|| AppError::PrintFailed(format!("Printer not found: {}", printer_id)))?;

    let data = state.renderer.test_page(&printer);
    let job = PrintJob::new(printer_id, data, JobKind::Test);
    state.dispatcher.dispatch(&job).await?;

    Ok(Json(PrintResponse::ok("Test page printed successfully")))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintRequest {
    #[serde(default)]
    printer_id: Option<String>,
    #[serde(default)]
    data: Option<String>,
    /// Advisory payload tag; every payload is dispatched the same way
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// Print a caller-supplied, already-formatted payload
pub async fn print_raw(
    State(state): State<ServerState>,
    Json(req): Json<PrintRequest>,
) -> AppResult<Json<PrintResponse>> {
    let printer_id = require(req.printer_id, "printerId and data are required")?;
    let data = require(req.data, "printerId and data are required")?;

    if let Some(kind) = &req.kind {
        debug!(kind = %kind, "payload type tag");
    }

    state
        .dispatcher
        .send(&printer_id, data.into_bytes())
        .await?;

    Ok(Json(PrintResponse::ok("Print job sent successfully")))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintOrderRequest {
    #[serde(default)]
    printer_id: Option<String>,
    #[serde(default)]
    order: Option<Order>,
}

/// Render and print an order ticket
pub async fn print_order(
    State(state): State<ServerState>,
    Json(req): Json<PrintOrderRequest>,
) -> AppResult<Json<PrintResponse>> {
    let printer_id = require(req.printer_id, "printerId and order are required")?;
    let order = req
        .order
        .ok_or_else(|| AppError::validation("printerId and order are required"))?;

    let data = state.renderer.order(&order);
    let job = PrintJob::new(printer_id, data, JobKind::Order);
    state.dispatcher.dispatch(&job).await?;

    Ok(Json(PrintResponse::ok("Order printed successfully")))
}

/// Reject empty or missing required string fields with a 400
fn require(value: Option<String>, message: &str) -> AppResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation(message))
}
