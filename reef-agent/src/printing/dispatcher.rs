//! Print dispatch engine
//!
//! Resolves a job's target through the registry, selects the transport
//! adapter and executes a single bounded send. Faults never propagate as
//! panics; every outcome is a [`DispatchError`] with a reason.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, instrument};

use reef_printer::{
    NetworkPrinter, PrintError, Printer as PrinterAdapter, RAW_PORT, SerialPrinter, SpoolerPrinter,
};

use super::types::{JobKind, PrintJob};
use crate::discovery::registry::PrinterRegistry;
use crate::discovery::types::{Printer, Transport};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Printer not found: {0}")]
    PrinterNotFound(String),

    #[error("Unsupported printer transport: {0}")]
    UnsupportedTransport(String),

    #[error("Print timed out after {0:?}")]
    Timeout(Duration),

    #[error("Print failed: {0}")]
    Transport(#[from] PrintError),
}

pub type DispatchResult = Result<(), DispatchError>;

/// Sends formatted payloads to the printer a job addresses
pub struct Dispatcher {
    registry: Arc<PrinterRegistry>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(registry: Arc<PrinterRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    /// Execute one dispatch: resolve, select transport, send once
    ///
    /// No retries; retry policy belongs to the caller.
    #[instrument(
        skip(self, job),
        fields(printer_id = %job.printer_id, kind = job.kind.as_str(), bytes = job.data.len())
    )]
    pub async fn dispatch(&self, job: &PrintJob) -> DispatchResult {
        let printer = self
            .registry
            .find_by_id(&job.printer_id)
            .await
            .ok_or_else(|| DispatchError::PrinterNotFound(job.printer_id.clone()))?;

        match tokio::time::timeout(self.timeout, self.send_to_printer(&printer, &job.data)).await {
            Ok(result) => {
                if result.is_ok() {
                    info!(printer = %printer.name, "print job sent");
                }
                result
            }
            Err(_) => Err(DispatchError::Timeout(self.timeout)),
        }
    }

    /// Dispatch a raw, caller-formatted payload
    pub async fn send(&self, printer_id: &str, data: Vec<u8>) -> DispatchResult {
        self.dispatch(&PrintJob::new(printer_id, data, JobKind::Raw))
            .await
    }

    /// Select the adapter for a printer and send the payload
    async fn send_to_printer(&self, printer: &Printer, data: &[u8]) -> DispatchResult {
        // A known network address takes precedence; the spooler handle is
        // the fallback for anything the OS registered.
        if printer.transport == Transport::Network
            && let Some(ip) = &printer.ip
        {
            let adapter = NetworkPrinter::new(ip, printer.port.unwrap_or(RAW_PORT))?;
            adapter.print(data).await?;
            return Ok(());
        }

        if let Some(name) = &printer.driver_name {
            let adapter = SpoolerPrinter::new(name);
            adapter.print(data).await?;
            return Ok(());
        }

        if printer.transport == Transport::Serial {
            let port = printer.port_name.as_deref().unwrap_or("unknown");
            SerialPrinter::new(port).print(data).await?;
            return Ok(());
        }

        Err(DispatchError::UnsupportedTransport(
            printer.transport.as_str().to_string(),
        ))
    }
}
