//! Local-source discovery: printers registered with the OS spooler
//!
//! Enumerates host printers through the OS listing command and classifies
//! each by its port descriptor. Never fails past its boundary: enumeration
//! or parse problems degrade to an empty contribution plus an observer
//! report.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use tracing::{debug, instrument};

use reef_printer::RAW_PORT;

use super::{DiscoveryObserver, DiscoverySource};
use crate::discovery::types::{Availability, Printer, Transport};

/// Printers registered with the OS print spooler
pub struct LocalDiscovery {
    command_timeout: Duration,
    observer: Arc<dyn DiscoveryObserver>,
}

impl LocalDiscovery {
    pub fn new(command_timeout: Duration, observer: Arc<dyn DiscoveryObserver>) -> Self {
        Self {
            command_timeout,
            observer,
        }
    }
}

#[async_trait]
impl DiscoverySource for LocalDiscovery {
    fn source_name(&self) -> &'static str {
        "local"
    }

    #[instrument(skip(self))]
    async fn discover(&self) -> Vec<Printer> {
        match platform::printer_listing(self.command_timeout).await {
            Ok(listing) => {
                let printers = parse_printer_listing(&listing);
                debug!(count = printers.len(), "local discovery finished");
                printers
            }
            Err(e) => {
                self.observer.discovery_failure("local", &e.to_string());
                Vec::new()
            }
        }
    }
}

#[cfg(windows)]
mod platform {
    use std::io::{Error, ErrorKind};
    use std::time::Duration;

    use tokio::process::Command;

    /// Run the OS printer listing command, producing CSV rows
    pub async fn printer_listing(timeout: Duration) -> std::io::Result<String> {
        let output = tokio::time::timeout(
            timeout,
            Command::new("wmic")
                .args(["printer", "get", "name,portname,status", "/format:csv"])
                .output(),
        )
        .await
        .map_err(|_| Error::new(ErrorKind::TimedOut, "printer listing timed out"))??;

        if !output.status.success() {
            return Err(Error::other(format!(
                "printer listing exited with {}",
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(not(windows))]
mod platform {
    use std::time::Duration;

    /// Spooler enumeration is only wired up for Windows hosts; elsewhere the
    /// local source contributes nothing and network probing carries discovery.
    pub async fn printer_listing(_timeout: Duration) -> std::io::Result<String> {
        Ok(String::new())
    }
}

/// Parse the CSV printer listing (`Node,Name,PortName,Status` rows)
///
/// The column layout is a parsing contract: the header row is skipped and
/// rows without at least the name and port columns are rejected rather than
/// indexed blindly.
pub(crate) fn parse_printer_listing(listing: &str) -> Vec<Printer> {
    let mut printers = Vec::new();

    let mut rows = listing
        .lines()
        .map(|l| l.trim_end_matches('\r').trim())
        .filter(|l| !l.is_empty());

    // First row is the column header
    let _header = rows.next();

    for row in rows {
        let parts: Vec<&str> = row.split(',').collect();
        if parts.len() < 3 {
            continue;
        }

        let name = parts[1].trim();
        if name.is_empty() {
            continue;
        }
        let port_name = parts[2].trim();
        let status = parts.get(3).map(|s| s.trim()).unwrap_or("");

        let (transport, ip, port) = classify_port(port_name);

        let availability = if status == "OK" || status.is_empty() {
            Availability::Online
        } else {
            Availability::Offline
        };

        printers.push(Printer {
            id: local_printer_id(name),
            name: name.to_string(),
            transport,
            ip,
            port,
            driver_name: Some(name.to_string()),
            port_name: Some(port_name.to_string()),
            status: availability,
        });
    }

    printers
}

/// Classify a printer transport from its OS port descriptor
///
/// `IP_<addr>` and `<addr>:<port>` descriptors are network printers; a
/// `:`-bearing descriptor only counts when its host half is an IPv4
/// literal, so virtual ports like `PORTPROMPT:` stay on the usb fallback.
fn classify_port(descriptor: &str) -> (Transport, Option<String>, Option<u16>) {
    if let Some(rest) = descriptor.strip_prefix("IP_") {
        let host: String = rest
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if host.parse::<Ipv4Addr>().is_ok() {
            return (Transport::Network, Some(host), Some(RAW_PORT));
        }
        return (Transport::Network, None, None);
    }

    if let Some((host, port)) = descriptor.split_once(':')
        && host.parse::<Ipv4Addr>().is_ok()
    {
        let port = port.parse().unwrap_or(RAW_PORT);
        return (Transport::Network, Some(host.to_string()), Some(port));
    }

    if descriptor.starts_with("COM") {
        return (Transport::Serial, None, None);
    }

    (Transport::Usb, None, None)
}

/// Derive a stable id for an OS-listed printer from its spooler name
fn local_printer_id(name: &str) -> String {
    let encoded = BASE64.encode(name);
    let prefix: String = encoded.chars().take(12).collect();
    format!("win-{}", prefix)
}
