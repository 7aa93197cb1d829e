//! Printer catalog types

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Physical connection method of a discovered printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Network,
    Usb,
    Serial,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Network => "network",
            Transport::Usb => "usb",
            Transport::Serial => "serial",
        }
    }
}

/// Best-effort printer availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Online,
    Offline,
}

/// A printer reachable from this host
///
/// `id` is derived from stable inputs (spooler name or network address),
/// never from discovery order, so it survives repeated refreshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Printer {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub transport: Transport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Spooler-recognized name, present for OS-listed printers
    #[serde(rename = "driverName", skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    /// Raw OS port descriptor, kept for diagnostics
    #[serde(rename = "portName", skip_serializing_if = "Option::is_none")]
    pub port_name: Option<String>,
    pub status: Availability,
}

/// One discovery result: the printer catalog plus when it was produced
///
/// Replaced in whole on refresh, never mutated in place.
#[derive(Debug, Clone)]
pub struct DiscoverySnapshot {
    pub printers: Vec<Printer>,
    pub taken_at: Option<Instant>,
}

impl DiscoverySnapshot {
    pub fn empty() -> Self {
        Self {
            printers: Vec::new(),
            taken_at: None,
        }
    }
}
