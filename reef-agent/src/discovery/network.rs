//! Network-source discovery: subnet probing for thermal printers
//!
//! Probes a bounded set of likely device addresses on the raw printing
//! port instead of sweeping the whole /24; the candidate octets and the
//! probe timeout are configuration.

use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, instrument};

use reef_printer::{NetworkPrinter, Printer as _, RAW_PORT};

use super::DiscoverySource;
use crate::discovery::types::{Availability, Printer, Transport};

/// Thermal printers reachable on the local subnet (TCP port 9100)
pub struct NetworkDiscovery {
    probe_timeout: Duration,
    probe_hosts: Vec<u8>,
}

impl NetworkDiscovery {
    pub fn new(probe_timeout: Duration, probe_hosts: Vec<u8>) -> Self {
        Self {
            probe_timeout,
            probe_hosts,
        }
    }
}

#[async_trait]
impl DiscoverySource for NetworkDiscovery {
    fn source_name(&self) -> &'static str {
        "network"
    }

    #[instrument(skip(self))]
    async fn discover(&self) -> Vec<Printer> {
        let Some(local_ip) = local_ipv4() else {
            debug!("no usable local IPv4 interface, skipping subnet probe");
            return Vec::new();
        };

        let candidates = subnet_candidates(local_ip, &self.probe_hosts);

        let probes = candidates.iter().map(|ip| {
            let ip = *ip;
            let timeout = self.probe_timeout;
            async move { (ip, probe(ip, RAW_PORT, timeout).await) }
        });

        let printers: Vec<Printer> = join_all(probes)
            .await
            .into_iter()
            .filter(|(_, reachable)| *reachable)
            .map(|(ip, _)| network_printer(ip))
            .collect();

        debug!(count = printers.len(), "network discovery finished");
        printers
    }
}

/// Determine the host's non-loopback IPv4 address
///
/// Connects a datagram socket to a public address and reads the local
/// endpoint the OS picked; no packets are sent.
fn local_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    match socket.local_addr().ok()? {
        SocketAddr::V4(addr) if !addr.ip().is_loopback() && !addr.ip().is_unspecified() => {
            Some(*addr.ip())
        }
        _ => None,
    }
}

/// Candidate device addresses inside the host's /24
fn subnet_candidates(local_ip: Ipv4Addr, hosts: &[u8]) -> Vec<Ipv4Addr> {
    let [a, b, c, _] = local_ip.octets();
    hosts
        .iter()
        .map(|last| Ipv4Addr::new(a, b, c, *last))
        .collect()
}

/// Check whether a candidate accepts connections on the raw printing port
async fn probe(ip: Ipv4Addr, port: u16, timeout: Duration) -> bool {
    match NetworkPrinter::new(&ip.to_string(), port) {
        Ok(printer) => printer.with_probe_timeout(timeout).is_online().await,
        Err(_) => false,
    }
}

/// Synthesize the printer record for a reachable candidate
fn network_printer(ip: Ipv4Addr) -> Printer {
    Printer {
        id: network_printer_id(ip),
        name: format!("Impressora {}", ip),
        transport: Transport::Network,
        ip: Some(ip.to_string()),
        port: Some(RAW_PORT),
        driver_name: None,
        port_name: None,
        status: Availability::Online,
    }
}

/// Derive a stable id for a probed printer from its address
fn network_printer_id(ip: Ipv4Addr) -> String {
    format!("net-{}", ip.to_string().replace('.', "-"))
}
