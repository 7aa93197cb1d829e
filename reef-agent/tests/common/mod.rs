//! Shared fixtures: mock discovery sources and counting observers
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use reef_agent::discovery::types::{Availability, Printer, Transport};
use reef_agent::discovery::{DiscoveryObserver, DiscoverySource};

/// Scripted discovery source with an invocation counter
pub struct MockSource {
    name: &'static str,
    printers: Vec<Printer>,
    delay: Duration,
    /// Panic on every call past this many successful ones
    panic_after: Option<usize>,
    calls: AtomicUsize,
}

impl MockSource {
    pub fn new(name: &'static str, printers: Vec<Printer>) -> Arc<Self> {
        Arc::new(Self {
            name,
            printers,
            delay: Duration::ZERO,
            panic_after: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn with_delay(name: &'static str, printers: Vec<Printer>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            name,
            printers,
            delay,
            panic_after: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn panicking(name: &'static str) -> Arc<Self> {
        Self::panicking_after(name, Vec::new(), 0)
    }

    pub fn panicking_after(
        name: &'static str,
        printers: Vec<Printer>,
        successes: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            name,
            printers,
            delay: Duration::ZERO,
            panic_after: Some(successes),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiscoverySource for MockSource {
    fn source_name(&self) -> &'static str {
        self.name
    }

    async fn discover(&self) -> Vec<Printer> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if self.delay > Duration::ZERO {
            tokio::time::sleep(self.delay).await;
        }
        if self.panic_after.is_some_and(|successes| call >= successes) {
            panic!("scripted discovery failure");
        }
        self.printers.clone()
    }
}

/// Observer counting failure reports
#[derive(Default)]
pub struct CountingObserver {
    failures: AtomicUsize,
}

impl CountingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }
}

impl DiscoveryObserver for CountingObserver {
    fn discovery_failure(&self, _source: &str, _error: &str) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }
}

/// An OS-listed printer record
pub fn os_printer(id: &str, name: &str, ip: Option<&str>, port: Option<u16>) -> Printer {
    Printer {
        id: id.to_string(),
        name: name.to_string(),
        transport: if ip.is_some() {
            Transport::Network
        } else {
            Transport::Usb
        },
        ip: ip.map(str::to_string),
        port,
        driver_name: Some(name.to_string()),
        port_name: None,
        status: Availability::Online,
    }
}

/// A subnet-probed printer record
pub fn net_printer(ip: &str, port: u16) -> Printer {
    Printer {
        id: format!("net-{}", ip.replace('.', "-")),
        name: format!("Impressora {}", ip),
        transport: Transport::Network,
        ip: Some(ip.to_string()),
        port: Some(port),
        driver_name: None,
        port_name: None,
        status: Availability::Online,
    }
}
