//! Printer discovery
//!
//! Two sources feed the registry: the OS spooler listing and a bounded
//! subnet probe on the raw printing port. Sources never fail past their
//! boundary; faults become an empty contribution plus an observer report.

pub mod local;
pub mod network;
pub mod registry;
pub mod types;

use async_trait::async_trait;
use tracing::warn;

pub use local::LocalDiscovery;
pub use network::NetworkDiscovery;
pub use registry::PrinterRegistry;
pub use types::{Availability, DiscoverySnapshot, Printer, Transport};

/// A discovery source contributing printers to the registry
///
/// `discover` is infallible by contract: implementations handle their own
/// failures and contribute an empty list.
#[async_trait]
pub trait DiscoverySource: Send + Sync {
    /// Short source label used in reports ("local", "network")
    fn source_name(&self) -> &'static str;

    async fn discover(&self) -> Vec<Printer>;
}

/// Observability hook for discovery failures
///
/// The surrounding shell (tray UI, status endpoint) can plug in its own
/// implementation; the default reports through the log.
pub trait DiscoveryObserver: Send + Sync {
    fn discovery_failure(&self, source: &str, error: &str);
}

/// Default observer: structured warning log
pub struct TracingObserver;

impl DiscoveryObserver for TracingObserver {
    fn discovery_failure(&self, source: &str, error: &str) {
        warn!(source, error, "discovery source failed");
    }
}
