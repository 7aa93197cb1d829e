use std::sync::Arc;
use std::time::Instant;

use crate::discovery::{
    DiscoveryObserver, LocalDiscovery, NetworkDiscovery, PrinterRegistry, TracingObserver,
};
use crate::printing::{Dispatcher, TicketRenderer};
use crate::server::Config;

/// Shared application state, cheap to clone into handlers
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub registry: Arc<PrinterRegistry>,
    pub dispatcher: Arc<Dispatcher>,
    pub renderer: Arc<TicketRenderer>,
    started_at: Instant,
}

impl ServerState {
    /// Wire up the production discovery sources and print pipeline
    pub fn initialize(config: &Config) -> Self {
        let observer: Arc<dyn DiscoveryObserver> = Arc::new(TracingObserver);

        let local = Arc::new(LocalDiscovery::new(
            config.listing_timeout,
            Arc::clone(&observer),
        ));
        let network = Arc::new(NetworkDiscovery::new(
            config.probe_timeout,
            config.probe_hosts.clone(),
        ));

        let registry = Arc::new(PrinterRegistry::new(
            config.cache_ttl,
            local,
            network,
            observer,
        ));

        Self::with_registry(config.clone(), registry)
    }

    /// Build state over an existing registry (tests plug in mock sources)
    pub fn with_registry(config: Config, registry: Arc<PrinterRegistry>) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&registry),
            config.dispatch_timeout,
        ));
        let renderer = Arc::new(TicketRenderer::new(config.paper_width));

        Self {
            config,
            registry,
            dispatcher,
            renderer,
            started_at: Instant::now(),
        }
    }

    /// Seconds since this agent process started serving
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
