//! Printer registry: cached catalog of discovered printers
//!
//! Owns the current [`DiscoverySnapshot`] and refreshes it from the two
//! discovery sources when the TTL expires. Refreshes are single-flight:
//! concurrent `list()` callers share one in-flight refresh instead of
//! racing their own.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument, warn};

use super::{DiscoveryObserver, DiscoverySource};
use crate::discovery::types::{DiscoverySnapshot, Printer};

/// Cached printer catalog fed by the discovery sources
pub struct PrinterRegistry {
    ttl: Duration,
    local: Arc<dyn DiscoverySource>,
    network: Arc<dyn DiscoverySource>,
    observer: Arc<dyn DiscoveryObserver>,
    snapshot: RwLock<DiscoverySnapshot>,
    refresh_lock: Mutex<()>,
}

impl PrinterRegistry {
    pub fn new(
        ttl: Duration,
        local: Arc<dyn DiscoverySource>,
        network: Arc<dyn DiscoverySource>,
        observer: Arc<dyn DiscoveryObserver>,
    ) -> Self {
        Self {
            ttl,
            local,
            network,
            observer,
            snapshot: RwLock::new(DiscoverySnapshot::empty()),
            refresh_lock: Mutex::new(()),
        }
    }

    /// List known printers, refreshing the catalog when the cache expired
    ///
    /// An empty catalog from a degraded environment is a valid result,
    /// not an error.
    pub async fn list(&self) -> Vec<Printer> {
        if let Some(printers) = self.cached().await {
            return printers;
        }

        // Single-flight: the first caller past this lock refreshes, late
        // callers find the fresh snapshot on the re-check and reuse it.
        let _guard = self.refresh_lock.lock().await;
        if let Some(printers) = self.cached().await {
            return printers;
        }

        self.refresh().await
    }

    /// Look up one printer by id; absence is a recoverable condition
    pub async fn find_by_id(&self, id: &str) -> Option<Printer> {
        self.list().await.into_iter().find(|p| p.id == id)
    }

    /// Return the cached catalog while it is fresh and non-empty
    async fn cached(&self) -> Option<Vec<Printer>> {
        let snapshot = self.snapshot.read().await;
        match snapshot.taken_at {
            Some(taken_at)
                if taken_at.elapsed() < self.ttl && !snapshot.printers.is_empty() =>
            {
                Some(snapshot.printers.clone())
            }
            _ => None,
        }
    }

    /// Run both discovery sources and install the merged catalog
    ///
    /// A failed source contributes nothing; if every source fails the
    /// previous snapshot is served unchanged.
    #[instrument(skip(self))]
    async fn refresh(&self) -> Vec<Printer> {
        let (local, network) = tokio::join!(
            self.run_source(&self.local),
            self.run_source(&self.network)
        );

        if local.is_none() && network.is_none() {
            warn!("all discovery sources failed, serving previous snapshot");
            return self.snapshot.read().await.printers.clone();
        }

        let merged = merge(local.unwrap_or_default(), network.unwrap_or_default());
        info!(count = merged.len(), "printer catalog refreshed");

        let mut snapshot = self.snapshot.write().await;
        *snapshot = DiscoverySnapshot {
            printers: merged.clone(),
            taken_at: Some(Instant::now()),
        };
        merged
    }

    /// Run one source on its own task so an internal panic degrades to an
    /// empty contribution instead of tearing down the refresh
    async fn run_source(&self, source: &Arc<dyn DiscoverySource>) -> Option<Vec<Printer>> {
        let task = Arc::clone(source);
        match tokio::spawn(async move { task.discover().await }).await {
            Ok(printers) => Some(printers),
            Err(e) => {
                self.observer
                    .discovery_failure(source.source_name(), &e.to_string());
                None
            }
        }
    }
}

/// Merge the two source catalogs
///
/// OS-listed printers come first; a probed printer whose address is
/// already claimed by an OS record is the same device and is dropped, so
/// the merged record keeps the spooler handle. Ids are unique within the
/// result.
fn merge(local: Vec<Printer>, network: Vec<Printer>) -> Vec<Printer> {
    let mut merged: Vec<Printer> = Vec::with_capacity(local.len() + network.len());

    for printer in local.into_iter().chain(network) {
        let same_address = printer.ip.as_deref().is_some_and(|ip| {
            merged.iter().any(|known| known.ip.as_deref() == Some(ip))
        });
        let same_id = merged.iter().any(|known| known.id == printer.id);

        if !same_address && !same_id {
            merged.push(printer);
        }
    }

    merged
}
