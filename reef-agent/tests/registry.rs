//! Registry cache, single-flight and dedup behavior

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{CountingObserver, MockSource, net_printer, os_printer};
use reef_agent::discovery::PrinterRegistry;

fn registry(
    ttl: Duration,
    local: Arc<MockSource>,
    network: Arc<MockSource>,
    observer: Arc<CountingObserver>,
) -> PrinterRegistry {
    PrinterRegistry::new(ttl, local, network, observer)
}

#[tokio::test]
async fn list_within_ttl_hits_cache() {
    let local = MockSource::new("local", vec![os_printer("win-abc", "POS-58", None, None)]);
    let network = MockSource::new("network", vec![]);
    let reg = registry(
        Duration::from_secs(30),
        Arc::clone(&local),
        Arc::clone(&network),
        CountingObserver::new(),
    );

    let first = reg.list().await;
    let second = reg.list().await;

    assert_eq!(first, second);
    assert_eq!(local.call_count(), 1);
    assert_eq!(network.call_count(), 1);
}

#[tokio::test]
async fn list_after_ttl_refreshes() {
    let local = MockSource::new("local", vec![os_printer("win-abc", "POS-58", None, None)]);
    let network = MockSource::new("network", vec![]);
    let reg = registry(
        Duration::from_millis(20),
        Arc::clone(&local),
        Arc::clone(&network),
        CountingObserver::new(),
    );

    reg.list().await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    reg.list().await;

    assert_eq!(local.call_count(), 2);
}

#[tokio::test]
async fn empty_snapshot_is_not_cached() {
    // A degraded environment yields an empty catalog; the next call probes again
    let local = MockSource::new("local", vec![]);
    let network = MockSource::new("network", vec![]);
    let reg = registry(
        Duration::from_secs(30),
        Arc::clone(&local),
        Arc::clone(&network),
        CountingObserver::new(),
    );

    assert!(reg.list().await.is_empty());
    assert!(reg.list().await.is_empty());
    assert_eq!(local.call_count(), 2);
}

#[tokio::test]
async fn concurrent_lists_share_one_refresh() {
    let local = MockSource::with_delay(
        "local",
        vec![os_printer("win-abc", "POS-58", None, None)],
        Duration::from_millis(100),
    );
    let network = MockSource::new("network", vec![]);
    let reg = Arc::new(registry(
        Duration::from_secs(30),
        Arc::clone(&local),
        Arc::clone(&network),
        CountingObserver::new(),
    ));

    let callers = (0..10).map(|_| {
        let reg = Arc::clone(&reg);
        tokio::spawn(async move { reg.list().await })
    });

    for caller in callers {
        let printers = caller.await.unwrap();
        assert_eq!(printers.len(), 1);
    }

    assert_eq!(local.call_count(), 1);
    assert_eq!(network.call_count(), 1);
}

#[tokio::test]
async fn merge_prefers_os_record_for_shared_address() {
    let local = MockSource::new(
        "local",
        vec![os_printer(
            "win-abc",
            "POS-58 Printer",
            Some("192.168.1.200"),
            Some(9100),
        )],
    );
    let network = MockSource::new(
        "network",
        vec![
            net_printer("192.168.1.200", 9100),
            net_printer("192.168.1.100", 9100),
        ],
    );
    let reg = registry(
        Duration::from_secs(30),
        local,
        network,
        CountingObserver::new(),
    );

    let printers = reg.list().await;

    assert_eq!(printers.len(), 2);
    // The merged record for .200 keeps the spooler handle
    let merged = printers
        .iter()
        .find(|p| p.ip.as_deref() == Some("192.168.1.200"))
        .unwrap();
    assert_eq!(merged.id, "win-abc");
    assert_eq!(merged.driver_name.as_deref(), Some("POS-58 Printer"));
}

#[tokio::test]
async fn no_duplicate_ids_in_catalog() {
    let local = MockSource::new(
        "local",
        vec![
            os_printer("win-abc", "POS-58", None, None),
            os_printer("win-abc", "POS-58", None, None),
        ],
    );
    let network = MockSource::new("network", vec![net_printer("192.168.1.100", 9100)]);
    let reg = registry(
        Duration::from_secs(30),
        local,
        network,
        CountingObserver::new(),
    );

    let printers = reg.list().await;
    let mut ids: Vec<_> = printers.iter().map(|p| p.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), printers.len());
}

#[tokio::test]
async fn panicking_source_degrades_to_empty_contribution() {
    let local = MockSource::panicking("local");
    let network = MockSource::new("network", vec![net_printer("192.168.1.100", 9100)]);
    let observer = CountingObserver::new();
    let reg = registry(
        Duration::from_secs(30),
        local,
        network,
        Arc::clone(&observer),
    );

    let printers = reg.list().await;

    assert_eq!(printers.len(), 1);
    assert_eq!(printers[0].id, "net-192-168-1-100");
    assert_eq!(observer.failure_count(), 1);
}

#[tokio::test]
async fn all_sources_failing_serves_previous_snapshot() {
    // Both sources succeed once, then fail on every later refresh
    let local = MockSource::panicking_after(
        "local",
        vec![os_printer("win-abc", "POS-58", None, None)],
        1,
    );
    let network = MockSource::panicking_after("network", vec![], 1);
    let observer = CountingObserver::new();
    let reg = registry(
        Duration::from_millis(20),
        local,
        network,
        Arc::clone(&observer),
    );

    let seeded = reg.list().await;
    assert_eq!(seeded.len(), 1);

    tokio::time::sleep(Duration::from_millis(50)).await;

    // The failed refresh must not replace the snapshot
    let printers = reg.list().await;
    assert_eq!(printers, seeded);
    assert_eq!(observer.failure_count(), 2);
}

#[tokio::test]
async fn find_by_id_distinguishes_absence() {
    let local = MockSource::new("local", vec![os_printer("win-abc", "POS-58", None, None)]);
    let network = MockSource::new("network", vec![]);
    let reg = registry(
        Duration::from_secs(30),
        local,
        network,
        CountingObserver::new(),
    );

    assert!(reg.find_by_id("win-abc").await.is_some());
    assert!(reg.find_by_id("nonexistent").await.is_none());
}

#[tokio::test]
async fn ids_are_stable_across_refreshes() {
    let local = MockSource::new("local", vec![os_printer("win-abc", "POS-58", None, None)]);
    let network = MockSource::new("network", vec![net_printer("192.168.1.100", 9100)]);
    let reg = registry(
        Duration::from_millis(10),
        local,
        network,
        CountingObserver::new(),
    );

    let first: Vec<String> = reg.list().await.into_iter().map(|p| p.id).collect();
    tokio::time::sleep(Duration::from_millis(30)).await;
    let second: Vec<String> = reg.list().await.into_iter().map(|p| p.id).collect();

    assert_eq!(first, second);
}
