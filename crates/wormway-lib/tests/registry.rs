mod common;

use std::thread;

use common::{at, report, sample_graph, sample_registry};
use wormway_lib::{Error, LifetimeClass, Stability, WormholeId, WormholeRegistry};

#[test]
fn expiry_is_monotonic_without_removal() {
    let graph = sample_graph();
    let registry = sample_registry(&graph);

    let mut previous: Option<Vec<WormholeId>> = None;
    // From the last report time onwards nothing new appears.
    for hour in 6..=72 {
        let active: Vec<WormholeId> = registry
            .active_links(at(hour))
            .iter()
            .map(|link| link.id)
            .collect();
        if let Some(previous) = &previous {
            assert!(
                active.iter().all(|id| previous.contains(id)),
                "link reappeared at hour {hour}"
            );
        }
        previous = Some(active);
    }

    assert!(registry.active_links(at(72)).is_empty());
    assert_eq!(registry.len(), 3, "expiry never deletes");
}

#[test]
fn prune_does_not_change_active_view() {
    let graph = sample_graph();
    let registry = sample_registry(&graph);
    let now = at(20);

    let before = registry.active_links(now);
    assert_eq!(registry.prune_expired(now), 1);
    assert_eq!(registry.active_links(now), before);
    assert_eq!(registry.len(), 2);
    assert!(registry.get(WormholeId(3)).is_none());
}

#[test]
fn unknown_endpoint_is_rejected_with_hint() {
    let graph = sample_graph();
    let registry = WormholeRegistry::new(graph);
    let err = registry
        .add(report("Onga", "Barbicane", Stability::Fresh, 0, LifetimeClass::Hours16))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidWormhole { .. }));
    assert!(err.to_string().contains("Barbican"), "{err}");
    assert!(registry.is_empty());
}

#[test]
fn readers_see_whole_snapshots_during_writes() {
    let graph = sample_graph();
    let registry = WormholeRegistry::new(graph);
    let pairs = [
        ("Onga", "Barbican"),
        ("Barbican", "Ashab"),
        ("Dal", "Amarr"),
        ("Gyng", "Hek"),
    ];

    thread::scope(|scope| {
        scope.spawn(|| {
            for (from, to) in pairs {
                registry
                    .add(report(from, to, Stability::Fresh, 0, LifetimeClass::Hours24))
                    .unwrap();
            }
        });
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..100 {
                    let ids: Vec<u64> = registry
                        .active_links(at(1))
                        .iter()
                        .map(|link| link.id.0)
                        .collect();
                    // Ids are handed out sequentially, so any snapshot is a prefix.
                    let expected: Vec<u64> = (1..=ids.len() as u64).collect();
                    assert_eq!(ids, expected);
                }
            });
        }
    });

    assert_eq!(registry.len(), 4);
}

#[test]
fn concurrent_writers_get_distinct_ids() {
    let graph = sample_graph();
    let registry = WormholeRegistry::new(graph);
    let pairs = [
        ("Onga", "Barbican"),
        ("Barbican", "Ashab"),
        ("Dal", "Amarr"),
        ("Gyng", "Hek"),
    ];

    thread::scope(|scope| {
        for (from, to) in pairs {
            let registry = &registry;
            scope.spawn(move || {
                let id = registry
                    .add(report(from, to, Stability::Reduced, 0, LifetimeClass::Hours16))
                    .unwrap();
                registry.remove(id).unwrap();
                registry
                    .add(report(from, to, Stability::Reduced, 0, LifetimeClass::Hours16))
                    .unwrap()
            });
        }
    });

    let mut ids: Vec<u64> = registry.snapshot().keys().map(|id| id.0).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 4);
    assert!(ids.iter().all(|id| (1..=8).contains(id)));
    assert!(matches!(
        registry.remove(WormholeId(99)),
        Err(Error::UnknownWormhole { .. })
    ));
}
