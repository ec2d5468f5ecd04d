//! Common test utilities and fixture helpers.

use std::path::PathBuf;

use chrono::{DateTime, Duration, TimeZone, Utc};
use wormway_lib::{
    Graph, LifetimeClass, Location, MassTable, Stability, StaticLink, WormholeRegistry,
    WormholeReport,
};

/// Path to fixtures directory shared with the CLI tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Mass table from `docs/fixtures/vehicle_masses.csv`.
#[allow(dead_code)]
pub fn fixture_mass_table() -> MassTable {
    MassTable::from_path(&fixtures_dir().join("vehicle_masses.csv"))
        .expect("load fixture vehicle_masses.csv")
}

/// Reference clock used by every scenario: 2026-03-01T00:00:00Z plus `hours`.
#[allow(dead_code)]
pub fn at(hours: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap() + Duration::hours(hours)
}

#[allow(dead_code)]
pub fn report(
    from: &str,
    to: &str,
    stability: Stability,
    created_hours: i64,
    lifetime: LifetimeClass,
) -> WormholeReport {
    WormholeReport {
        from: from.to_string(),
        to: to.to_string(),
        stability,
        mass_cap_kg: 375_000_000.0,
        created_at: at(created_hours),
        lifetime,
        label: None,
    }
}

/// Locations A, B, C with gates A-B and B-C, optionally a bridge A-C.
#[allow(dead_code)]
pub fn triangle(with_bridge: bool) -> Graph {
    let mut links = vec![StaticLink::gate("A", "B"), StaticLink::gate("B", "C")];
    if with_bridge {
        links.push(StaticLink::bridge("A", "C"));
    }
    Graph::load(["A", "B", "C"].map(|name| Location::new(name, "Core")), links)
        .expect("triangle loads")
}

/// The network described by `docs/fixtures/sample_network.json`, built in code.
#[allow(dead_code)]
pub fn sample_graph() -> Graph {
    let locations = [
        ("Rens", "Heimatar"),
        ("Frarn", "Heimatar"),
        ("Gyng", "Heimatar"),
        ("Onga", "Heimatar"),
        ("Lustrevik", "Heimatar"),
        ("Hek", "Metropolis"),
        ("Nakugard", "Metropolis"),
        ("Dal", "Metropolis"),
        ("Barbican", "Drifter Space"),
        ("Amarr", "Domain"),
        ("Ashab", "Domain"),
        ("Sarum Prime", "Domain"),
    ]
    .map(|(name, region)| Location::new(name, region));
    let links = vec![
        StaticLink::gate("Rens", "Frarn"),
        StaticLink::gate("Frarn", "Gyng"),
        StaticLink::gate("Gyng", "Onga"),
        StaticLink::gate("Onga", "Lustrevik"),
        StaticLink::gate("Rens", "Hek"),
        StaticLink::gate("Hek", "Nakugard"),
        StaticLink::gate("Nakugard", "Dal"),
        StaticLink::bridge("Hek", "Lustrevik"),
        StaticLink::gate("Amarr", "Ashab"),
        StaticLink::gate("Ashab", "Sarum Prime"),
        StaticLink::bridge("Amarr", "Sarum Prime"),
    ];
    Graph::load(locations, links).expect("sample graph loads")
}

/// Registry over [`sample_graph`] holding the fixture's three wormholes.
#[allow(dead_code)]
pub fn sample_registry(graph: &Graph) -> WormholeRegistry {
    let registry = WormholeRegistry::new(graph.clone());
    for report in [
        report("Onga", "Barbican", Stability::Fresh, 0, LifetimeClass::Hours48),
        report("Barbican", "Ashab", Stability::Reduced, 6, LifetimeClass::Hours24),
        report("Dal", "Amarr", Stability::Critical, 0, LifetimeClass::Hours16),
    ] {
        registry.add(report).expect("fixture wormhole is valid");
    }
    registry
}
