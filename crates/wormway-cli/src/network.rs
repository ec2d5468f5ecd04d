//! Network file loading.
//!
//! A network file is a single JSON document holding the static locations and links plus any
//! wormhole reports known when it was written:
//!
//! ```json
//! {
//!   "locations": [{ "name": "Rens", "region": "Heimatar" }],
//!   "links": [{ "from": "Rens", "to": "Hek", "kind": "gate" }],
//!   "wormholes": [{ "from": "Onga", "to": "Barbican", "stability": "fresh",
//!                   "mass_cap_kg": 375000000, "created_at": "2026-03-01T00:00:00Z",
//!                   "lifetime": "48h", "label": "L-1SW8" }]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use wormway_lib::{Graph, Location, StaticLink, WormholeRegistry, WormholeReport};

/// On-disk description of a network.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkFile {
    pub locations: Vec<Location>,
    #[serde(default)]
    pub links: Vec<StaticLink>,
    #[serde(default)]
    pub wormholes: Vec<WormholeReport>,
}

/// A loaded static graph and the registry holding its reported wormholes.
#[derive(Debug)]
pub struct Network {
    pub graph: Graph,
    pub registry: WormholeRegistry,
}

impl NetworkFile {
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read network file {}", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("failed to parse network file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Build the graph, then register every wormhole in file order so ids start at 1 and
    /// follow the file.
    pub fn into_network(self) -> Result<Network> {
        let graph =
            Graph::load(self.locations, self.links).context("failed to build network graph")?;
        let registry = WormholeRegistry::new(graph.clone());
        for (index, report) in self.wormholes.into_iter().enumerate() {
            let describe = report
                .label
                .clone()
                .unwrap_or_else(|| format!("{} -> {}", report.from, report.to));
            registry
                .add(report)
                .with_context(|| format!("failed to register wormhole {} ({describe})", index + 1))?;
        }
        Ok(Network { graph, registry })
    }
}

/// Read and build a network from `path`.
pub fn load_network(path: &Path) -> Result<Network> {
    let network = NetworkFile::from_path(path)?.into_network()?;
    tracing::debug!(
        "network {} has {} locations, {} links and {} wormholes",
        path.display(),
        network.graph.len(),
        network.graph.link_count(),
        network.registry.len()
    );
    Ok(network)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wormway_lib::WormholeId;

    const NETWORK: &str = r#"{
        "locations": [
            { "name": "A", "region": "North" },
            { "name": "B", "region": "North" },
            { "name": "C", "region": "South" }
        ],
        "links": [{ "from": "A", "to": "B", "kind": "gate" }],
        "wormholes": [{
            "from": "B", "to": "C", "stability": "reduced", "mass_cap_kg": 20000000,
            "created_at": "2026-03-01T00:00:00Z", "lifetime": "24h"
        }]
    }"#;

    #[test]
    fn builds_graph_and_registry() {
        let network = NetworkFile::from_json(NETWORK)
            .unwrap()
            .into_network()
            .unwrap();
        assert_eq!(network.graph.len(), 3);
        assert_eq!(network.graph.link_count(), 1);
        let hole = network.registry.get(WormholeId(1)).unwrap();
        assert_eq!((hole.from.as_str(), hole.to.as_str()), ("B", "C"));
        assert!(hole.label.is_none());
    }

    #[test]
    fn links_and_wormholes_are_optional() {
        let network = NetworkFile::from_json(r#"{ "locations": [{ "name": "A", "region": "X" }] }"#)
            .unwrap()
            .into_network()
            .unwrap();
        assert_eq!(network.graph.len(), 1);
        assert!(network.registry.is_empty());
    }

    #[test]
    fn dangling_wormhole_is_reported_with_its_position() {
        let raw = NETWORK.replace(r#""to": "C""#, r#""to": "Nowhere""#);
        let err = NetworkFile::from_json(&raw)
            .unwrap()
            .into_network()
            .unwrap_err();
        assert!(format!("{err:#}").contains("failed to register wormhole 1 (B -> Nowhere)"));
    }
}
