//! Graph store: the static set of locations and gate/bridge links.
//!
//! A [`Graph`] is immutable once loaded. Adjacency is held behind [`Arc`] so clones are
//! cheap and any number of searches may read it concurrently. Wormhole edges are never
//! written into the static store; [`Graph::with_wormholes`] produces a separate combined
//! traversal graph for a single route request.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::{BRIDGE_COST, GATE_COST, WORMHOLE_SEARCH_COST};
use crate::error::{suggest, Error, Result};
use crate::wormhole::{WormholeId, WormholeLink};

/// Interned location handle.
///
/// Ids are assigned in byte-wise name order, so comparing two id sequences gives the same
/// answer as comparing the corresponding name sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LocationId(u32);

impl LocationId {
    /// Position of this location in the graph's location table.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the travel graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
}

impl Location {
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
        }
    }
}

/// Kind of a permanent link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Gate,
    Bridge,
}

/// Undirected permanent link between two named locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticLink {
    pub from: String,
    pub to: String,
    pub kind: LinkKind,
}

impl StaticLink {
    pub fn gate(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: LinkKind::Gate,
        }
    }

    pub fn bridge(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: LinkKind::Bridge,
        }
    }
}

/// Classification for an edge in a traversal graph or path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    Gate,
    Bridge,
    Wormhole(WormholeId),
}

impl EdgeKind {
    pub fn is_wormhole(self) -> bool {
        matches!(self, EdgeKind::Wormhole(_))
    }

    /// Short lowercase label used in text renderings.
    pub fn label(self) -> &'static str {
        match self {
            EdgeKind::Gate => "gate",
            EdgeKind::Bridge => "bridge",
            EdgeKind::Wormhole(_) => "wormhole",
        }
    }
}

impl From<LinkKind> for EdgeKind {
    fn from(kind: LinkKind) -> Self {
        match kind {
            LinkKind::Gate => EdgeKind::Gate,
            LinkKind::Bridge => EdgeKind::Bridge,
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Wormhole(id) => write!(f, "wormhole {id}"),
            other => f.write_str(other.label()),
        }
    }
}

/// Edge within a traversal graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub target: LocationId,
    pub kind: EdgeKind,
    pub cost: f64,
}

/// Traversal costs charged by the search for each edge kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeCosts {
    pub gate: f64,
    pub bridge: f64,
    pub wormhole: f64,
}

impl Default for EdgeCosts {
    fn default() -> Self {
        Self {
            gate: GATE_COST,
            bridge: BRIDGE_COST,
            wormhole: WORMHOLE_SEARCH_COST,
        }
    }
}

impl EdgeCosts {
    /// Dijkstra needs finite, non-negative weights.
    pub fn validate(&self) -> Result<()> {
        for (value, field) in [
            (self.gate, "gate"),
            (self.bridge, "bridge"),
            (self.wormhole, "wormhole"),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig {
                    message: format!("{field} cost must be a finite non-negative number"),
                });
            }
        }
        Ok(())
    }

    fn for_link(&self, kind: LinkKind) -> f64 {
        match kind {
            LinkKind::Gate => self.gate,
            LinkKind::Bridge => self.bridge,
        }
    }
}

/// Which edge families a [`Graph`] contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphMode {
    /// Gates and bridges only.
    Static,
    /// Static links plus a set of active wormholes.
    Combined,
}

/// Graph structure used by pathfinding algorithms.
#[derive(Debug, Clone)]
pub struct Graph {
    mode: GraphMode,
    costs: EdgeCosts,
    locations: Arc<Vec<Location>>,
    index: Arc<HashMap<String, LocationId>>,
    adjacency: Arc<Vec<Vec<Edge>>>,
    region_links: Arc<HashSet<(String, String)>>,
    link_count: usize,
}

impl Graph {
    /// Load a static graph with the default edge costs.
    pub fn load<L, S>(locations: L, links: S) -> Result<Self>
    where
        L: IntoIterator<Item = Location>,
        S: IntoIterator<Item = StaticLink>,
    {
        Self::load_with_costs(locations, links, EdgeCosts::default())
    }

    /// Load a static graph, charging `costs` for each edge kind.
    ///
    /// Loading is all-or-nothing: any dangling or malformed link rejects the whole load.
    pub fn load_with_costs<L, S>(locations: L, links: S, costs: EdgeCosts) -> Result<Self>
    where
        L: IntoIterator<Item = Location>,
        S: IntoIterator<Item = StaticLink>,
    {
        costs.validate()?;

        let mut locations: Vec<Location> = locations.into_iter().collect();
        locations.sort_by(|a, b| a.name.cmp(&b.name));

        let mut index = HashMap::with_capacity(locations.len());
        for (position, location) in locations.iter().enumerate() {
            if location.name.trim().is_empty() {
                return Err(Error::InvalidLocation {
                    name: location.name.clone(),
                    suggestions: Vec::new(),
                });
            }
            let id = LocationId(position as u32);
            if index.insert(location.name.clone(), id).is_some() {
                return Err(Error::DuplicateLocation {
                    name: location.name.clone(),
                });
            }
        }

        let mut adjacency: Vec<Vec<Edge>> = vec![Vec::new(); locations.len()];
        let mut seen: HashSet<(LocationId, LocationId, LinkKind)> = HashSet::new();
        let mut region_links = HashSet::new();

        for link in links {
            let endpoint = |name: &str| {
                index.get(name).copied().ok_or_else(|| Error::InvalidLink {
                    from: link.from.clone(),
                    to: link.to.clone(),
                    reason: format!("unknown location '{name}'"),
                })
            };
            let a = endpoint(&link.from)?;
            let b = endpoint(&link.to)?;
            if a == b {
                return Err(Error::InvalidLink {
                    from: link.from.clone(),
                    to: link.to.clone(),
                    reason: "link endpoints must differ".to_string(),
                });
            }

            let key = (a.min(b), a.max(b), link.kind);
            if !seen.insert(key) {
                continue;
            }

            let cost = costs.for_link(link.kind);
            adjacency[a.index()].push(Edge {
                target: b,
                kind: link.kind.into(),
                cost,
            });
            adjacency[b.index()].push(Edge {
                target: a,
                kind: link.kind.into(),
                cost,
            });

            let region_a = &locations[a.index()].region;
            let region_b = &locations[b.index()].region;
            if region_a != region_b {
                region_links.insert(region_pair(region_a, region_b));
            }
        }

        for edges in &mut adjacency {
            sort_edges(edges);
        }

        tracing::info!(
            "loaded graph with {} locations and {} static links",
            locations.len(),
            seen.len()
        );

        Ok(Self {
            mode: GraphMode::Static,
            costs,
            locations: Arc::new(locations),
            index: Arc::new(index),
            adjacency: Arc::new(adjacency),
            region_links: Arc::new(region_links),
            link_count: seen.len(),
        })
    }

    /// Edge families present in this graph.
    pub fn mode(&self) -> GraphMode {
        self.mode
    }

    /// Costs charged by this graph's edges.
    pub fn costs(&self) -> EdgeCosts {
        self.costs
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Number of distinct static links that were loaded.
    pub fn link_count(&self) -> usize {
        self.link_count
    }

    /// Look up a location id by exact (case-sensitive) name.
    pub fn id(&self, name: &str) -> Option<LocationId> {
        self.index.get(name).copied()
    }

    /// Whether the named location exists.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Resolve a name to an id, reporting close matches when it is unknown.
    pub fn resolve(&self, name: &str) -> Result<LocationId> {
        self.id(name).ok_or_else(|| Error::InvalidLocation {
            name: name.to_string(),
            suggestions: self.fuzzy_location_matches(name, 3),
        })
    }

    /// Names that closely resemble `query`, best match first.
    pub fn fuzzy_location_matches(&self, query: &str, limit: usize) -> Vec<String> {
        suggest(
            query,
            self.locations.iter().map(|location| location.name.as_str()),
            limit,
        )
    }

    /// The location record for an id.
    ///
    /// Ids are only ever produced by this graph (or one derived from it), so they are always
    /// in range.
    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[id.index()]
    }

    /// Name of the location behind `id`.
    pub fn name(&self, id: LocationId) -> &str {
        &self.location(id).name
    }

    /// Region of the location behind `id`.
    pub fn region(&self, id: LocationId) -> &str {
        &self.location(id).region
    }

    /// All locations in id order.
    pub fn locations(&self) -> impl Iterator<Item = (LocationId, &Location)> {
        self.locations
            .iter()
            .enumerate()
            .map(|(position, location)| (LocationId(position as u32), location))
    }

    /// Return the neighbours for a given location identifier.
    pub fn neighbours(&self, id: LocationId) -> &[Edge] {
        self.adjacency
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Name-level neighbour listing: `(neighbour, cost, kind)` for each outgoing edge.
    pub fn neighbours_of(&self, name: &str) -> Result<Vec<(&str, f64, EdgeKind)>> {
        let id = self.resolve(name)?;
        Ok(self
            .neighbours(id)
            .iter()
            .map(|edge| (self.name(edge.target), edge.cost, edge.kind))
            .collect())
    }

    /// Whether two regions are joined directly by at least one static link.
    ///
    /// A region is always considered linked to itself.
    pub fn regions_linked(&self, a: &str, b: &str) -> bool {
        a == b || self.region_links.contains(&region_pair(a, b))
    }

    /// Build the combined traversal graph: these static links plus `wormholes`.
    ///
    /// Wormholes whose endpoints are not part of this graph are skipped with a warning; the
    /// registry validates endpoints on insert so this only happens when a registry built
    /// for a different graph is mixed in.
    pub fn with_wormholes(&self, wormholes: &[WormholeLink]) -> Graph {
        let mut adjacency: Vec<Vec<Edge>> = self.adjacency.as_ref().clone();
        let mut touched = HashSet::new();

        for wormhole in wormholes {
            let (Some(a), Some(b)) = (self.id(&wormhole.from), self.id(&wormhole.to)) else {
                tracing::warn!(
                    "skipping wormhole {} ({} -> {}): endpoint not in graph",
                    wormhole.id,
                    wormhole.from,
                    wormhole.to
                );
                continue;
            };
            let kind = EdgeKind::Wormhole(wormhole.id);
            adjacency[a.index()].push(Edge {
                target: b,
                kind,
                cost: self.costs.wormhole,
            });
            adjacency[b.index()].push(Edge {
                target: a,
                kind,
                cost: self.costs.wormhole,
            });
            touched.insert(a);
            touched.insert(b);
        }

        for id in touched {
            sort_edges(&mut adjacency[id.index()]);
        }

        Graph {
            mode: GraphMode::Combined,
            costs: self.costs,
            locations: Arc::clone(&self.locations),
            index: Arc::clone(&self.index),
            adjacency: Arc::new(adjacency),
            region_links: Arc::clone(&self.region_links),
            link_count: self.link_count,
        }
    }
}

fn sort_edges(edges: &mut [Edge]) {
    edges.sort_by(|a, b| a.target.cmp(&b.target).then_with(|| a.kind.cmp(&b.kind)));
}

fn region_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Graph {
        Graph::load(
            vec![
                Location::new("C", "North"),
                Location::new("A", "North"),
                Location::new("B", "South"),
            ],
            vec![StaticLink::gate("A", "B"), StaticLink::bridge("B", "C")],
        )
        .expect("graph loads")
    }

    #[test]
    fn ids_follow_name_order() {
        let graph = triangle();
        let a = graph.id("A").unwrap();
        let b = graph.id("B").unwrap();
        let c = graph.id("C").unwrap();
        assert!(a < b && b < c);
        assert_eq!(graph.name(c), "C");
    }

    #[test]
    fn neighbours_are_symmetric_with_costs() {
        let graph = triangle();
        let listed = graph.neighbours_of("B").expect("B exists");
        assert_eq!(
            listed,
            vec![("A", 1.0, EdgeKind::Gate), ("C", 0.3, EdgeKind::Bridge)]
        );
    }

    #[test]
    fn dangling_link_rejects_load() {
        let err = Graph::load(
            vec![Location::new("A", "R")],
            vec![StaticLink::gate("A", "Nowhere")],
        )
        .expect_err("dangling link");
        assert!(matches!(err, Error::InvalidLink { .. }));
        assert!(err.to_string().contains("Nowhere"));
    }

    #[test]
    fn self_link_is_invalid() {
        let err = Graph::load(vec![Location::new("A", "R")], vec![StaticLink::gate("A", "A")])
            .expect_err("self link");
        assert!(matches!(err, Error::InvalidLink { .. }));
    }

    #[test]
    fn duplicate_location_is_rejected() {
        let err = Graph::load(
            vec![Location::new("A", "R"), Location::new("A", "S")],
            Vec::<StaticLink>::new(),
        )
        .expect_err("duplicate");
        assert!(matches!(err, Error::DuplicateLocation { .. }));
    }

    #[test]
    fn duplicate_links_collapse() {
        let graph = Graph::load(
            vec![Location::new("A", "R"), Location::new("B", "R")],
            vec![StaticLink::gate("A", "B"), StaticLink::gate("B", "A")],
        )
        .unwrap();
        assert_eq!(graph.link_count(), 1);
        assert_eq!(graph.neighbours(graph.id("A").unwrap()).len(), 1);
    }

    #[test]
    fn region_links_are_tracked() {
        let graph = triangle();
        assert!(graph.regions_linked("North", "South"));
        assert!(graph.regions_linked("South", "North"));
        assert!(graph.regions_linked("East", "East"));
        assert!(!graph.regions_linked("North", "East"));
    }

    #[test]
    fn negative_costs_are_rejected() {
        let costs = EdgeCosts {
            gate: -1.0,
            ..EdgeCosts::default()
        };
        let err = Graph::load_with_costs(Vec::<Location>::new(), Vec::<StaticLink>::new(), costs).expect_err("bad cost");
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn unknown_location_suggests_close_names() {
        let graph = Graph::load(
            vec![Location::new("Amarr", "Domain"), Location::new("Jita", "Forge")],
            Vec::<StaticLink>::new(),
        )
        .unwrap();
        let err = graph.resolve("Jitta").expect_err("unknown");
        assert!(err.to_string().contains("Did you mean 'Jita'?"));
    }
}
