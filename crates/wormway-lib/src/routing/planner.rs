//! Candidate generation strategies implementing the Strategy pattern.
//!
//! This module provides the `RoutePlanner` trait and one implementation per concrete
//! [`SearchMode`]. Planners return unranked candidate paths; duplicates are allowed and are
//! collapsed by the caller.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::graph::{EdgeKind, Graph, LocationId};
use crate::path::{find_path, Path, PathConstraints};
use crate::wormhole::{WormholeId, WormholeLink};

use super::SearchMode;

/// Everything a planner needs for one search.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    /// Gates and bridges only.
    pub static_graph: &'a Graph,
    /// Static links plus the active wormholes.
    pub combined_graph: &'a Graph,
    /// Wormholes active at the request instant, ordered by id.
    pub wormholes: &'a [WormholeLink],
    pub start: LocationId,
    pub goal: LocationId,
    pub constraints: &'a PathConstraints,
    pub max_leg_edges: usize,
    pub max_wormhole_hops: usize,
}

/// Trait for candidate generation strategies.
pub trait RoutePlanner: Send + Sync {
    /// The search mode this planner implements.
    fn mode(&self) -> SearchMode;

    /// Produce candidate paths from `context.start` to `context.goal`.
    fn candidates(&self, context: &SearchContext<'_>) -> Vec<Path>;
}

/// Dijkstra over gates and bridges only.
#[derive(Debug, Clone, Default)]
pub struct StaticPlanner;

impl RoutePlanner for StaticPlanner {
    fn mode(&self) -> SearchMode {
        SearchMode::Static
    }

    fn candidates(&self, context: &SearchContext<'_>) -> Vec<Path> {
        find_path(
            context.static_graph,
            context.start,
            context.goal,
            context.constraints,
        )
        .into_iter()
        .collect()
    }
}

/// The static-only path plus the best path over static links and active wormholes.
#[derive(Debug, Clone, Default)]
pub struct CombinedPlanner;

impl RoutePlanner for CombinedPlanner {
    fn mode(&self) -> SearchMode {
        SearchMode::Combined
    }

    fn candidates(&self, context: &SearchContext<'_>) -> Vec<Path> {
        let mut paths = StaticPlanner.candidates(context);
        if !context.wormholes.is_empty() {
            paths.extend(find_path(
                context.combined_graph,
                context.start,
                context.goal,
                context.constraints,
            ));
        }
        paths
    }
}

/// [`CombinedPlanner`] plus explicit enumeration of wormhole chains.
///
/// For every active wormhole, in both orientations, the planner joins a static leg from the
/// origin to the entry, the hop itself, and a static leg from the exit to the goal. Chains of
/// up to `max_wormhole_hops` wormholes are followed when one hole's exit is the next hole's
/// entry. This surfaces routes the single combined search would shadow, e.g. a
/// multi-hop chain that is structurally shorter but carries a surcharge at scoring time.
#[derive(Debug, Clone, Default)]
pub struct HybridPlanner;

impl RoutePlanner for HybridPlanner {
    fn mode(&self) -> SearchMode {
        SearchMode::Hybrid
    }

    fn candidates(&self, context: &SearchContext<'_>) -> Vec<Path> {
        let mut paths = CombinedPlanner.candidates(context);
        if context.max_wormhole_hops == 0 {
            return paths;
        }

        let hops = hops_by_entry(context);
        let mut enumeration = ChainEnumeration {
            context,
            hops: &hops,
            legs: LegCache::default(),
            found: Vec::new(),
        };
        for (&entry, outgoing) in &hops {
            let Some(leg) = enumeration.legs.leg(context, context.start, entry) else {
                continue;
            };
            for hop in outgoing {
                if let Some(path) = leg.extended(EdgeKind::Wormhole(hop.id), hop.exit) {
                    enumeration.follow(path, 1);
                }
            }
        }

        tracing::debug!(
            "hybrid enumeration: {} chain(s) over {} memoised leg(s)",
            enumeration.found.len(),
            enumeration.legs.len()
        );
        paths.extend(enumeration.found);
        paths
    }
}

/// Select the planner for a concrete search mode. `Auto` maps to [`CombinedPlanner`];
/// callers resolve it against the region topology first.
pub fn select_planner(mode: SearchMode) -> Box<dyn RoutePlanner> {
    match mode {
        SearchMode::Static => Box::new(StaticPlanner),
        SearchMode::Auto | SearchMode::Combined => Box::new(CombinedPlanner),
        SearchMode::Hybrid => Box::new(HybridPlanner),
    }
}

/// One wormhole in one direction.
#[derive(Debug, Clone, Copy)]
struct Hop {
    id: WormholeId,
    exit: LocationId,
}

/// Directed hops keyed by entry location. Wormholes touching an avoided location are left
/// out entirely.
fn hops_by_entry(context: &SearchContext<'_>) -> BTreeMap<LocationId, Vec<Hop>> {
    let graph = context.static_graph;
    let mut hops: BTreeMap<LocationId, Vec<Hop>> = BTreeMap::new();
    for link in context.wormholes {
        let (Some(a), Some(b)) = (graph.id(&link.from), graph.id(&link.to)) else {
            continue;
        };
        if context.constraints.avoided.contains(&a) || context.constraints.avoided.contains(&b) {
            continue;
        }
        hops.entry(a).or_default().push(Hop { id: link.id, exit: b });
        hops.entry(b).or_default().push(Hop { id: link.id, exit: a });
    }
    hops
}

/// Static legs memoised per (from, to) pair. Legs over the length limit are stored as
/// missing.
#[derive(Debug, Default)]
struct LegCache {
    legs: HashMap<(LocationId, LocationId), Option<Path>>,
}

impl LegCache {
    fn leg(
        &mut self,
        context: &SearchContext<'_>,
        from: LocationId,
        to: LocationId,
    ) -> Option<Path> {
        self.legs
            .entry((from, to))
            .or_insert_with(|| {
                find_path(context.static_graph, from, to, context.constraints)
                    .filter(|leg| leg.edge_count() <= context.max_leg_edges)
            })
            .clone()
    }

    fn len(&self) -> usize {
        self.legs.len()
    }
}

struct ChainEnumeration<'c, 'a> {
    context: &'c SearchContext<'a>,
    hops: &'c BTreeMap<LocationId, Vec<Hop>>,
    legs: LegCache,
    found: Vec<Path>,
}

impl ChainEnumeration<'_, '_> {
    /// `prefix` ends on the exit of its `depth`-th wormhole.
    fn follow(&mut self, prefix: Path, depth: usize) {
        let exit = prefix.destination();
        let context = self.context;

        if let Some(tail) = self.legs.leg(context, exit, context.goal) {
            if let Some(path) = prefix.concat(&tail) {
                self.found.push(path);
            }
        }

        if depth >= context.max_wormhole_hops {
            return;
        }
        let used: HashSet<WormholeId> = prefix
            .edges()
            .filter_map(|kind| match kind {
                EdgeKind::Wormhole(id) => Some(id),
                _ => None,
            })
            .collect();
        let hops = self.hops;
        let Some(outgoing) = hops.get(&exit) else {
            return;
        };
        for hop in outgoing {
            if used.contains(&hop.id) {
                continue;
            }
            if let Some(path) = prefix.extended(EdgeKind::Wormhole(hop.id), hop.exit) {
                self.follow(path, depth + 1);
            }
        }
    }
}
