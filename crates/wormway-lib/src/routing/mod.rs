//! Route planning over static links and active wormholes.
//!
//! This module provides:
//! - [`SearchMode`] - Which link kinds a search may combine
//! - [`RouteConstraints`] - Constraints applied during route planning
//! - [`RouteRequest`] - High-level route planning request
//! - [`RoutePlan`] - Ranked route candidates
//! - [`plan_routes`] - Main entry point for computing routes
//!
//! # Strategy Pattern
//!
//! Candidate generation goes through the [`RoutePlanner`] trait. Each search mode is
//! encapsulated in its own planner struct; the planners only produce paths and never rank
//! them. Ranking belongs to [`crate::RouteScorer`].
//!
//! # Example
//!
//! ```ignore
//! use wormway_lib::{plan_routes, RouteRequest, RouteScorer, WormholeRegistry};
//!
//! let registry = WormholeRegistry::new(graph.clone());
//! let request = RouteRequest::new("Amarr", "Jita", chrono::Utc::now());
//! let plan = plan_routes(&graph, &registry, &RouteScorer::default(), &request)?;
//! println!("best score: {:.1}", plan.best().score);
//! ```

mod planner;

pub use planner::{
    select_planner, CombinedPlanner, HybridPlanner, RoutePlanner, SearchContext, StaticPlanner,
};

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_LEG_EDGES, DEFAULT_MAX_WORMHOLE_HOPS, DEFAULT_TOP_K};
use crate::error::{Error, Result};
use crate::graph::{Graph, LocationId};
use crate::path::{Path, PathConstraints};
use crate::scoring::{RouteCandidate, RouteScorer};
use crate::wormhole::WormholeRegistry;

/// Which link kinds a route search may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// `Hybrid` whenever a wormhole is active or the origin and goal regions share no static
    /// link; `Combined` otherwise.
    #[default]
    Auto,
    /// Gates and bridges only.
    Static,
    /// Static-only path plus one search over static links and active wormholes.
    Combined,
    /// `Combined` plus explicit enumeration of wormhole entry/exit chains.
    Hybrid,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SearchMode::Auto => "auto",
            SearchMode::Static => "static",
            SearchMode::Combined => "combined",
            SearchMode::Hybrid => "hybrid",
        };
        f.write_str(value)
    }
}

/// Constraints applied during route planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConstraints {
    /// Locations (by name) that no candidate may pass through.
    pub avoid_locations: Vec<String>,
    /// Longest static leg accepted before, between or after wormhole hops in hybrid
    /// enumeration.
    pub max_leg_edges: usize,
    /// Longest wormhole chain enumerated in hybrid mode.
    pub max_wormhole_hops: usize,
}

impl Default for RouteConstraints {
    fn default() -> Self {
        Self {
            avoid_locations: Vec::new(),
            max_leg_edges: DEFAULT_MAX_LEG_EDGES,
            max_wormhole_hops: DEFAULT_MAX_WORMHOLE_HOPS,
        }
    }
}

/// High-level route planning request.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub start: String,
    pub goal: String,
    pub mode: SearchMode,
    /// Number of ranked candidates to keep; zero is treated as one.
    pub top_k: usize,
    /// Instant at which wormhole activity is evaluated.
    pub at: DateTime<Utc>,
    pub constraints: RouteConstraints,
}

impl RouteRequest {
    /// Convenience constructor for an `Auto` request with default constraints.
    pub fn new(start: impl Into<String>, goal: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            mode: SearchMode::Auto,
            top_k: DEFAULT_TOP_K,
            at,
            constraints: RouteConstraints::default(),
        }
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_constraints(mut self, constraints: RouteConstraints) -> Self {
        self.constraints = constraints;
        self
    }
}

/// Ranked route candidates returned by the library.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub start: LocationId,
    pub goal: LocationId,
    /// Mode the caller asked for.
    pub requested_mode: SearchMode,
    /// Mode actually searched (`Auto` resolved).
    pub mode: SearchMode,
    /// Number of distinct candidate paths handed to the scorer.
    pub considered: usize,
    /// Wormholes active at the request instant.
    pub active_wormholes: usize,
    /// Best first; never empty.
    pub candidates: Vec<RouteCandidate>,
}

impl RoutePlan {
    /// Highest-ranked candidate.
    pub fn best(&self) -> &RouteCandidate {
        &self.candidates[0]
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Compute ranked routes between two named locations.
///
/// Wormholes are taken from `registry` as they stand at `request.at`; the registry is only
/// read. `graph` is the static store the registry was built against.
///
/// # Errors
///
/// - [`Error::InvalidLocation`] if the start, goal or an avoided location is unknown.
/// - [`Error::NoRoute`] if no candidate path exists under the request.
pub fn plan_routes(
    graph: &Graph,
    registry: &WormholeRegistry,
    scorer: &RouteScorer,
    request: &RouteRequest,
) -> Result<RoutePlan> {
    let start = graph.resolve(&request.start)?;
    let goal = graph.resolve(&request.goal)?;
    let avoided = resolve_avoided_locations(graph, &request.constraints.avoid_locations)?;
    let constraints = endpoint_safe_constraints(graph, avoided, start, goal);

    let wormholes = registry.active_links(request.at);
    let combined = if wormholes.is_empty() {
        graph.clone()
    } else {
        graph.with_wormholes(&wormholes)
    };

    let mode = resolve_mode(graph, request.mode, start, goal, wormholes.len());
    let context = SearchContext {
        static_graph: graph,
        combined_graph: &combined,
        wormholes: &wormholes,
        start,
        goal,
        constraints: &constraints,
        max_leg_edges: request.constraints.max_leg_edges,
        max_wormhole_hops: request.constraints.max_wormhole_hops,
    };

    let planner = select_planner(mode);
    let paths: BTreeSet<Path> = planner.candidates(&context).into_iter().collect();
    tracing::debug!(
        "{} planner produced {} distinct candidate(s) with {} active wormhole(s)",
        planner.mode(),
        paths.len(),
        wormholes.len()
    );

    if paths.is_empty() {
        return Err(Error::NoRoute {
            start: request.start.clone(),
            goal: request.goal.clone(),
        });
    }

    let considered = paths.len();
    let candidates = scorer.rank(paths, request.top_k);
    if candidates.is_empty() {
        return Err(Error::EmptyRoutePlan);
    }

    Ok(RoutePlan {
        start,
        goal,
        requested_mode: request.mode,
        mode,
        considered,
        active_wormholes: wormholes.len(),
        candidates,
    })
}

/// Resolve `Auto` against the active wormhole count and the static region topology.
///
/// Any active wormhole selects `Hybrid`, so single-hop pairings are always enumerated next
/// to the combined search.
pub fn resolve_mode(
    graph: &Graph,
    mode: SearchMode,
    start: LocationId,
    goal: LocationId,
    active_wormholes: usize,
) -> SearchMode {
    match mode {
        SearchMode::Auto => {
            if active_wormholes > 0 {
                SearchMode::Hybrid
            } else if graph.regions_linked(graph.region(start), graph.region(goal)) {
                SearchMode::Combined
            } else {
                tracing::debug!(
                    "regions '{}' and '{}' share no static link; using hybrid search",
                    graph.region(start),
                    graph.region(goal)
                );
                SearchMode::Hybrid
            }
        }
        other => other,
    }
}

fn resolve_avoided_locations(graph: &Graph, avoided: &[String]) -> Result<HashSet<LocationId>> {
    let mut resolved = HashSet::new();
    for name in avoided {
        resolved.insert(graph.resolve(name)?);
    }
    Ok(resolved)
}

/// The endpoints themselves can never be avoided.
fn endpoint_safe_constraints(
    graph: &Graph,
    mut avoided: HashSet<LocationId>,
    start: LocationId,
    goal: LocationId,
) -> PathConstraints {
    for endpoint in [start, goal] {
        if avoided.remove(&endpoint) {
            tracing::warn!(
                "ignoring avoid constraint on route endpoint '{}'",
                graph.name(endpoint)
            );
        }
    }
    PathConstraints { avoided }
}
