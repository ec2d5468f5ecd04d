use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use serde::Serialize;

use crate::graph::{EdgeKind, Graph, LocationId};

/// Costs are compared in millionths so that e.g. `0.3 + 0.3 + 0.3` and `0.9` tie exactly.
const COST_SCALE: f64 = 1_000_000.0;

/// Quantise a non-negative cost or score for exact comparison.
pub(crate) fn cost_key(cost: f64) -> u64 {
    (cost.max(0.0) * COST_SCALE).round() as u64
}

/// One entry of a [`Path`]: a location and the edge used to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PathStep {
    pub location: LocationId,
    /// `None` only for the origin.
    pub via: Option<EdgeKind>,
}

/// A simple path through a traversal graph.
///
/// The first step is the origin with no incoming edge and no location appears twice. Paths
/// order by location sequence first and edge-kind sequence second, which is the
/// deterministic final tie-break used by both the search and the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// Zero-edge path sitting at `origin`.
    pub fn new(origin: LocationId) -> Self {
        Self {
            steps: vec![PathStep {
                location: origin,
                via: None,
            }],
        }
    }

    /// Build a path from explicit steps, checking the path invariants.
    pub fn from_steps(steps: Vec<PathStep>) -> Option<Self> {
        let (first, rest) = steps.split_first()?;
        if first.via.is_some() || rest.iter().any(|step| step.via.is_none()) {
            return None;
        }
        let path = Self { steps };
        path.is_simple().then_some(path)
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub fn origin(&self) -> LocationId {
        self.steps[0].location
    }

    pub fn destination(&self) -> LocationId {
        self.steps[self.steps.len() - 1].location
    }

    /// Number of edges traversed.
    pub fn edge_count(&self) -> usize {
        self.steps.len() - 1
    }

    pub fn locations(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.steps.iter().map(|step| step.location)
    }

    /// Incoming edge kinds, origin excluded.
    pub fn edges(&self) -> impl Iterator<Item = EdgeKind> + '_ {
        self.steps.iter().filter_map(|step| step.via)
    }

    pub fn wormhole_hops(&self) -> usize {
        self.edges().filter(|kind| kind.is_wormhole()).count()
    }

    pub fn contains(&self, location: LocationId) -> bool {
        self.locations().any(|id| id == location)
    }

    pub fn is_simple(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.steps.len());
        self.locations().all(|id| seen.insert(id))
    }

    /// Extend by one edge; `None` if `location` is already on the path.
    pub fn extended(&self, via: EdgeKind, location: LocationId) -> Option<Path> {
        if self.contains(location) {
            return None;
        }
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(PathStep {
            location,
            via: Some(via),
        });
        Some(Path { steps })
    }

    /// Append `tail`, which must start where this path ends.
    ///
    /// Returns `None` when the endpoints do not meet or the join would revisit a location.
    pub fn concat(&self, tail: &Path) -> Option<Path> {
        if tail.origin() != self.destination() {
            return None;
        }
        let mut steps = Vec::with_capacity(self.steps.len() + tail.edge_count());
        steps.extend_from_slice(&self.steps);
        steps.extend_from_slice(&tail.steps[1..]);
        let joined = Path { steps };
        joined.is_simple().then_some(joined)
    }
}

impl Ord for Path {
    fn cmp(&self, other: &Self) -> Ordering {
        self.locations()
            .cmp(other.locations())
            .then_with(|| {
                self.steps
                    .iter()
                    .map(|step| step.via)
                    .cmp(other.steps.iter().map(|step| step.via))
            })
    }
}

impl PartialOrd for Path {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Constraints applied during pathfinding.
#[derive(Debug, Default, Clone)]
pub struct PathConstraints {
    /// Locations that must not appear in the resulting path.
    pub avoided: HashSet<LocationId>,
}

impl PathConstraints {
    fn allows(&self, target: LocationId) -> bool {
        !self.avoided.contains(&target)
    }
}

/// Run Dijkstra's algorithm to find the lowest-cost path that satisfies the
/// provided constraints.
///
/// Ties on cost are broken by fewer edges, then by the path ordering (location sequence,
/// then edge kinds), so identical inputs always give identical output. The search stops as
/// soon as `goal` is settled.
pub fn find_path(
    graph: &Graph,
    start: LocationId,
    goal: LocationId,
    constraints: &PathConstraints,
) -> Option<Path> {
    if start == goal {
        return Some(Path::new(start));
    }

    let mut best: HashMap<LocationId, Label> = HashMap::new();
    let mut settled: HashSet<LocationId> = HashSet::new();
    let mut queue = BinaryHeap::new();

    let origin = Label {
        cost: 0,
        path: Path::new(start),
    };
    best.insert(start, origin.clone());
    queue.push(QueueEntry(origin));

    while let Some(QueueEntry(label)) = queue.pop() {
        let node = label.path.destination();
        if !settled.insert(node) {
            continue;
        }

        if node == goal {
            tracing::debug!(
                "settled goal after {} nodes at cost {:.3}",
                settled.len(),
                label.cost as f64 / COST_SCALE
            );
            return Some(label.path);
        }

        for edge in graph.neighbours(node) {
            let next = edge.target;
            if settled.contains(&next) || !constraints.allows(next) {
                continue;
            }
            let Some(path) = label.path.extended(edge.kind, next) else {
                continue;
            };
            let candidate = Label {
                cost: label.cost + cost_key(edge.cost),
                path,
            };
            let improves = best
                .get(&next)
                .map(|current| candidate < *current)
                .unwrap_or(true);
            if improves {
                best.insert(next, candidate.clone());
                queue.push(QueueEntry(candidate));
            }
        }
    }

    None
}

/// Search label: quantised cost plus the path that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Label {
    cost: u64,
    path: Path,
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .cmp(&other.cost)
            .then_with(|| self.path.edge_count().cmp(&other.path.edge_count()))
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct QueueEntry(Label);

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by label.
        other.0.cmp(&self.0)
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
