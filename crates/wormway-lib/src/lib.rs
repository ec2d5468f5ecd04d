//! Wormway library entry points.
//!
//! This crate loads a static network of gates and bridges, keeps a registry of reported
//! wormholes with lazy expiry, plans and ranks hybrid routes across both, and checks whether
//! a fleet can pass a given wormhole. Higher-level consumers (the CLI) should only depend
//! on the items exported here instead of reimplementing behavior.
//!
//! All computations are pure and synchronous over in-memory inputs. File formats belong to
//! the callers; the only loader here is the CSV [`MassTable`].

pub mod constants;
pub mod error;
pub mod fleet;
pub mod graph;
pub mod output;
pub mod path;
pub mod routing;
pub mod scoring;
pub mod wormhole;

pub use error::{Error, Result};
pub use fleet::{
    AdmissionChecker, FleetManifest, FleetUnit, ManifestEntry, MassLimits, MassTable,
    ResolvedFleet, TypeAllowance, Verdict,
};
pub use graph::{
    Edge, EdgeCosts, EdgeKind, Graph, GraphMode, LinkKind, Location, LocationId, StaticLink,
};
pub use output::{CandidateSummary, RouteRenderMode, RouteStep, RouteSummary};
pub use path::{find_path, Path, PathConstraints, PathStep};
pub use routing::{
    plan_routes, resolve_mode, select_planner, RouteConstraints, RoutePlan, RoutePlanner,
    RouteRequest, SearchMode,
};
pub use scoring::{
    MultiHopPenalty, RiskBand, RiskBands, RouteCandidate, RouteScorer, ScoringConfig,
};
pub use wormhole::{
    LifetimeClass, Stability, WormholeId, WormholeLink, WormholeRegistry, WormholeReport,
};
