//! Default tuning constants for edge costs, route scoring and mass admission.
//!
//! These are only the defaults: [`crate::EdgeCosts`], [`crate::ScoringConfig`] and
//! [`crate::MassLimits`] carry the values actually used, so callers can inject alternatives.

/// Traversal cost of a regular transit gate.
pub const GATE_COST: f64 = 1.0;

/// Traversal cost of an instant-transit bridge (30% of a gate).
pub const BRIDGE_COST: f64 = 0.3;

/// Wormhole hops are free during search; the scorer charges them structurally.
pub const WORMHOLE_SEARCH_COST: f64 = 0.0;

/// Multi-hop surcharge component for burning to the next hole in each intermediate system.
pub const BURN_TIME_PENALTY: f64 = 15.0;

/// Multi-hop surcharge component for hostile NPCs along the chain.
pub const NPC_DANGER_PENALTY: f64 = 10.0;

/// Multi-hop surcharge component for the extra transitions that can fail.
pub const COMPLEXITY_PENALTY: f64 = 5.0;

/// Number of wormhole hops at which the flat multi-hop surcharge applies.
pub const MULTI_HOP_THRESHOLD: usize = 2;

/// Scores at or above this value are classed as "iffy".
pub const IFFY_SCORE: f64 = 20.0;

/// Scores at or above this value are classed as "risky".
pub const RISKY_SCORE: f64 = 40.0;

/// Total-mass ceiling of a fresh wormhole, in kilograms.
pub const FRESH_TOTAL_MASS_KG: f64 = 750_000_000.0;

/// Total-mass ceiling once stability has been reduced (roughly half remaining).
pub const REDUCED_TOTAL_MASS_KG: f64 = 375_000_000.0;

/// Total-mass ceiling of a critical wormhole (under 10% remaining).
pub const CRITICAL_TOTAL_MASS_KG: f64 = 75_000_000.0;

/// Typical per-jump mass cap for drifter-class holes.
pub const DEFAULT_PER_JUMP_MASS_KG: f64 = 375_000_000.0;

/// Fraction of a ceiling above which a fitting fleet is flagged as near capacity.
pub const NEAR_CAPACITY_RATIO: f64 = 0.8;

/// Number of ranked candidates returned when the caller does not ask for a specific count.
pub const DEFAULT_TOP_K: usize = 5;

/// Longest static leg (in edges) accepted on either side of a wormhole in hybrid routes.
pub const DEFAULT_MAX_LEG_EDGES: usize = 15;

/// Longest wormhole chain enumerated in hybrid mode.
pub const DEFAULT_MAX_WORMHOLE_HOPS: usize = 2;
