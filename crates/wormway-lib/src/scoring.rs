//! Route scoring and ranking.
//!
//! A score is dimensionless and ascending-is-better:
//!
//! ```text
//! score = gates * gate_cost + bridges * bridge_cost + wormholes * wormhole_cost
//!       + (wormholes >= multi_hop_threshold ? burn_time + npc_danger + complexity : 0)
//! ```
//!
//! The multi-hop surcharge is flat: it is charged once per path when the threshold is
//! crossed, so a 2-hop and a 5-hop chain pay the same amount and only their static costs
//! separate them. Wormhole stability never enters the score; it only matters for mass
//! admission.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::constants::{
    BRIDGE_COST, BURN_TIME_PENALTY, COMPLEXITY_PENALTY, DEFAULT_TOP_K, GATE_COST, IFFY_SCORE,
    MULTI_HOP_THRESHOLD, NPC_DANGER_PENALTY, RISKY_SCORE, WORMHOLE_SEARCH_COST,
};
use crate::error::{Error, Result};
use crate::graph::EdgeKind;
use crate::path::{cost_key, Path};

/// Components of the flat multi-hop surcharge. They are summed, never thresholded
/// individually.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiHopPenalty {
    pub burn_time: f64,
    pub npc_danger: f64,
    pub complexity: f64,
}

impl MultiHopPenalty {
    pub fn total(&self) -> f64 {
        self.burn_time + self.npc_danger + self.complexity
    }
}

impl Default for MultiHopPenalty {
    fn default() -> Self {
        Self {
            burn_time: BURN_TIME_PENALTY,
            npc_danger: NPC_DANGER_PENALTY,
            complexity: COMPLEXITY_PENALTY,
        }
    }
}

/// Score thresholds separating the risk bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskBands {
    pub iffy_from: f64,
    pub risky_from: f64,
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            iffy_from: IFFY_SCORE,
            risky_from: RISKY_SCORE,
        }
    }
}

/// Coarse presentation bucket for a route score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    /// Safe to use.
    Good,
    /// Proceed with caution.
    Iffy,
    /// Avoid unless there is no alternative.
    Risky,
}

impl RiskBand {
    pub fn label(self) -> &'static str {
        match self {
            RiskBand::Good => "good",
            RiskBand::Iffy => "iffy",
            RiskBand::Risky => "risky",
        }
    }
}

/// Tuning for [`RouteScorer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub gate_cost: f64,
    pub bridge_cost: f64,
    /// Per-hop structural contribution of a wormhole; zero by default.
    pub wormhole_cost: f64,
    pub penalty: MultiHopPenalty,
    /// Wormhole hop count at which the flat surcharge applies.
    pub multi_hop_threshold: usize,
    pub bands: RiskBands,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            gate_cost: GATE_COST,
            bridge_cost: BRIDGE_COST,
            wormhole_cost: WORMHOLE_SEARCH_COST,
            penalty: MultiHopPenalty::default(),
            multi_hop_threshold: MULTI_HOP_THRESHOLD,
            bands: RiskBands::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            (self.gate_cost, "gate_cost"),
            (self.bridge_cost, "bridge_cost"),
            (self.wormhole_cost, "wormhole_cost"),
            (self.penalty.burn_time, "penalty.burn_time"),
            (self.penalty.npc_danger, "penalty.npc_danger"),
            (self.penalty.complexity, "penalty.complexity"),
        ];
        for (value, field) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig {
                    message: format!("{field} must be a finite non-negative number"),
                });
            }
        }
        if self.multi_hop_threshold == 0 {
            return Err(Error::InvalidConfig {
                message: "multi_hop_threshold must be at least 1".to_string(),
            });
        }
        let bands = &self.bands;
        if bands.iffy_from.is_nan()
            || bands.risky_from.is_nan()
            || bands.iffy_from > bands.risky_from
        {
            return Err(Error::InvalidConfig {
                message: "risk bands must satisfy iffy_from <= risky_from".to_string(),
            });
        }
        Ok(())
    }
}

/// A scored path with the counters needed to render it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteCandidate {
    pub path: Path,
    pub gates: usize,
    pub bridges: usize,
    pub wormholes: usize,
    /// Static and per-hop contribution before the multi-hop surcharge.
    pub base_score: f64,
    /// Multi-hop surcharge applied to this path (zero below the threshold).
    pub penalty: f64,
    pub score: f64,
    pub band: RiskBand,
}

impl RouteCandidate {
    pub fn edge_count(&self) -> usize {
        self.path.edge_count()
    }

    pub fn is_hybrid(&self) -> bool {
        self.wormholes > 0
    }
}

/// Converts paths into [`RouteCandidate`]s and ranks them.
#[derive(Debug, Clone, Default)]
pub struct RouteScorer {
    config: ScoringConfig,
}

impl RouteScorer {
    pub fn new(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a single path.
    pub fn score(&self, path: &Path) -> RouteCandidate {
        let (mut gates, mut bridges, mut wormholes) = (0usize, 0usize, 0usize);
        for kind in path.edges() {
            match kind {
                EdgeKind::Gate => gates += 1,
                EdgeKind::Bridge => bridges += 1,
                EdgeKind::Wormhole(_) => wormholes += 1,
            }
        }

        let base_score = gates as f64 * self.config.gate_cost
            + bridges as f64 * self.config.bridge_cost
            + wormholes as f64 * self.config.wormhole_cost;
        let penalty = if wormholes >= self.config.multi_hop_threshold {
            self.config.penalty.total()
        } else {
            0.0
        };
        let score = base_score + penalty;

        RouteCandidate {
            path: path.clone(),
            gates,
            bridges,
            wormholes,
            base_score,
            penalty,
            score,
            band: self.band(score),
        }
    }

    /// Risk band for a score.
    pub fn band(&self, score: f64) -> RiskBand {
        if score < self.config.bands.iffy_from {
            RiskBand::Good
        } else if score < self.config.bands.risky_from {
            RiskBand::Iffy
        } else {
            RiskBand::Risky
        }
    }

    /// Score every path and keep the best `top_k`.
    ///
    /// Duplicate paths are scored once. A `top_k` of zero is treated as one. Candidates
    /// beyond the cut are dropped.
    pub fn rank<I>(&self, paths: I, top_k: usize) -> Vec<RouteCandidate>
    where
        I: IntoIterator<Item = Path>,
    {
        let unique: BTreeSet<Path> = paths.into_iter().collect();
        let mut candidates: Vec<RouteCandidate> =
            unique.iter().map(|path| self.score(path)).collect();
        candidates.sort_by(compare_candidates);
        candidates.truncate(top_k.max(1));
        candidates
    }

    /// Rank with the default cut of [`DEFAULT_TOP_K`].
    pub fn rank_default<I>(&self, paths: I) -> Vec<RouteCandidate>
    where
        I: IntoIterator<Item = Path>,
    {
        self.rank(paths, DEFAULT_TOP_K)
    }
}

/// Ranking order: score, then fewer edges, then path order.
pub fn compare_candidates(a: &RouteCandidate, b: &RouteCandidate) -> Ordering {
    cost_key(a.score)
        .cmp(&cost_key(b.score))
        .then_with(|| a.edge_count().cmp(&b.edge_count()))
        .then_with(|| a.path.cmp(&b.path))
}
