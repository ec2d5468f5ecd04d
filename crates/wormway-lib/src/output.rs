use std::fmt::Write;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::graph::{EdgeKind, Graph};
use crate::routing::{RoutePlan, SearchMode};
use crate::scoring::{RiskBand, RouteCandidate};

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    /// One block per candidate with every step on its own line.
    PlainText,
    /// One line per candidate.
    Compact,
}

/// Step taken along a candidate route.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteStep {
    pub index: usize,
    pub name: String,
    pub region: String,
    /// Edge used to reach this step; absent for the origin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<EdgeKind>,
}

/// A ranked candidate with resolved location names.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CandidateSummary {
    pub rank: usize,
    pub score: f64,
    pub band: RiskBand,
    pub gates: usize,
    pub bridges: usize,
    pub wormholes: usize,
    pub penalty: f64,
    pub steps: Vec<RouteStep>,
}

impl CandidateSummary {
    fn from_candidate(graph: &Graph, rank: usize, candidate: &RouteCandidate) -> Self {
        let steps = candidate
            .path
            .steps()
            .iter()
            .enumerate()
            .map(|(index, step)| RouteStep {
                index,
                name: graph.name(step.location).to_string(),
                region: graph.region(step.location).to_string(),
                via: step.via,
            })
            .collect();
        Self {
            rank,
            score: candidate.score,
            band: candidate.band,
            gates: candidate.gates,
            bridges: candidate.bridges,
            wormholes: candidate.wormholes,
            penalty: candidate.penalty,
            steps,
        }
    }

    pub fn hops(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    fn headline(&self) -> String {
        format!(
            "#{} score {:.1} [{}]: {} gate(s), {} bridge(s), {} wormhole(s)",
            self.rank,
            self.score,
            self.band.label(),
            self.gates,
            self.bridges,
            self.wormholes
        )
    }

    fn inline_path(&self) -> String {
        let mut buffer = String::new();
        for step in &self.steps {
            if let Some(via) = step.via {
                let _ = write!(buffer, " -[{via}]-> ");
            }
            buffer.push_str(&step.name);
        }
        buffer
    }
}

/// Structured representation of a route plan that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub start: String,
    pub goal: String,
    pub requested_mode: SearchMode,
    pub mode: SearchMode,
    pub considered: usize,
    pub active_wormholes: usize,
    pub candidates: Vec<CandidateSummary>,
}

impl RouteSummary {
    /// Convert a [`RoutePlan`] into a structured summary with resolved location names.
    pub fn from_plan(graph: &Graph, plan: &RoutePlan) -> Result<Self> {
        if plan.candidates.is_empty() {
            return Err(Error::EmptyRoutePlan);
        }

        let candidates = plan
            .candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| CandidateSummary::from_candidate(graph, index + 1, candidate))
            .collect();

        Ok(Self {
            start: graph.name(plan.start).to_string(),
            goal: graph.name(plan.goal).to_string(),
            requested_mode: plan.requested_mode,
            mode: plan.mode,
            considered: plan.considered,
            active_wormholes: plan.active_wormholes,
            candidates,
        })
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::Compact => self.render_compact(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn header(&self) -> String {
        let mode = if self.requested_mode == self.mode {
            self.mode.to_string()
        } else {
            format!("{} -> {}", self.requested_mode, self.mode)
        };
        format!(
            "Routes: {} -> {} (mode: {}, {} of {} candidate(s), {} active wormhole(s))",
            self.start,
            self.goal,
            mode,
            self.candidates.len(),
            self.considered,
            self.active_wormholes
        )
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "{}", self.header());
        for candidate in &self.candidates {
            let _ = writeln!(buffer);
            let _ = writeln!(buffer, "{}", candidate.headline());
            if candidate.penalty > 0.0 {
                let _ = writeln!(buffer, "    multi-hop penalty +{:.1}", candidate.penalty);
            }
            for step in &candidate.steps {
                match step.via {
                    Some(via) => {
                        let _ = writeln!(
                            buffer,
                            "{:>5}: {} ({}) via {}",
                            step.index, step.name, step.region, via
                        );
                    }
                    None => {
                        let _ = writeln!(buffer, "{:>5}: {} ({})", step.index, step.name, step.region);
                    }
                }
            }
        }
        buffer
    }

    fn render_compact(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "{}", self.header());
        for candidate in &self.candidates {
            let _ = writeln!(
                buffer,
                "#{} {:.1} {}: {}",
                candidate.rank,
                candidate.score,
                candidate.band.label(),
                candidate.inline_path()
            );
        }
        buffer
    }
}
