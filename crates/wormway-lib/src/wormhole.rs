//! Ephemeral link registry for user-reported wormholes.
//!
//! Expiry is lazy: a link is active at instant `t` iff `created_at <= t <= expires_at()`,
//! evaluated against the caller-supplied clock on every query. Nothing is swept in the
//! background, so correctness never depends on when (or whether) storage is pruned.
//!
//! Mutation follows a copy-on-write discipline. Writers are serialised by the write lock and
//! publish a fresh map; readers clone the current [`Arc`] under a momentary read lock and
//! then work on that snapshot without holding any lock.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::Graph;

/// Registry-assigned wormhole identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct WormholeId(pub u64);

impl fmt::Display for WormholeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Remaining total-mass budget classification of a wormhole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stability {
    /// Mass not yet significantly disrupted (over half remaining).
    Fresh,
    /// Mass reduced but not critical.
    Reduced,
    /// Mass on the verge of collapse.
    Critical,
}

impl Stability {
    pub const ALL: [Stability; 3] = [Stability::Fresh, Stability::Reduced, Stability::Critical];

    pub fn label(self) -> &'static str {
        match self {
            Stability::Fresh => "fresh",
            Stability::Reduced => "reduced",
            Stability::Critical => "critical",
        }
    }
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Stability {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fresh" => Ok(Stability::Fresh),
            "reduced" | "destabilizing" | "destabilising" => Ok(Stability::Reduced),
            "critical" => Ok(Stability::Critical),
            other => Err(Error::InvalidWormhole {
                message: format!(
                    "unknown stability '{other}'; expected fresh, reduced or critical"
                ),
            }),
        }
    }
}

/// Total lifetime class of a wormhole from the moment it was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LifetimeClass {
    #[serde(rename = "16h")]
    Hours16,
    #[serde(rename = "24h")]
    Hours24,
    #[serde(rename = "48h")]
    Hours48,
}

impl LifetimeClass {
    pub fn hours(self) -> i64 {
        match self {
            LifetimeClass::Hours16 => 16,
            LifetimeClass::Hours24 => 24,
            LifetimeClass::Hours48 => 48,
        }
    }

    pub fn duration(self) -> Duration {
        Duration::hours(self.hours())
    }
}

impl fmt::Display for LifetimeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h", self.hours())
    }
}

impl FromStr for LifetimeClass {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "16h" | "16" => Ok(LifetimeClass::Hours16),
            "24h" | "24" => Ok(LifetimeClass::Hours24),
            "48h" | "48" => Ok(LifetimeClass::Hours48),
            other => Err(Error::InvalidWormhole {
                message: format!("unknown lifetime class '{other}'; expected 16h, 24h or 48h"),
            }),
        }
    }
}

/// A wormhole sighting as reported by a scanner, before the registry accepts it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WormholeReport {
    pub from: String,
    pub to: String,
    pub stability: Stability,
    pub mass_cap_kg: f64,
    pub created_at: DateTime<Utc>,
    pub lifetime: LifetimeClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A registered wormhole connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WormholeLink {
    pub id: WormholeId,
    pub from: String,
    pub to: String,
    pub stability: Stability,
    /// Heaviest single vehicle that may pass in one jump, in kilograms.
    pub mass_cap_kg: f64,
    pub created_at: DateTime<Utc>,
    pub lifetime: LifetimeClass,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl WormholeLink {
    /// Instant after which the link no longer exists.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at + self.lifetime.duration()
    }

    /// Pure expiry predicate against the supplied clock.
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.created_at <= at && at <= self.expires_at()
    }

    /// Time left before expiry, or `None` once expired.
    pub fn remaining_at(&self, at: DateTime<Utc>) -> Option<Duration> {
        self.is_active_at(at).then(|| self.expires_at() - at)
    }

    /// The far endpoint when entering from `location`, if the link touches it.
    pub fn other_end(&self, location: &str) -> Option<&str> {
        if self.from == location {
            Some(&self.to)
        } else if self.to == location {
            Some(&self.from)
        } else {
            None
        }
    }
}

/// Shared, immutable view of the registry contents.
pub type Snapshot = Arc<BTreeMap<WormholeId, WormholeLink>>;

#[derive(Debug, Default)]
struct RegistryState {
    links: Snapshot,
    next_id: u64,
}

/// Registry of user-reported wormholes validated against a [`Graph`].
#[derive(Debug)]
pub struct WormholeRegistry {
    graph: Graph,
    state: RwLock<RegistryState>,
}

impl WormholeRegistry {
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            state: RwLock::new(RegistryState {
                links: Arc::new(BTreeMap::new()),
                next_id: 1,
            }),
        }
    }

    /// Graph this registry validates endpoints against.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Validate and register a wormhole report.
    pub fn add(&self, report: WormholeReport) -> Result<WormholeId> {
        self.validate(&report)?;

        let mut state = self.state.write();
        let id = WormholeId(state.next_id);
        state.next_id += 1;

        let link = WormholeLink {
            id,
            from: report.from,
            to: report.to,
            stability: report.stability,
            mass_cap_kg: report.mass_cap_kg,
            created_at: report.created_at,
            lifetime: report.lifetime,
            label: report.label,
        };
        tracing::info!(
            "registered wormhole {} {} <-> {} ({}, {}, expires {})",
            id,
            link.from,
            link.to,
            link.stability,
            link.lifetime,
            link.expires_at().to_rfc3339()
        );

        let mut links = state.links.as_ref().clone();
        links.insert(id, link);
        state.links = Arc::new(links);
        Ok(id)
    }

    /// Explicitly delete a wormhole.
    pub fn remove(&self, id: WormholeId) -> Result<WormholeLink> {
        let mut state = self.state.write();
        let mut links = state.links.as_ref().clone();
        let removed = links.remove(&id).ok_or(Error::UnknownWormhole { id })?;
        state.links = Arc::new(links);
        tracing::info!("removed wormhole {}", id);
        Ok(removed)
    }

    /// Links that exist at `at`, ordered by id. Storage is not touched.
    pub fn active_links(&self, at: DateTime<Utc>) -> Vec<WormholeLink> {
        self.snapshot()
            .values()
            .filter(|link| link.is_active_at(at))
            .cloned()
            .collect()
    }

    /// Drop every link already expired at `at`, returning how many were removed.
    ///
    /// Purely housekeeping: [`Self::active_links`] gives the same answer with or without it.
    pub fn prune_expired(&self, at: DateTime<Utc>) -> usize {
        let mut state = self.state.write();
        let before = state.links.len();
        let kept: BTreeMap<WormholeId, WormholeLink> = state
            .links
            .iter()
            .filter(|(_, link)| at <= link.expires_at())
            .map(|(id, link)| (*id, link.clone()))
            .collect();
        let removed = before - kept.len();
        if removed > 0 {
            state.links = Arc::new(kept);
            tracing::info!("pruned {} expired wormhole(s)", removed);
        }
        removed
    }

    /// Look up a registered link regardless of expiry.
    pub fn get(&self, id: WormholeId) -> Option<WormholeLink> {
        self.snapshot().get(&id).cloned()
    }

    /// Point-in-time view of every stored link, expired ones included.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.state.read();
        Arc::clone(&state.links)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    fn validate(&self, report: &WormholeReport) -> Result<()> {
        for endpoint in [&report.from, &report.to] {
            if !self.graph.contains(endpoint) {
                let suggestions = self.graph.fuzzy_location_matches(endpoint, 3);
                let hint = suggestions
                    .first()
                    .map(|s| format!(" (did you mean '{s}'?)"))
                    .unwrap_or_default();
                return Err(Error::InvalidWormhole {
                    message: format!("unknown endpoint '{endpoint}'{hint}"),
                });
            }
        }
        if report.from == report.to {
            return Err(Error::InvalidWormhole {
                message: format!("wormhole endpoints must differ (both '{}')", report.from),
            });
        }
        if !report.mass_cap_kg.is_finite() || report.mass_cap_kg <= 0.0 {
            return Err(Error::InvalidWormhole {
                message: format!(
                    "mass cap must be a finite positive number of kilograms, got {}",
                    report.mass_cap_kg
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Location, StaticLink};
    use chrono::TimeZone;

    fn graph() -> Graph {
        Graph::load(
            vec![Location::new("A", "R1"), Location::new("B", "R2")],
            vec![StaticLink::gate("A", "B")],
        )
        .unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn report(lifetime: LifetimeClass) -> WormholeReport {
        WormholeReport {
            from: "A".to_string(),
            to: "B".to_string(),
            stability: Stability::Fresh,
            mass_cap_kg: 375_000_000.0,
            created_at: t0(),
            lifetime,
            label: None,
        }
    }

    #[test]
    fn ids_are_sequential() {
        let registry = WormholeRegistry::new(graph());
        let first = registry.add(report(LifetimeClass::Hours16)).unwrap();
        let second = registry.add(report(LifetimeClass::Hours24)).unwrap();
        assert_eq!(first, WormholeId(1));
        assert_eq!(second, WormholeId(2));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let registry = WormholeRegistry::new(graph());
        registry.add(report(LifetimeClass::Hours16)).unwrap();

        let at_expiry = t0() + Duration::hours(16);
        assert_eq!(registry.active_links(at_expiry).len(), 1);
        assert!(registry
            .active_links(at_expiry + Duration::seconds(1))
            .is_empty());
        // Lazy expiry never mutates storage.
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn links_are_absent_before_their_report_time() {
        let registry = WormholeRegistry::new(graph());
        registry.add(report(LifetimeClass::Hours24)).unwrap();
        assert!(registry
            .active_links(t0() - Duration::minutes(1))
            .is_empty());
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let registry = WormholeRegistry::new(graph());
        let mut bad = report(LifetimeClass::Hours24);
        bad.to = "Z".to_string();
        let err = registry.add(bad).expect_err("unknown endpoint");
        assert!(matches!(err, Error::InvalidWormhole { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn non_positive_mass_cap_is_rejected() {
        let registry = WormholeRegistry::new(graph());
        let mut bad = report(LifetimeClass::Hours24);
        bad.mass_cap_kg = 0.0;
        assert!(registry.add(bad).is_err());

        let mut nan = report(LifetimeClass::Hours24);
        nan.mass_cap_kg = f64::NAN;
        assert!(registry.add(nan).is_err());
    }

    #[test]
    fn remove_unknown_id_fails() {
        let registry = WormholeRegistry::new(graph());
        let err = registry.remove(WormholeId(42)).expect_err("unknown id");
        assert!(matches!(err, Error::UnknownWormhole { .. }));
    }

    #[test]
    fn snapshot_is_unaffected_by_later_writes() {
        let registry = WormholeRegistry::new(graph());
        let id = registry.add(report(LifetimeClass::Hours48)).unwrap();
        let before = registry.snapshot();
        registry.remove(id).unwrap();
        assert_eq!(before.len(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn stability_and_lifetime_parse() {
        assert_eq!("Fresh".parse::<Stability>().unwrap(), Stability::Fresh);
        assert_eq!(
            "destabilizing".parse::<Stability>().unwrap(),
            Stability::Reduced
        );
        assert!("stable".parse::<Stability>().is_err());
        assert_eq!(
            "48h".parse::<LifetimeClass>().unwrap(),
            LifetimeClass::Hours48
        );
        assert!("12h".parse::<LifetimeClass>().is_err());
    }

    #[test]
    fn other_end_follows_either_direction() {
        let registry = WormholeRegistry::new(graph());
        let id = registry.add(report(LifetimeClass::Hours24)).unwrap();
        let link = registry.get(id).unwrap();
        assert_eq!(link.other_end("A"), Some("B"));
        assert_eq!(link.other_end("B"), Some("A"));
        assert_eq!(link.other_end("C"), None);
    }
}
