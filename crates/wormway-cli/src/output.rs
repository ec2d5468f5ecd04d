//! Terminal formatting for command results.

use std::fmt::Write;

use chrono::{DateTime, Duration, Utc};
use clap::ValueEnum;
use serde::Serialize;

use wormway_lib::{RouteRenderMode, TypeAllowance, Verdict, WormholeLink};

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text, one step per line.
    #[default]
    Text,
    /// One line per route candidate.
    Compact,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Text rendering mode for route summaries; `None` for JSON.
    pub fn route_render_mode(self) -> Option<RouteRenderMode> {
        match self {
            OutputFormat::Text => Some(RouteRenderMode::PlainText),
            OutputFormat::Compact => Some(RouteRenderMode::Compact),
            OutputFormat::Json => None,
        }
    }
}

/// A wormhole as listed by the `wormholes` command.
#[derive(Debug, Clone, Serialize)]
pub struct ActiveWormhole {
    #[serde(flatten)]
    pub link: WormholeLink,
    pub expires_at: DateTime<Utc>,
    pub remaining_minutes: i64,
}

impl ActiveWormhole {
    /// `None` when the link is not active at `at`.
    pub fn at(link: WormholeLink, at: DateTime<Utc>) -> Option<Self> {
        let remaining = link.remaining_at(at)?;
        Some(Self {
            expires_at: link.expires_at(),
            remaining_minutes: remaining.num_minutes(),
            link,
        })
    }
}

pub fn render_wormholes(wormholes: &[ActiveWormhole], at: DateTime<Utc>) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "Active wormholes at {} ({}):",
        at.to_rfc3339(),
        wormholes.len()
    );
    if wormholes.is_empty() {
        return buffer;
    }
    let _ = writeln!(
        buffer,
        "{:<5} {:<10} {:<28} {:<9} {:>10} {:>10}",
        "Id", "Label", "Connection", "Stability", "Cap (kg)", "Remaining"
    );
    for hole in wormholes {
        let link = &hole.link;
        let _ = writeln!(
            buffer,
            "{:<5} {:<10} {:<28} {:<9} {:>10.0} {:>10}",
            link.id.0,
            link.label.as_deref().unwrap_or("-"),
            format!("{} <-> {}", link.from, link.to),
            link.stability,
            link.mass_cap_kg,
            format_remaining(Duration::minutes(hole.remaining_minutes))
        );
    }
    buffer
}

fn format_remaining(remaining: Duration) -> String {
    let minutes = remaining.num_minutes().max(0);
    format!("{}h{:02}m", minutes / 60, minutes % 60)
}

/// Verdicts for one fleet, with the wormhole they were checked against when known.
#[derive(Debug, Clone, Serialize)]
pub struct MassReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wormhole: Option<WormholeLink>,
    pub total_mass_kg: f64,
    pub vehicle_count: u64,
    pub verdicts: Vec<Verdict>,
}

impl MassReport {
    pub fn render(&self) -> String {
        let mut buffer = String::new();
        if let Some(link) = &self.wormhole {
            let _ = writeln!(
                buffer,
                "Wormhole {} {} <-> {} ({}, per-jump cap {:.0} kg)",
                link.id,
                link.from,
                link.to,
                link.stability,
                link.mass_cap_kg
            );
        }
        let _ = writeln!(
            buffer,
            "Fleet: {} vehicle(s), {:.0} kg total",
            self.vehicle_count, self.total_mass_kg
        );
        for verdict in &self.verdicts {
            let _ = writeln!(buffer, "{verdict}");
            if let Verdict::PartiallyCompatible { per_type, .. } = verdict {
                if let Some(line) = unmovable_line(per_type) {
                    let _ = writeln!(buffer, "{line}");
                }
            }
        }
        buffer
    }
}

fn unmovable_line(per_type: &[TypeAllowance]) -> Option<String> {
    let names: Vec<&str> = per_type
        .iter()
        .filter(|allowance| allowance.jumps_required.is_none())
        .map(|allowance| allowance.name.as_str())
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(format!(
            "warning: {} cannot be moved within this stage's budget",
            names.join(", ")
        ))
    }
}

/// Pretty JSON for any serialisable result.
pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wormway_lib::{LifetimeClass, Stability, WormholeId};

    fn link() -> WormholeLink {
        WormholeLink {
            id: WormholeId(7),
            from: "Onga".to_string(),
            to: "Barbican".to_string(),
            stability: Stability::Fresh,
            mass_cap_kg: 375_000_000.0,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
            lifetime: LifetimeClass::Hours16,
            label: Some("L-1SW8".to_string()),
        }
    }

    #[test]
    fn lists_remaining_lifetime() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 10, 30, 0).unwrap();
        let hole = ActiveWormhole::at(link(), at).unwrap();
        assert_eq!(hole.remaining_minutes, 330);
        let text = render_wormholes(&[hole], at);
        assert!(text.contains("Active wormholes at 2026-03-01T10:30:00+00:00 (1):"));
        assert!(text.contains("Onga <-> Barbican"));
        assert!(text.contains("5h30m"));
    }

    #[test]
    fn expired_links_are_not_listed() {
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        assert!(ActiveWormhole::at(link(), at).is_none());
    }

    #[test]
    fn json_flattens_the_link() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let hole = ActiveWormhole::at(link(), at).unwrap();
        let json: serde_json::Value = serde_json::from_str(&to_json(&hole).unwrap()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["lifetime"], "16h");
        assert_eq!(json["remaining_minutes"], 960);
    }
}
