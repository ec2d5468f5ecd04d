//! Wormhole mass admission.
//!
//! Two independent checks decide whether a fleet can use a wormhole:
//!
//! 1. **Per-jump cap**: every unit must individually fit under the hole's per-jump mass cap.
//!    A unit over the cap can never pass, so the fleet is `Incompatible` whatever its total.
//! 2. **Cumulative budget**: the fleet's total mass must fit under the ceiling for the hole's
//!    stability stage. Failing only this check gives `PartiallyCompatible`, with the number
//!    of ceiling-sized jumps the fleet would need.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CRITICAL_TOTAL_MASS_KG, FRESH_TOTAL_MASS_KG, NEAR_CAPACITY_RATIO, REDUCED_TOTAL_MASS_KG,
};
use crate::error::{Error, Result};
use crate::wormhole::{Stability, WormholeLink};

use super::catalog::MassTable;
use super::manifest::{FleetManifest, FleetUnit};

/// Total-mass ceilings per stability stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassLimits {
    pub fresh: f64,
    pub reduced: f64,
    pub critical: f64,
    /// A fitting fleet above this fraction of the ceiling is flagged as near capacity.
    pub near_capacity_ratio: f64,
}

impl Default for MassLimits {
    fn default() -> Self {
        Self {
            fresh: FRESH_TOTAL_MASS_KG,
            reduced: REDUCED_TOTAL_MASS_KG,
            critical: CRITICAL_TOTAL_MASS_KG,
            near_capacity_ratio: NEAR_CAPACITY_RATIO,
        }
    }
}

impl MassLimits {
    /// Ceilings must be finite, positive and strictly decreasing Fresh > Reduced > Critical.
    pub fn validate(&self) -> Result<()> {
        for (value, field) in [
            (self.fresh, "fresh"),
            (self.reduced, "reduced"),
            (self.critical, "critical"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig {
                    message: format!("{field} mass ceiling must be a finite positive number"),
                });
            }
        }
        if self.fresh <= self.reduced || self.reduced <= self.critical {
            return Err(Error::InvalidConfig {
                message: "mass ceilings must satisfy fresh > reduced > critical".to_string(),
            });
        }
        let ratio = self.near_capacity_ratio;
        if ratio.is_nan() || ratio <= 0.0 || ratio > 1.0 {
            return Err(Error::InvalidConfig {
                message: "near_capacity_ratio must be in (0, 1]".to_string(),
            });
        }
        Ok(())
    }

    pub fn ceiling(&self, stability: Stability) -> f64 {
        match stability {
            Stability::Fresh => self.fresh,
            Stability::Reduced => self.reduced,
            Stability::Critical => self.critical,
        }
    }
}

/// A vehicle type whose unit mass exceeds the per-jump cap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OversizedUnit {
    pub name: String,
    pub unit_mass_kg: f64,
}

/// How a vehicle type can be moved within the cumulative budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeAllowance {
    pub name: String,
    pub count: u32,
    pub unit_mass_kg: f64,
    /// Most units of this type that fit under the ceiling at once.
    pub max_units_per_jump: u64,
    /// Ceiling-sized jumps needed for all units of this type; `None` when a single unit is
    /// already heavier than the ceiling.
    pub jumps_required: Option<u64>,
}

/// Outcome of a mass admission check.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    FullyCompatible {
        stability: Stability,
        total_mass_kg: f64,
        ceiling_kg: f64,
        remaining_budget_kg: f64,
        /// How many times the whole fleet fits into the ceiling.
        full_fleet_passes: u64,
        near_capacity: bool,
    },
    PartiallyCompatible {
        stability: Stability,
        total_mass_kg: f64,
        ceiling_kg: f64,
        /// `ceil(total / ceiling)`, always at least 2.
        jumps_required: u64,
        per_type: Vec<TypeAllowance>,
    },
    Incompatible {
        stability: Stability,
        per_jump_cap_kg: f64,
        oversized: Vec<OversizedUnit>,
    },
}

impl Verdict {
    pub fn stability(&self) -> Stability {
        match self {
            Verdict::FullyCompatible { stability, .. }
            | Verdict::PartiallyCompatible { stability, .. }
            | Verdict::Incompatible { stability, .. } => *stability,
        }
    }

    pub fn is_fully_compatible(&self) -> bool {
        matches!(self, Verdict::FullyCompatible { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::FullyCompatible { .. } => "fully compatible",
            Verdict::PartiallyCompatible { .. } => "partially compatible",
            Verdict::Incompatible { .. } => "incompatible",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::FullyCompatible {
                stability,
                total_mass_kg,
                ceiling_kg,
                remaining_budget_kg,
                full_fleet_passes,
                near_capacity,
            } => {
                write!(
                    f,
                    "fully compatible with a {stability} wormhole: {} of {} ({} to spare)",
                    megatons(*total_mass_kg),
                    megatons(*ceiling_kg),
                    megatons(*remaining_budget_kg)
                )?;
                if *near_capacity {
                    write!(
                        f,
                        "; risky, fleet uses {:.0}% of capacity",
                        total_mass_kg / ceiling_kg * 100.0
                    )
                } else {
                    write!(f, "; {full_fleet_passes} full fleet jumps possible")
                }
            }
            Verdict::PartiallyCompatible {
                stability,
                total_mass_kg,
                ceiling_kg,
                jumps_required,
                per_type,
            } => {
                write!(
                    f,
                    "partially compatible with a {stability} wormhole: {} exceeds the {} \
                     ceiling, {jumps_required} jumps required",
                    megatons(*total_mass_kg),
                    megatons(*ceiling_kg)
                )?;
                for allowance in per_type {
                    write!(
                        f,
                        "\n  {} x{}: up to {} per jump",
                        allowance.name, allowance.count, allowance.max_units_per_jump
                    )?;
                    match allowance.jumps_required {
                        Some(jumps) => write!(f, ", {jumps} jump(s)")?,
                        None => write!(f, ", a single unit exceeds the ceiling")?,
                    }
                }
                Ok(())
            }
            Verdict::Incompatible {
                stability,
                per_jump_cap_kg,
                oversized,
            } => {
                let names: Vec<String> = oversized
                    .iter()
                    .map(|unit| format!("{} ({})", unit.name, megatons(unit.unit_mass_kg)))
                    .collect();
                write!(
                    f,
                    "incompatible with a {stability} wormhole: too heavy for the {} per-jump \
                     cap: {}",
                    megatons(*per_jump_cap_kg),
                    names.join(", ")
                )
            }
        }
    }
}

fn megatons(kg: f64) -> String {
    format!("{:.1}M kg", kg / 1_000_000.0)
}

/// Decides mass admission against injected [`MassLimits`].
#[derive(Debug, Clone, Default)]
pub struct AdmissionChecker {
    limits: MassLimits,
}

impl AdmissionChecker {
    pub fn new(limits: MassLimits) -> Result<Self> {
        limits.validate()?;
        Ok(Self { limits })
    }

    pub fn limits(&self) -> &MassLimits {
        &self.limits
    }

    /// Evaluate a fleet against a registered wormhole.
    pub fn evaluate(
        &self,
        total_mass_kg: f64,
        units: &[FleetUnit],
        wormhole: &WormholeLink,
    ) -> Result<Verdict> {
        self.evaluate_stage(total_mass_kg, units, wormhole.stability, wormhole.mass_cap_kg)
    }

    /// Evaluate a fleet against a stability stage and per-jump cap directly.
    pub fn evaluate_stage(
        &self,
        total_mass_kg: f64,
        units: &[FleetUnit],
        stability: Stability,
        per_jump_cap_kg: f64,
    ) -> Result<Verdict> {
        validate_inputs(total_mass_kg, units, per_jump_cap_kg)?;

        let oversized: Vec<OversizedUnit> = units
            .iter()
            .filter(|unit| unit.unit_mass_kg > per_jump_cap_kg)
            .map(|unit| OversizedUnit {
                name: unit.name.clone(),
                unit_mass_kg: unit.unit_mass_kg,
            })
            .collect();
        if !oversized.is_empty() {
            return Ok(Verdict::Incompatible {
                stability,
                per_jump_cap_kg,
                oversized,
            });
        }

        let ceiling_kg = self.limits.ceiling(stability);
        if total_mass_kg <= ceiling_kg {
            // Saturates for a massless fleet.
            let full_fleet_passes = (ceiling_kg / total_mass_kg).floor() as u64;
            return Ok(Verdict::FullyCompatible {
                stability,
                total_mass_kg,
                ceiling_kg,
                remaining_budget_kg: ceiling_kg - total_mass_kg,
                full_fleet_passes,
                near_capacity: total_mass_kg > ceiling_kg * self.limits.near_capacity_ratio,
            });
        }

        let per_type = units
            .iter()
            .map(|unit| type_allowance(unit, ceiling_kg))
            .collect();
        Ok(Verdict::PartiallyCompatible {
            stability,
            total_mass_kg,
            ceiling_kg,
            jumps_required: (total_mass_kg / ceiling_kg).ceil() as u64,
            per_type,
        })
    }

    /// Resolve `manifest` against `table`, then evaluate. An unknown vehicle type aborts
    /// before any mass is computed.
    pub fn evaluate_manifest(
        &self,
        manifest: &FleetManifest,
        table: &MassTable,
        wormhole: &WormholeLink,
    ) -> Result<Verdict> {
        let fleet = manifest.resolve(table)?;
        let verdict = self.evaluate(fleet.total_mass_kg(), &fleet.units, wormhole)?;
        tracing::debug!(
            "fleet of {} vehicle(s) against wormhole {}: {}",
            fleet.vehicle_count(),
            wormhole.id,
            verdict.label()
        );
        Ok(verdict)
    }

    /// Evaluate the fleet against every stability stage, Fresh first.
    pub fn survey(&self, units: &[FleetUnit], per_jump_cap_kg: f64) -> Result<Vec<Verdict>> {
        let total: f64 = units.iter().map(FleetUnit::total_mass_kg).sum();
        Stability::ALL
            .iter()
            .map(|stability| self.evaluate_stage(total, units, *stability, per_jump_cap_kg))
            .collect()
    }
}

fn validate_inputs(total_mass_kg: f64, units: &[FleetUnit], per_jump_cap_kg: f64) -> Result<()> {
    if !total_mass_kg.is_finite() || total_mass_kg < 0.0 {
        return Err(Error::InvalidFleet {
            message: "total mass must be finite and non-negative".to_string(),
        });
    }
    if !per_jump_cap_kg.is_finite() || per_jump_cap_kg <= 0.0 {
        return Err(Error::InvalidFleet {
            message: "per-jump mass cap must be finite and positive".to_string(),
        });
    }
    if let Some(unit) = units
        .iter()
        .find(|unit| !unit.unit_mass_kg.is_finite() || unit.unit_mass_kg < 0.0)
    {
        return Err(Error::InvalidFleet {
            message: format!("unit mass for '{}' must be finite and non-negative", unit.name),
        });
    }
    Ok(())
}

fn type_allowance(unit: &FleetUnit, ceiling_kg: f64) -> TypeAllowance {
    let count = u64::from(unit.count);
    let (max_units_per_jump, jumps_required) = if unit.unit_mass_kg == 0.0 {
        (count, Some(u64::from(count > 0)))
    } else {
        let max = (ceiling_kg / unit.unit_mass_kg).floor() as u64;
        let jumps = (max > 0).then(|| count.div_ceil(max));
        (max, jumps)
    };
    TypeAllowance {
        name: unit.name.clone(),
        count: unit.count,
        unit_mass_kg: unit.unit_mass_kg,
        max_units_per_jump,
        jumps_required,
    }
}
