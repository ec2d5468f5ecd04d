use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::catalog::MassTable;

/// Requested fleet composition: vehicle-type name to count.
///
/// Names are kept as written; they resolve against a [`MassTable`] only when the fleet is
/// evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FleetManifest {
    entries: BTreeMap<String, u32>,
}

impl FleetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` vehicles of `name`, accumulating onto any existing entry.
    pub fn add(&mut self, name: impl Into<String>, count: u32) -> &mut Self {
        let name = name.into().trim().to_string();
        let entry = self.entries.entry(name).or_insert(0);
        *entry = entry.saturating_add(count);
        self
    }

    pub fn with(mut self, name: impl Into<String>, count: u32) -> Self {
        self.add(name, count);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve every entry to a unit mass.
    ///
    /// The first unknown name aborts with [`Error::UnknownVehicle`]; no partial total is
    /// produced. Entries naming the same vehicle with different casing are merged.
    pub fn resolve(&self, table: &MassTable) -> Result<ResolvedFleet> {
        if self.entries.is_empty() {
            return Err(Error::InvalidFleet {
                message: "fleet manifest is empty".to_string(),
            });
        }

        let mut merged: BTreeMap<String, FleetUnit> = BTreeMap::new();
        for (name, count) in self.iter() {
            if count == 0 {
                return Err(Error::InvalidFleet {
                    message: format!("count for '{name}' must be at least 1"),
                });
            }
            let vehicle = table.lookup(name)?;
            merged
                .entry(vehicle.name.clone())
                .and_modify(|unit| unit.count = unit.count.saturating_add(count))
                .or_insert_with(|| FleetUnit {
                    name: vehicle.name.clone(),
                    count,
                    unit_mass_kg: vehicle.mass_kg,
                });
        }

        Ok(ResolvedFleet {
            units: merged.into_values().collect(),
        })
    }
}

impl<S: Into<String>> FromIterator<(S, u32)> for FleetManifest {
    fn from_iter<T: IntoIterator<Item = (S, u32)>>(iter: T) -> Self {
        let mut manifest = Self::new();
        for (name, count) in iter {
            manifest.add(name, count);
        }
        manifest
    }
}

/// One manifest line parsed from `NAME=COUNT` (or a bare `NAME`, meaning one unit).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    pub count: u32,
}

impl FromStr for ManifestEntry {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        let (name, count) = match value.rsplit_once('=') {
            Some((name, count)) => {
                let count = count.trim().parse::<u32>().map_err(|_| Error::InvalidFleet {
                    message: format!("invalid count in '{value}', expected NAME=COUNT"),
                })?;
                (name.trim(), count)
            }
            None => (value.trim(), 1),
        };
        if name.is_empty() {
            return Err(Error::InvalidFleet {
                message: format!("missing vehicle name in '{value}'"),
            });
        }
        Ok(Self {
            name: name.to_string(),
            count,
        })
    }
}

/// A vehicle type with its resolved unit mass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetUnit {
    pub name: String,
    pub count: u32,
    pub unit_mass_kg: f64,
}

impl FleetUnit {
    pub fn new(name: impl Into<String>, count: u32, unit_mass_kg: f64) -> Self {
        Self {
            name: name.into(),
            count,
            unit_mass_kg,
        }
    }

    pub fn total_mass_kg(&self) -> f64 {
        self.unit_mass_kg * f64::from(self.count)
    }
}

/// A manifest whose every entry has a known unit mass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedFleet {
    pub units: Vec<FleetUnit>,
}

impl ResolvedFleet {
    /// Σ(count × unit mass).
    pub fn total_mass_kg(&self) -> f64 {
        self.units.iter().map(FleetUnit::total_mass_kg).sum()
    }

    pub fn vehicle_count(&self) -> u64 {
        self.units.iter().map(|unit| u64::from(unit.count)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> MassTable {
        MassTable::from_entries([("Rifter", 1_000_000.0), ("Drake", 13_000_000.0)]).unwrap()
    }

    #[test]
    fn resolves_and_totals() {
        let fleet = FleetManifest::new()
            .with("Rifter", 3)
            .with("drake", 1)
            .with("DRAKE", 1)
            .resolve(&table())
            .unwrap();
        assert_eq!(fleet.units.len(), 2);
        assert_eq!(fleet.vehicle_count(), 5);
        assert_eq!(fleet.total_mass_kg(), 29_000_000.0);
    }

    #[test]
    fn unknown_vehicle_names_the_type() {
        let err = FleetManifest::new()
            .with("Rifter", 1)
            .with("Titan", 1)
            .resolve(&table())
            .unwrap_err();
        match err {
            Error::UnknownVehicle { name, .. } => assert_eq!(name, "Titan"),
            other => panic!("expected unknown vehicle, got {other:?}"),
        }
    }

    #[test]
    fn empty_and_zero_counts_are_rejected() {
        assert!(FleetManifest::new().resolve(&table()).is_err());
        assert!(FleetManifest::new()
            .with("Rifter", 0)
            .resolve(&table())
            .is_err());
    }

    #[test]
    fn parses_manifest_entries() {
        let entry: ManifestEntry = "Drake=4".parse().unwrap();
        assert_eq!(entry.count, 4);
        let bare: ManifestEntry = " Rifter ".parse().unwrap();
        assert_eq!((bare.name.as_str(), bare.count), ("Rifter", 1));
        assert!("Drake=many".parse::<ManifestEntry>().is_err());
        assert!("=3".parse::<ManifestEntry>().is_err());
    }
}
