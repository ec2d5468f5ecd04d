//! Vehicle mass table loading and lookup.
//!
//! The table maps a vehicle-type name to its unit mass in kilograms. It is loaded from CSV
//! with a tolerant header mapping so exports from different tools can be used as-is.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use serde::Serialize;

use crate::error::{suggest, Error, Result};

/// A vehicle type and its unit mass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleMass {
    pub name: String,
    pub mass_kg: f64,
}

impl VehicleMass {
    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::MassTableValidation {
                message: "vehicle name must not be empty".to_string(),
            });
        }
        if !self.mass_kg.is_finite() || self.mass_kg <= 0.0 {
            return Err(Error::MassTableValidation {
                message: format!(
                    "mass for '{}' must be a finite positive number",
                    self.name
                ),
            });
        }
        Ok(())
    }
}

/// Collection of vehicle masses keyed case-insensitively by name.
#[derive(Debug, Clone, Default)]
pub struct MassTable {
    vehicles: HashMap<String, VehicleMass>,
    source: Option<PathBuf>,
}

impl MassTable {
    /// Load a mass table from a CSV file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mut table = Self::from_reader(file)?;
        table.source = Some(path.to_path_buf());
        tracing::info!(
            "loaded {} vehicle masses from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Load a mass table from a reader (e.g., file or in-memory buffer).
    ///
    /// A header row is required. The name column may be called `name`, `type`, `ship`,
    /// `vehicle` (or similar) and the mass column `mass_kg`, `mass` or `mass (kg)`. Extra
    /// columns are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|err| Error::MassTableValidation {
                message: format!("failed to read mass table headers: {err}"),
            })?
            .clone();

        let normalized_headers: Vec<String> = headers.iter().map(normalize_header).collect();

        let synonyms: &[(&str, &[&str])] = &[
            (
                "name",
                &[
                    "name",
                    "type",
                    "ship",
                    "ship_name",
                    "shipname",
                    "ship_type",
                    "vehicle",
                    "vehicle_type",
                ],
            ),
            ("mass_kg", &["mass_kg", "masskg", "mass", "mass_kg_", "unit_mass_kg"]),
        ];

        let mut index_map: BTreeMap<&str, usize> = BTreeMap::new();
        for (canon, alts) in synonyms {
            let found = alts.iter().find_map(|alt| {
                let alt = normalize_header(alt);
                normalized_headers.iter().position(|header| *header == alt)
            });
            if let Some(position) = found {
                index_map.insert(*canon, position);
            }
        }

        let missing: Vec<&str> = ["name", "mass_kg"]
            .into_iter()
            .filter(|field| !index_map.contains_key(field))
            .collect();
        if !missing.is_empty() {
            return Err(Error::MassTableValidation {
                message: format!(
                    "mass table missing required columns: {}. Available: {}",
                    missing.join(", "),
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        let mut table = Self::default();
        // Header is line 1.
        for (offset, result) in csv_reader.records().enumerate() {
            let row = offset + 2;
            let record = result.map_err(|err| Error::MassTableValidation {
                message: err.to_string(),
            })?;
            let get = |field: &str| -> String {
                index_map
                    .get(field)
                    .and_then(|&i| record.get(i))
                    .unwrap_or_default()
                    .trim()
                    .to_string()
            };

            let name = get("name");
            let raw_mass = get("mass_kg").replace(['_', ','], "");
            let mass_kg = raw_mass
                .parse::<f64>()
                .map_err(|err| Error::MassTableValidation {
                    message: format!("invalid mass for '{name}' at row {row}: {err}"),
                })?;
            table.insert(VehicleMass { name, mass_kg })?;
        }

        Ok(table)
    }

    /// Build a table from in-memory `(name, mass_kg)` pairs with the same validation as the
    /// CSV loader.
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (name, mass_kg) in entries {
            table.insert(VehicleMass {
                name: name.into().trim().to_string(),
                mass_kg,
            })?;
        }
        Ok(table)
    }

    fn insert(&mut self, vehicle: VehicleMass) -> Result<()> {
        vehicle.validate()?;
        let key = normalize_name(&vehicle.name);
        if self.vehicles.contains_key(&key) {
            return Err(Error::DuplicateVehicle { name: vehicle.name });
        }
        self.vehicles.insert(key, vehicle);
        Ok(())
    }

    /// Get a vehicle by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&VehicleMass> {
        self.vehicles.get(&normalize_name(name))
    }

    /// Get a vehicle or fail with close-match suggestions.
    pub fn lookup(&self, name: &str) -> Result<&VehicleMass> {
        self.get(name).ok_or_else(|| Error::UnknownVehicle {
            name: name.to_string(),
            suggestions: suggest(
                name,
                self.vehicles.values().map(|vehicle| vehicle.name.as_str()),
                3,
            ),
        })
    }

    /// Sorted list of vehicle names as written in the source.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.vehicles.values().map(|v| v.name.clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// Get the source path if the table was loaded from a file.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

fn normalize_header(header: &str) -> String {
    header
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Normalize a vehicle name for case-insensitive lookup.
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
