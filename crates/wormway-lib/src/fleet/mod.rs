//! Fleet mass tables, manifests and wormhole mass admission.
//!
//! - [`catalog`] - Vehicle mass table loading and lookup
//! - [`manifest`] - Fleet composition and resolution against a mass table
//! - [`admission`] - Per-jump and cumulative mass checks producing a [`Verdict`]
//!
//! # Example
//!
//! ```ignore
//! use wormway_lib::fleet::{AdmissionChecker, FleetManifest, MassTable};
//!
//! let table = MassTable::from_path(std::path::Path::new("vehicle_masses.csv"))?;
//! let manifest = FleetManifest::new().with("Drake", 4).with("Rifter", 10);
//! let verdict = AdmissionChecker::default().evaluate_manifest(&manifest, &table, &wormhole)?;
//! println!("{verdict}");
//! ```

pub mod admission;
pub mod catalog;
pub mod manifest;

pub use admission::{AdmissionChecker, MassLimits, OversizedUnit, TypeAllowance, Verdict};
pub use catalog::{MassTable, VehicleMass};
pub use manifest::{FleetManifest, FleetUnit, ManifestEntry, ResolvedFleet};
