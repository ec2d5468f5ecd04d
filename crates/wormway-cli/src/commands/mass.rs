//! Mass command handler.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;

use wormway_cli::network::load_network;
use wormway_cli::output::{to_json, MassReport, OutputFormat};
use wormway_lib::constants::DEFAULT_PER_JUMP_MASS_KG;
use wormway_lib::{
    AdmissionChecker, FleetManifest, ManifestEntry, MassTable, Stability, WormholeId,
    WormholeLink,
};

/// Environment variable naming a default mass table.
pub const MASS_TABLE_ENV: &str = "WORMWAY_MASS_TABLE";

#[derive(Args, Debug)]
pub struct MassArgs {
    /// Vehicle mass CSV. Falls back to $WORMWAY_MASS_TABLE.
    #[arg(long)]
    pub table: Option<PathBuf>,
    /// Fleet entry as NAME=COUNT (a bare NAME counts one). Repeat for each type.
    #[arg(long = "ship", required = true)]
    pub ships: Vec<ManifestEntry>,
    /// Network JSON file holding the wormhole to check.
    #[arg(long, requires = "wormhole", conflicts_with = "stability")]
    pub network: Option<PathBuf>,
    /// Registry id of the wormhole in the network file.
    #[arg(long, requires = "network")]
    pub wormhole: Option<u64>,
    /// Instant the wormhole must be active at (RFC 3339). Defaults to now.
    #[arg(long, requires = "network")]
    pub at: Option<DateTime<Utc>>,
    /// Stability stage to check against when no network is given.
    #[arg(long)]
    pub stability: Option<Stability>,
    /// Per-jump mass cap in kilograms when no network is given.
    #[arg(long, default_value_t = DEFAULT_PER_JUMP_MASS_KG)]
    pub mass_cap: f64,
    /// Check every stability stage instead of a single one.
    #[arg(long, conflicts_with_all = ["network", "stability"])]
    pub survey: bool,
}

/// Evaluate a fleet against a wormhole or a stability stage and print the verdict.
pub fn handle_mass(args: &MassArgs, format: OutputFormat) -> Result<()> {
    let table = load_mass_table(args.table.as_deref())?;
    let manifest: FleetManifest = args
        .ships
        .iter()
        .map(|entry| (entry.name.clone(), entry.count))
        .collect();
    let fleet = manifest.resolve(&table)?;
    let checker = AdmissionChecker::default();

    let (wormhole, verdicts) = match (&args.network, args.wormhole) {
        (Some(network), Some(id)) => {
            let link = find_wormhole(network, WormholeId(id), args.at)?;
            let verdict = checker.evaluate(fleet.total_mass_kg(), &fleet.units, &link)?;
            (Some(link), vec![verdict])
        }
        _ if args.survey => (None, checker.survey(&fleet.units, args.mass_cap)?),
        _ => {
            let Some(stability) = args.stability else {
                bail!("pass --network with --wormhole, --stability, or --survey");
            };
            let verdict = checker.evaluate_stage(
                fleet.total_mass_kg(),
                &fleet.units,
                stability,
                args.mass_cap,
            )?;
            (None, vec![verdict])
        }
    };

    let report = MassReport {
        wormhole,
        total_mass_kg: fleet.total_mass_kg(),
        vehicle_count: fleet.vehicle_count(),
        verdicts,
    };
    match format {
        OutputFormat::Json => println!("{}", to_json(&report)?),
        OutputFormat::Text | OutputFormat::Compact => print!("{}", report.render()),
    }
    Ok(())
}

fn load_mass_table(explicit: Option<&Path>) -> Result<MassTable> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => std::env::var_os(MASS_TABLE_ENV)
            .map(PathBuf::from)
            .with_context(|| format!("no mass table given; pass --table or set {MASS_TABLE_ENV}"))?,
    };
    MassTable::from_path(&path)
        .with_context(|| format!("failed to load mass table from {}", path.display()))
}

fn find_wormhole(path: &Path, id: WormholeId, at: Option<DateTime<Utc>>) -> Result<WormholeLink> {
    let network = load_network(path)?;
    let link = network
        .registry
        .get(id)
        .with_context(|| format!("wormhole {id} is not registered in {}", path.display()))?;
    let at = at.unwrap_or_else(Utc::now);
    if !link.is_active_at(at) {
        bail!(
            "wormhole {id} is not active at {} (open {} to {})",
            at.to_rfc3339(),
            link.created_at.to_rfc3339(),
            link.expires_at().to_rfc3339()
        );
    }
    Ok(link)
}
