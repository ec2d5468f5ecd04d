//! Wormholes command handler.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;

use wormway_cli::network::load_network;
use wormway_cli::output::{render_wormholes, to_json, ActiveWormhole, OutputFormat};

#[derive(Args, Debug)]
pub struct WormholesArgs {
    /// Network JSON file with locations, links and wormhole reports.
    #[arg(long)]
    pub network: PathBuf,
    /// Instant to evaluate expiry at (RFC 3339). Defaults to now.
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
}

/// List the wormholes that are active at the requested instant.
pub fn handle_wormholes(args: &WormholesArgs, format: OutputFormat) -> Result<()> {
    let network = load_network(&args.network)?;
    let at = args.at.unwrap_or_else(Utc::now);
    let active: Vec<ActiveWormhole> = network
        .registry
        .active_links(at)
        .into_iter()
        .filter_map(|link| ActiveWormhole::at(link, at))
        .collect();

    match format {
        OutputFormat::Json => println!("{}", to_json(&active)?),
        OutputFormat::Text | OutputFormat::Compact => print!("{}", render_wormholes(&active, at)),
    }
    Ok(())
}
