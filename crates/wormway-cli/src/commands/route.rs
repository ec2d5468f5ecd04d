//! Route command handler.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};

use wormway_cli::network::load_network;
use wormway_cli::output::OutputFormat;
use wormway_lib::constants::{DEFAULT_MAX_LEG_EDGES, DEFAULT_MAX_WORMHOLE_HOPS, DEFAULT_TOP_K};
use wormway_lib::{
    plan_routes, RouteConstraints, RouteRequest, RouteScorer, RouteSummary, SearchMode,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Combined search, widened to hybrid when the regions share no static link.
    Auto,
    /// Gates and bridges only.
    Static,
    /// One search over static links plus active wormholes.
    Combined,
    /// Combined search plus explicit wormhole chain enumeration.
    Hybrid,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => SearchMode::Auto,
            ModeArg::Static => SearchMode::Static,
            ModeArg::Combined => SearchMode::Combined,
            ModeArg::Hybrid => SearchMode::Hybrid,
        }
    }
}

#[derive(Args, Debug)]
pub struct RouteArgs {
    /// Network JSON file with locations, links and wormhole reports.
    #[arg(long)]
    pub network: PathBuf,
    /// Starting location name.
    #[arg(long = "from")]
    pub from: String,
    /// Destination location name.
    #[arg(long = "to")]
    pub to: String,
    /// Which link kinds the search may use.
    #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
    pub mode: ModeArg,
    /// Number of ranked candidates to show.
    #[arg(long, default_value_t = DEFAULT_TOP_K)]
    pub top: usize,
    /// Instant to evaluate wormhole expiry at (RFC 3339). Defaults to now.
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,
    /// Location to route around. Repeat for several.
    #[arg(long = "avoid")]
    pub avoid: Vec<String>,
    /// Longest wormhole chain considered in hybrid mode.
    #[arg(long, default_value_t = DEFAULT_MAX_WORMHOLE_HOPS)]
    pub max_wormhole_hops: usize,
    /// Longest static leg around each wormhole hop in hybrid mode.
    #[arg(long, default_value_t = DEFAULT_MAX_LEG_EDGES)]
    pub max_leg_edges: usize,
}

impl RouteArgs {
    fn request(&self, at: DateTime<Utc>) -> RouteRequest {
        RouteRequest::new(&self.from, &self.to, at)
            .with_mode(self.mode.into())
            .with_top_k(self.top)
            .with_constraints(RouteConstraints {
                avoid_locations: self.avoid.clone(),
                max_leg_edges: self.max_leg_edges,
                max_wormhole_hops: self.max_wormhole_hops,
            })
    }
}

/// Plan routes and print the ranked candidates.
pub fn handle_route(args: &RouteArgs, format: OutputFormat) -> Result<()> {
    let network = load_network(&args.network)?;
    let at = args.at.unwrap_or_else(Utc::now);
    let request = args.request(at);

    let plan = plan_routes(
        &network.graph,
        &network.registry,
        &RouteScorer::default(),
        &request,
    )
    .with_context(|| format!("failed to plan a route from {} to {}", args.from, args.to))?;
    let summary = RouteSummary::from_plan(&network.graph, &plan)?;

    match format.route_render_mode() {
        Some(mode) => print!("{}", summary.render(mode)),
        None => println!("{}", summary.to_json()?),
    }
    Ok(())
}
