use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use wormway_cli::output::OutputFormat;

mod commands;

use commands::mass::{handle_mass, MassArgs};
use commands::route::{handle_route, RouteArgs};
use commands::wormholes::{handle_wormholes, WormholesArgs};

#[derive(Parser, Debug)]
#[command(author, version, about = "Hybrid gate, bridge and wormhole route planner")]
struct Cli {
    /// Output format for command results.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan and rank routes between two locations.
    Route(RouteArgs),
    /// List the wormholes active at an instant.
    Wormholes(WormholesArgs),
    /// Check whether a fleet can pass through a wormhole.
    Mass(MassArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Command::Route(args) => handle_route(args, cli.format),
        Command::Wormholes(args) => handle_wormholes(args, cli.format),
        Command::Mass(args) => handle_mass(args, cli.format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
