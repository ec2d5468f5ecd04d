// Handlers for the CLI subcommands. main.rs parses arguments and dispatches here.

pub mod mass;
pub mod route;
pub mod wormholes;
