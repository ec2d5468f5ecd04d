//! Wormway CLI library.
//!
//! Helpers shared by the `wormway-cli` subcommands: loading network files into a graph and
//! wormhole registry, and formatting command results for the terminal.

pub mod network;
pub mod output;
