use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .join(name)
        .canonicalize()
        .expect("fixture present")
}

#[allow(dead_code)]
pub fn fixture_network() -> PathBuf {
    fixture("sample_network.json")
}

#[allow(dead_code)]
pub fn fixture_masses() -> PathBuf {
    fixture("vehicle_masses.csv")
}

/// Command with logging quietened and no mass table inherited from the environment.
#[allow(dead_code)]
pub fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("wormway-cli");
    cmd.env("RUST_LOG", "error").env_remove("WORMWAY_MASS_TABLE");
    cmd
}

/// RFC 3339 instant `hours` after the fixture epoch.
#[allow(dead_code)]
pub fn at(hours: u32) -> String {
    format!("2026-03-01T{hours:02}:00:00Z")
}
