mod common;

use common::{at, cli, fixture_network};
use predicates::prelude::*;

#[test]
fn lists_active_wormholes_with_remaining_time() {
    cli()
        .arg("wormholes")
        .arg("--network")
        .arg(fixture_network())
        .args(["--at", &at(12)])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Active wormholes at 2026-03-01T12:00:00+00:00 (3):",
        ))
        .stdout(predicate::str::contains("Dal <-> Amarr"))
        .stdout(predicate::str::contains("4h00m"))
        .stdout(predicate::str::contains("36h00m"));
}

#[test]
fn expired_and_future_wormholes_are_hidden() {
    let output = cli()
        .args(["--format", "json", "wormholes", "--network"])
        .arg(fixture_network())
        .args(["--at", &at(20)])
        .output()
        .expect("run wormholes command");
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let labels: Vec<&str> = json
        .as_array()
        .expect("array")
        .iter()
        .map(|hole| hole["label"].as_str().expect("label"))
        .collect();
    assert_eq!(labels, ["L-1SW8", "B-3QPD"]);

    cli()
        .arg("wormholes")
        .arg("--network")
        .arg(fixture_network())
        .args(["--at", &at(3)])
        .assert()
        .success()
        .stdout(predicate::str::contains("(2):"))
        .stdout(predicate::str::contains("B-3QPD").not());
}

#[test]
fn rejects_network_with_dangling_wormhole() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let path = temp.path().join("network.json");
    std::fs::write(
        &path,
        r#"{
            "locations": [{ "name": "A", "region": "North" }],
            "wormholes": [{
                "from": "A", "to": "Z", "stability": "fresh", "mass_cap_kg": 1000,
                "created_at": "2026-03-01T00:00:00Z", "lifetime": "16h"
            }]
        }"#,
    )
    .expect("write network");

    cli()
        .arg("wormholes")
        .arg("--network")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to register wormhole 1 (A -> Z)"));
}
