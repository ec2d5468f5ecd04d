mod common;

use common::{at, cli, fixture_network};
use predicates::prelude::*;

#[test]
fn plans_hybrid_route_across_regions() {
    cli()
        .arg("route")
        .arg("--network")
        .arg(fixture_network())
        .args(["--from", "Rens", "--to", "Sarum Prime", "--at", &at(12)])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Routes: Rens -> Sarum Prime (mode: auto -> hybrid",
        ))
        .stdout(predicate::str::contains("#1 score 3.3 [good]"))
        .stdout(predicate::str::contains("Dal (Metropolis)"))
        .stdout(predicate::str::contains("Amarr (Domain) via wormhole #3"));
}

#[test]
fn compact_format_prints_one_line_per_candidate() {
    cli()
        .args(["--format", "compact", "route", "--network"])
        .arg(fixture_network())
        .args(["--from", "Rens", "--to", "Sarum Prime", "--at", &at(12)])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "#1 3.3 good: Rens -[gate]-> Hek -[gate]-> Nakugard -[gate]-> Dal -[wormhole #3]-> \
             Amarr -[bridge]-> Sarum Prime",
        ));
}

#[test]
fn json_output_lists_ranked_candidates() {
    let output = cli()
        .arg("route")
        .arg("--network")
        .arg(fixture_network())
        .args(["--from", "Rens", "--to", "Sarum Prime", "--at", &at(20)])
        .args(["--format", "json"])
        .output()
        .expect("run route command");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["mode"], "hybrid");
    let best = &json["candidates"][0];
    assert_eq!(best["rank"], 1);
    assert_eq!(best["wormholes"], 2);
    assert_eq!(best["band"], "iffy");
    let names: Vec<&str> = best["steps"]
        .as_array()
        .expect("steps array")
        .iter()
        .map(|step| step["name"].as_str().expect("step name"))
        .collect();
    assert_eq!(
        names,
        ["Rens", "Hek", "Lustrevik", "Onga", "Barbican", "Ashab", "Sarum Prime"]
    );
}

#[test]
fn static_mode_cannot_cross_unlinked_regions() {
    cli()
        .arg("route")
        .arg("--network")
        .arg(fixture_network())
        .args(["--from", "Rens", "--to", "Sarum Prime", "--mode", "static"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "no route found between Rens and Sarum Prime",
        ));
}

#[test]
fn unknown_location_is_reported() {
    cli()
        .arg("route")
        .arg("--network")
        .arg(fixture_network())
        .args(["--from", "Renz", "--to", "Hek"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown location: Renz"));
}

#[test]
fn avoided_location_forces_detour() {
    cli()
        .args(["--format", "compact", "route", "--network"])
        .arg(fixture_network())
        .args(["--from", "Rens", "--to", "Lustrevik", "--avoid", "Hek"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "#1 4.0 good: Rens -[gate]-> Frarn -[gate]-> Gyng -[gate]-> Onga -[gate]-> Lustrevik",
        ))
        .stdout(predicate::str::contains("Hek").not());
}

#[test]
fn missing_network_file_is_reported() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let missing = temp.path().join("absent.json");
    cli()
        .arg("route")
        .arg("--network")
        .arg(&missing)
        .args(["--from", "A", "--to", "B"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read network file"));
}
