//! End-to-end tests for `trackfinder brand`.

use std::process::Command;

mod fixtures;
use fixtures::trackfinder_bin;

fn brand_command(args: &[&str]) -> Command {
    let mut cmd = Command::new(trackfinder_bin());
    cmd.arg("brand").args(args);
    cmd
}

#[test]
fn test_brand_normalize_alias() {
    for token in ["caterpillar", "Caterpillar", "  CAT  "] {
        let output = brand_command(&["normalize", token])
            .output()
            .expect("Failed to execute command");

        assert_eq!(output.status.code(), Some(0));
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "CAT");
    }
}

#[test]
fn test_brand_normalize_unknown_is_identity() {
    let output = brand_command(&["normalize", "Zeppelin", "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let result: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse JSON output");
    assert_eq!(result["normalized"], "Zeppelin");
    assert_eq!(result["known"], false);
}

#[test]
fn test_brand_variations() {
    let output = brand_command(&["variations", "CAT", "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let result: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse JSON output");
    let variations: Vec<&str> = result["variations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();

    for expected in ["CAT", "cat", "caterpillar"] {
        assert!(variations.contains(&expected), "missing {expected}: {variations:?}");
    }
}

#[test]
fn test_brand_list() {
    let output = brand_command(&["list", "--json"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let result: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse JSON output");
    let brands = result.as_array().expect("Should be an array");

    let kubota = brands
        .iter()
        .find(|b| b["brand"] == "Kubota")
        .expect("Kubota should be listed");
    assert!(kubota["aliases"]
        .as_array()
        .unwrap()
        .iter()
        .any(|a| a == "kubota"));
}

#[test]
fn test_brand_requires_subcommand() {
    let output = Command::new(trackfinder_bin())
        .arg("brand")
        .output()
        .expect("Failed to execute command");

    assert_ne!(output.status.code(), Some(0));
}
