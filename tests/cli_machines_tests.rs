//! End-to-end tests for `trackfinder machines`.

mod fixtures;
use fixtures::*;

fn machine_names(result: &serde_json::Value) -> Vec<String> {
    result["machines"]
        .as_array()
        .expect("machines should be an array")
        .iter()
        .map(|m| format!("{} {}", m["make"].as_str().unwrap(), m["model"].as_str().unwrap()))
        .collect()
}

#[test]
fn test_machines_brand_prefix_and_model() {
    let catalog = create_test_catalog();
    let result = run_json(catalog_command(&catalog, &["machines", "bob t190", "--json"]));

    assert_eq!(machine_names(&result), vec!["Bobcat T190"]);
    assert_eq!(result["machines"][0]["matched_by"], "brand_model_split");
    assert_eq!(result["machines"][0]["track_sizes"][0], "450x86x56");
}

#[test]
fn test_machines_brand_alias() {
    let catalog = create_test_catalog();
    let result = run_json(catalog_command(
        &catalog,
        &["machines", "caterpillar 299d", "--json"],
    ));

    assert_eq!(machine_names(&result), vec!["CAT 299D"]);
}

#[test]
fn test_machines_compact_ignores_hyphens() {
    let catalog = create_test_catalog();
    let result = run_json(catalog_command(&catalog, &["machines", "svl75", "--json"]));

    assert_eq!(machine_names(&result), vec!["Kubota SVL-75"]);
    assert_eq!(result["machines"][0]["matched_by"], "compact");
}

#[test]
fn test_machines_without_query_lists_active_machines() {
    let catalog = create_test_catalog();
    let result = run_json(catalog_command(&catalog, &["machines", "--json"]));

    // The inactive Volvo record is dropped at load
    assert_eq!(result["total"], 6);
    assert!(!machine_names(&result).contains(&"Volvo MCT85C".to_string()));
    assert!(result["machines"][0].get("matched_by").is_none());
}

#[test]
fn test_machines_empty_query_matches_nothing() {
    let catalog = create_test_catalog();
    let result = run_json(catalog_command(&catalog, &["machines", "", "--json"]));

    assert_eq!(result["total"], 0);
}

#[test]
fn test_machines_limit() {
    let catalog = create_test_catalog();
    let result = run_json(catalog_command(&catalog, &["machines", "--limit", "2", "--json"]));

    assert_eq!(result["total"], 6);
    assert_eq!(result["shown"], 2);
    assert_eq!(machine_names(&result), vec!["Bobcat T190", "CAT 299D"]);
}

#[test]
fn test_machines_explain_human_output() {
    let catalog = create_test_catalog();
    let output = catalog_command(&catalog, &["machines", "turbo asv", "--explain"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ASV MD70 Turbo"), "stdout: {stdout}");
    assert!(stdout.contains("[all_words]"), "stdout: {stdout}");
}

#[test]
fn test_machines_no_match_message() {
    let catalog = create_test_catalog();
    let output = catalog_command(&catalog, &["machines", "volvo t190"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("No machines match"));
}

#[test]
fn test_machines_missing_data_dir_is_io_error() {
    let catalog = create_test_catalog();
    let output = std::process::Command::new(trackfinder_bin())
        .env("TRACKFINDER_CONFIG_DIR", catalog.config_dir())
        .args(["machines", "bobcat", "--data-dir"])
        .arg(catalog.data_dir().join("missing"))
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Data directory not found"));
}
