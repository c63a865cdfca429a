//! Shared test fixtures for CLI and web API tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A temporary catalog: `data/` holds the collections, `config/` is an
/// isolated config directory.
pub struct TestCatalog {
    temp_dir: TempDir,
}

impl TestCatalog {
    /// Directory holding the collection files.
    pub fn data_dir(&self) -> PathBuf {
        self.temp_dir.path().join("data")
    }

    /// Directory used as `TRACKFINDER_CONFIG_DIR`.
    pub fn config_dir(&self) -> PathBuf {
        self.temp_dir.path().join("config")
    }

    /// Replaces one collection file.
    pub fn write(&self, file: &str, records: &Value) {
        write_collection(&self.data_dir(), file, records);
    }
}

/// Writes a collection file as pretty JSON.
pub fn write_collection(dir: &Path, file: &str, records: &Value) {
    fs::write(
        dir.join(file),
        serde_json::to_string_pretty(records).expect("Failed to serialize fixture"),
    )
    .expect("Failed to write fixture file");
}

/// Products: two Kubota items, one rejected record.
pub fn sample_products() -> Value {
    json!([
        {
            "id": 1,
            "sku": "RT-450-86-56",
            "title": "Bobcat T190 Rubber Track",
            "price": 1299.99,
            "brand": "Bobcat",
            "category": "Rubber Tracks",
            "size": "450x86x56"
        },
        {
            "id": 2,
            "sku": "RT-400-72-74",
            "title": "Kubota SVL95 Rubber Track",
            "price": 1580.0,
            "brand": "Kubota",
            "category": "Rubber Tracks",
            "size": "400x72x74",
            "partNumber": "V0611-28111"
        },
        {
            "id": 3,
            "sku": "SP-CAT-299",
            "title": "CAT 299D Drive Sprocket",
            "price": 450.0,
            "brand": "CAT",
            "category": "Sprockets"
        },
        {
            "id": 4,
            "sku": "RL-KUB-01",
            "title": "Kubota Bottom Roller",
            "price": 189.5,
            "brand": "Kubota",
            "category": "Rollers",
            "inStock": false
        },
        {
            "id": 5,
            "sku": "RT-320-86-52",
            "title": "John Deere 317G Rubber Track",
            "price": 1299.99,
            "brand": "John Deere",
            "category": "Rubber Tracks",
            "size": "320x86x52"
        },
        {
            "sku": "",
            "title": "Broken record",
            "price": 1.0,
            "brand": "Nobody",
            "category": "Nothing"
        }
    ])
}

/// Track sizes: five measured, one unmeasured, one inactive.
///
/// mm buckets: 300, 320, 400, 450, 457. Inch buckets: 11, 12, 15, 17.
pub fn sample_track_sizes() -> Value {
    json!([
        {"size": "450x86x56", "width": 450, "pitch": 86, "links": 56, "price": 1299.99},
        {"size": "320x86x52", "width": 320, "pitch": 86, "links": 52},
        {"size": "300x55x82"},
        {"size": "400x72x74", "width": 400, "pitch": 72, "links": 74},
        {"size": "457x101.6x51"},
        {"size": "custom-rubber"},
        {"size": "180x72x37", "is_active": false}
    ])
}

/// Machines: six active, one inactive, one dangling size reference.
pub fn sample_compatibility() -> Value {
    json!([
        {"make": "Bobcat", "model": "T190", "track_sizes": ["450x86x56"]},
        {"make": "CAT", "model": "299D", "track_sizes": ["400x72x74"]},
        {"make": "Kubota", "model": "SVL-75", "track_sizes": ["400x72x74"]},
        {"make": "John Deere", "model": "317G", "track_sizes": ["320x86x52"]},
        {"make": "ASV", "model": "MD70 Turbo", "track_sizes": ["457x101.6x51"]},
        {"make": "Takeuchi", "model": "TL8", "track_sizes": ["300x55x82", "999x1x1"]},
        {"make": "Volvo", "model": "MCT85C", "track_sizes": ["450x86x56"], "is_active": false}
    ])
}

/// Redirects: a two-hop chain and a single redirect.
pub fn sample_redirects() -> Value {
    json!([
        {"from_url": "/products/old-t190", "to_url": "/products/bobcat-t190"},
        {"from_url": "/tracks", "to_url": "/products"},
        {"from_url": "/products", "to_url": "/shop", "redirect_type": 302}
    ])
}

/// Creates a temporary catalog with every sample collection.
pub fn create_test_catalog() -> TestCatalog {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let catalog = TestCatalog { temp_dir };

    fs::create_dir_all(catalog.data_dir()).expect("Failed to create data dir");
    fs::create_dir_all(catalog.config_dir()).expect("Failed to create config dir");

    catalog.write("products.json", &sample_products());
    catalog.write("track_sizes.json", &sample_track_sizes());
    catalog.write("compatibility.json", &sample_compatibility());
    catalog.write("redirects.json", &sample_redirects());

    catalog
}

/// Path to the trackfinder binary
pub fn trackfinder_bin() -> &'static str {
    env!("CARGO_BIN_EXE_trackfinder")
}

/// Creates a Command with an isolated config directory and the catalog's data directory.
pub fn catalog_command(catalog: &TestCatalog, args: &[&str]) -> Command {
    let mut cmd = Command::new(trackfinder_bin());
    cmd.env("TRACKFINDER_CONFIG_DIR", catalog.config_dir());
    cmd.env_remove("RUST_LOG");
    cmd.args(args);
    cmd.arg("--data-dir");
    cmd.arg(catalog.data_dir());
    cmd
}

/// Runs a command and parses its stdout as JSON, asserting exit code 0.
pub fn run_json(mut cmd: Command) -> Value {
    let output = cmd.output().expect("Failed to execute command");
    assert_eq!(
        output.status.code(),
        Some(0),
        "Command should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("Should parse JSON output")
}
