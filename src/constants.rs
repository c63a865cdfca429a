//! Application-wide constants.
//!
//! This module defines constants used throughout the application,
//! including the application name and catalog file names.

/// The display name of the application (human-readable, with proper capitalization).
pub const APP_NAME: &str = "TrackFinder";

/// The binary name of the application (used in command examples, lowercase with hyphens).
pub const APP_BINARY_NAME: &str = "trackfinder";

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "TRACKFINDER_CONFIG_DIR";

/// Millimeters per inch, used for every unit conversion in the chart.
pub const MM_PER_INCH: f64 = 25.4;

/// Sentinel value meaning "no brand/category filter".
pub const FILTER_ALL: &str = "all";

/// Upper bound on a single product page, matching the storefront backend.
pub const MAX_PAGE_LIMIT: usize = 100;

/// Catalog collection file names inside the data directory.
pub const PRODUCTS_FILE: &str = "products.json";
/// Track size collection file name.
pub const TRACK_SIZES_FILE: &str = "track_sizes.json";
/// Compatibility collection file name.
pub const COMPATIBILITY_FILE: &str = "compatibility.json";
/// Redirect table file name.
pub const REDIRECTS_FILE: &str = "redirects.json";
